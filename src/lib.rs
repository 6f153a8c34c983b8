//! Pigeonhole: offline message persistence for store-and-forward messaging.
//!
//! Messages addressed to a recipient who is not currently reachable are
//! queued durably and released once the recipient reconnects. Deciding when
//! a recipient is offline is left to the caller; this crate stores, counts,
//! retrieves, and purges queued messages per recipient.
//!
//! # Architecture
//!
//! Pigeonhole follows hexagonal architecture principles:
//!
//! - **Domain**: the stanza document model, free of infrastructure
//! - **Ports**: trait interfaces for the relational backend, the codec, and
//!   the offline queue itself
//! - **Adapters**: concrete implementations (`PostgreSQL` via Diesel, in-memory)
//!
//! # Modules
//!
//! - [`stanza`]: structured messages, parsing, and canonical serialization
//! - [`offline`]: the offline message store, its ports, and delivery policy
//! - [`config`]: settings for the `PostgreSQL`-backed store

pub mod config;
pub mod offline;
pub mod stanza;
