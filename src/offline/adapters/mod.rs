//! Adapters for the offline message ports.
//!
//! # Available Adapters
//!
//! - [`postgres::PgSqlBackend`]: production [`SqlBackend`] over a Diesel r2d2
//!   pool
//! - [`memory::InMemoryOfflineStorage`]: thread-safe [`OfflineStorage`] for
//!   tests and database-less embedding
//!
//! [`SqlBackend`]: crate::offline::ports::SqlBackend
//! [`OfflineStorage`]: crate::offline::ports::OfflineStorage

pub mod memory;
pub mod postgres;
