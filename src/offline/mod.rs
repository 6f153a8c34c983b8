//! Offline message persistence.
//!
//! Messages addressed to an unreachable recipient are queued under the
//! recipient's bare account name and released when the recipient reconnects.
//! Deciding *when* a recipient is offline belongs to the caller.
//!
//! The module follows hexagonal architecture:
//!
//! - Port contracts in [`ports`]: [`ports::SqlBackend`] for the database and
//!   [`ports::OfflineStorage`] for the queue operations
//! - Services in [`services`]: [`services::OfflineMessageStore`] implements
//!   the queue over SQL; [`services::OfflineDeliveryService`] adds archive
//!   policy on top of any storage
//! - Adapter implementations in [`adapters`]
//! - Error types in [`error`]
//!
//! # Example
//!
//! ```
//! use pigeonhole::offline::adapters::memory::InMemoryOfflineStorage;
//! use pigeonhole::offline::ports::OfflineStorage;
//! use pigeonhole::stanza::Message;
//!
//! let runtime = tokio::runtime::Runtime::new().expect("runtime");
//! runtime.block_on(async {
//!     let storage = InMemoryOfflineStorage::new();
//!     let message = Message::builder().id("abc").body("Hi!").build();
//!
//!     storage.insert_offline_message(&message, "ortuman").await.expect("insert");
//!     assert_eq!(storage.count_offline_messages("ortuman").await.expect("count"), 1);
//!
//!     let fetched = storage.fetch_offline_messages("ortuman").await.expect("fetch");
//!     assert_eq!(fetched, vec![message]);
//! });
//! ```

pub mod adapters;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
