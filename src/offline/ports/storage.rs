//! Offline storage port.

use async_trait::async_trait;

use crate::offline::error::OfflineStoreError;
use crate::stanza::Message;

/// Result type for offline storage operations.
pub type OfflineStoreResult<T> = Result<T, OfflineStoreError>;

/// Per-recipient queue of messages awaiting delivery.
///
/// Rows for a recipient are only ever removed all at once by
/// [`OfflineStorage::delete_offline_messages`]. Duplicate messages are kept
/// independently.
#[async_trait]
pub trait OfflineStorage: Send + Sync {
    /// Appends `message` to the queue for `recipient`.
    ///
    /// # Errors
    ///
    /// Returns [`OfflineStoreError::Backend`] when the write fails.
    async fn insert_offline_message(
        &self,
        message: &Message,
        recipient: &str,
    ) -> OfflineStoreResult<()>;

    /// Returns the number of queued messages for `recipient`.
    ///
    /// An unknown recipient has zero messages; that is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`OfflineStoreError::Backend`] when the query fails.
    async fn count_offline_messages(&self, recipient: &str) -> OfflineStoreResult<usize>;

    /// Returns every queued message for `recipient`, oldest first.
    ///
    /// The result is all-or-nothing: a single malformed payload fails the
    /// whole call.
    ///
    /// # Errors
    ///
    /// Returns [`OfflineStoreError::Backend`] when the query fails or
    /// [`OfflineStoreError::Deserialization`] when a payload cannot be parsed.
    async fn fetch_offline_messages(&self, recipient: &str) -> OfflineStoreResult<Vec<Message>>;

    /// Removes every queued message for `recipient`.
    ///
    /// Deleting an empty queue succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`OfflineStoreError::Backend`] when the delete fails.
    async fn delete_offline_messages(&self, recipient: &str) -> OfflineStoreResult<()>;
}
