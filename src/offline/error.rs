//! Error types for offline message storage and delivery.

use super::ports::backend::BackendError;
use crate::stanza::StanzaError;
use thiserror::Error;

/// Errors returned by offline storage operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OfflineStoreError {
    /// The backend failed. The error is passed through unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A stored payload could not be parsed back into a message.
    #[error("offline message {index} for '{recipient}' is malformed: {source}")]
    Deserialization {
        /// Recipient whose queue holds the payload.
        recipient: String,
        /// Zero-based position of the payload in insertion order.
        index: usize,
        /// Codec failure.
        #[source]
        source: StanzaError,
    },

    /// The backend returned a row that does not fit the issued statement.
    #[error("unexpected row from backend: {0}")]
    UnexpectedRow(String),
}

impl OfflineStoreError {
    /// Creates an unexpected-row error.
    #[must_use]
    pub fn unexpected_row(message: impl Into<String>) -> Self {
        Self::UnexpectedRow(message.into())
    }

    /// Returns the backend failure, if this error is one.
    #[must_use]
    pub const fn as_backend(&self) -> Option<&BackendError> {
        match self {
            Self::Backend(err) => Some(err),
            Self::Deserialization { .. } | Self::UnexpectedRow(_) => None,
        }
    }
}

/// Errors returned by the offline delivery service.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeliveryError {
    /// The recipient's queue already holds `limit` messages.
    #[error("offline queue for '{recipient}' is full ({limit} messages)")]
    QueueFull {
        /// Recipient whose queue is full.
        recipient: String,
        /// Configured queue capacity.
        limit: usize,
    },

    /// A storage operation failed.
    #[error(transparent)]
    Storage(#[from] OfflineStoreError),
}
