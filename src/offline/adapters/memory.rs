//! In-memory implementation of the [`OfflineStorage`] port.
//!
//! Provides a simple, thread-safe queue for unit testing and embedding
//! without a database. Payloads are held in encoded form so the
//! decode-on-fetch behaviour matches the SQL-backed store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use crate::offline::{
    error::OfflineStoreError,
    ports::{BackendError, OfflineStorage, OfflineStoreResult},
};
use crate::stanza::{Message, StanzaCodec, XmlCodec};

#[derive(Debug, Error)]
#[error("lock poisoned: {0}")]
struct PoisonedLock(String);

fn poisoned(err: impl std::fmt::Display) -> OfflineStoreError {
    OfflineStoreError::Backend(BackendError::connection(PoisonedLock(err.to_string())))
}

/// In-memory implementation of [`OfflineStorage`].
///
/// # Example
///
/// ```
/// use pigeonhole::offline::adapters::memory::InMemoryOfflineStorage;
///
/// let storage = InMemoryOfflineStorage::new();
/// assert!(storage.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryOfflineStorage<C = XmlCodec>
where
    C: StanzaCodec,
{
    queues: Arc<RwLock<HashMap<String, Vec<String>>>>,
    codec: Arc<C>,
}

impl InMemoryOfflineStorage<XmlCodec> {
    /// Creates an empty store using the XML codec.
    #[must_use]
    pub fn new() -> Self {
        Self::with_codec(Arc::new(XmlCodec::new()))
    }
}

impl Default for InMemoryOfflineStorage<XmlCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryOfflineStorage<C>
where
    C: StanzaCodec,
{
    /// Creates an empty store using the given codec.
    #[must_use]
    pub fn with_codec(codec: Arc<C>) -> Self {
        Self {
            queues: Arc::new(RwLock::new(HashMap::new())),
            codec,
        }
    }

    /// Appends a raw payload without encoding it.
    ///
    /// Useful for seeding payloads that the codec would never produce.
    ///
    /// # Errors
    ///
    /// Returns [`OfflineStoreError::Backend`] if the internal lock is
    /// poisoned.
    pub fn insert_raw(
        &self,
        recipient: impl Into<String>,
        payload: impl Into<String>,
    ) -> OfflineStoreResult<()> {
        let mut guard = self.queues.write().map_err(poisoned)?;
        guard
            .entry(recipient.into())
            .or_default()
            .push(payload.into());
        Ok(())
    }

    /// Returns the stored payloads for `recipient`, oldest first.
    ///
    /// Returns an empty list if the internal lock is poisoned.
    #[must_use]
    pub fn payloads(&self, recipient: &str) -> Vec<String> {
        self.queues
            .read()
            .ok()
            .and_then(|guard| guard.get(recipient).cloned())
            .unwrap_or_default()
    }

    /// Returns `true` if no recipient has queued messages.
    ///
    /// Returns `true` if the internal lock is poisoned, matching the fallback
    /// behaviour of an empty store.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queues
            .read()
            .map(|guard| guard.values().all(Vec::is_empty))
            .unwrap_or(true)
    }
}

#[async_trait]
impl<C> OfflineStorage for InMemoryOfflineStorage<C>
where
    C: StanzaCodec,
{
    async fn insert_offline_message(
        &self,
        message: &Message,
        recipient: &str,
    ) -> OfflineStoreResult<()> {
        let payload = self.codec.encode(message);
        self.insert_raw(recipient, payload)
    }

    async fn count_offline_messages(&self, recipient: &str) -> OfflineStoreResult<usize> {
        let guard = self.queues.read().map_err(poisoned)?;
        Ok(guard.get(recipient).map_or(0, Vec::len))
    }

    async fn fetch_offline_messages(&self, recipient: &str) -> OfflineStoreResult<Vec<Message>> {
        let payloads = {
            let guard = self.queues.read().map_err(poisoned)?;
            guard.get(recipient).cloned().unwrap_or_default()
        };

        payloads
            .iter()
            .enumerate()
            .map(|(index, payload)| {
                self.codec
                    .decode(payload)
                    .map_err(|source| OfflineStoreError::Deserialization {
                        recipient: recipient.to_owned(),
                        index,
                        source,
                    })
            })
            .collect()
    }

    async fn delete_offline_messages(&self, recipient: &str) -> OfflineStoreResult<()> {
        let mut guard = self.queues.write().map_err(poisoned)?;
        guard.remove(recipient);
        Ok(())
    }
}
