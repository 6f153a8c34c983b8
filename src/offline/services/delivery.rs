//! Archive-and-release policy layered over an [`OfflineStorage`].
//!
//! The storage port only stores, counts, fetches, and deletes. This service
//! adds the policy a server applies around those primitives: which messages
//! are worth queueing, how many a recipient may accumulate, and how a queue
//! is released when the recipient comes back online.

use std::sync::Arc;

use chrono::SecondsFormat;
use mockable::Clock;

use crate::offline::{error::DeliveryError, ports::OfflineStorage};
use crate::stanza::{Element, Jid, Message};

/// Namespace of the delayed-delivery extension.
pub const DELAY_NAMESPACE: &str = "urn:xmpp:delay";

/// Result type for delivery service operations.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Outcome of [`OfflineDeliveryService::archive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// The message was queued.
    Archived,
    /// The message is not a conversational message with a body and was
    /// dropped without touching storage.
    NotArchivable,
}

/// Offline delivery orchestration service.
pub struct OfflineDeliveryService<S, C>
where
    S: OfflineStorage,
    C: Clock + Send + Sync,
{
    storage: Arc<S>,
    clock: Arc<C>,
    queue_size: usize,
}

impl<S, C> Clone for OfflineDeliveryService<S, C>
where
    S: OfflineStorage,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            clock: Arc::clone(&self.clock),
            queue_size: self.queue_size,
        }
    }
}

impl<S, C> OfflineDeliveryService<S, C>
where
    S: OfflineStorage,
    C: Clock + Send + Sync,
{
    /// Creates a new delivery service.
    ///
    /// `queue_size` is the maximum number of messages kept per recipient.
    #[must_use]
    pub const fn new(storage: Arc<S>, clock: Arc<C>, queue_size: usize) -> Self {
        Self {
            storage,
            clock,
            queue_size,
        }
    }

    /// Returns the configured per-recipient capacity.
    #[must_use]
    pub const fn queue_size(&self) -> usize {
        self.queue_size
    }

    /// Queues `message` for `recipient` with a delayed-delivery stamp.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::QueueFull`] when the recipient already has
    /// `queue_size` messages, or [`DeliveryError::Storage`] when the count or
    /// insert fails.
    pub async fn archive(&self, message: &Message, recipient: &str) -> DeliveryResult<ArchiveOutcome> {
        if !message.is_archivable() {
            tracing::debug!(
                recipient,
                message_type = message.message_type(),
                "message is not archivable"
            );
            return Ok(ArchiveOutcome::NotArchivable);
        }

        let queued = self.storage.count_offline_messages(recipient).await?;
        if queued >= self.queue_size {
            tracing::warn!(recipient, limit = self.queue_size, "offline queue is full");
            return Err(DeliveryError::QueueFull {
                recipient: recipient.to_owned(),
                limit: self.queue_size,
            });
        }

        let delayed = message.clone().with_child(self.delay_element(message));
        self.storage
            .insert_offline_message(&delayed, recipient)
            .await?;
        tracing::debug!(recipient, queued = queued + 1, "archived offline message");
        Ok(ArchiveOutcome::Archived)
    }

    /// Releases the queue for `recipient`, returning its messages oldest
    /// first.
    ///
    /// Fetch and delete are separate statements. A message archived between
    /// them is deleted without being returned, so callers that cannot
    /// tolerate that must serialize `archive` and `drain` per recipient.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Storage`] when the fetch or delete fails. A
    /// failed delete leaves the queue intact and returns no messages.
    pub async fn drain(&self, recipient: &str) -> DeliveryResult<Vec<Message>> {
        let messages = self.storage.fetch_offline_messages(recipient).await?;
        if messages.is_empty() {
            return Ok(messages);
        }

        self.storage.delete_offline_messages(recipient).await?;
        tracing::debug!(
            recipient,
            delivered = messages.len(),
            "released offline messages"
        );
        Ok(messages)
    }

    /// Returns the number of messages waiting for `recipient`.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Storage`] when the count fails.
    pub async fn queued(&self, recipient: &str) -> DeliveryResult<usize> {
        Ok(self.storage.count_offline_messages(recipient).await?)
    }

    fn delay_element(&self, message: &Message) -> Element {
        let stamp = self.clock.utc().to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut delay = Element::new("delay").with_attribute("xmlns", DELAY_NAMESPACE);
        let origin = message
            .to()
            .and_then(|to| to.parse::<Jid>().ok())
            .map(|jid| jid.domain().to_owned());
        if let Some(domain) = origin {
            delay.set_attribute("from", domain);
        }
        delay.with_attribute("stamp", stamp)
    }
}
