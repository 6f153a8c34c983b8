//! SQL-backed offline message store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::offline::{
    error::OfflineStoreError,
    ports::{OfflineStorage, OfflineStoreResult, SqlBackend, SqlRow, SqlValue},
};
use crate::stanza::{Message, StanzaCodec};

pub(crate) const INSERT_OFFLINE_MESSAGE: &str =
    "INSERT INTO offline_messages (username, data) VALUES ($1, $2)";

pub(crate) const COUNT_OFFLINE_MESSAGES: &str =
    "SELECT COUNT(*) FROM offline_messages WHERE username = $1";

// `id` is a BIGSERIAL, so ordering by it yields insertion order.
pub(crate) const FETCH_OFFLINE_MESSAGES: &str =
    "SELECT data FROM offline_messages WHERE username = $1 ORDER BY id";

pub(crate) const DELETE_OFFLINE_MESSAGES: &str =
    "DELETE FROM offline_messages WHERE username = $1";

/// Offline message queue persisted through a [`SqlBackend`].
///
/// Each operation issues exactly one statement. Nothing is cached or retried
/// here: backend failures reach the caller unchanged.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use pigeonhole::offline::adapters::postgres::PgSqlBackend;
/// use pigeonhole::offline::services::OfflineMessageStore;
/// use pigeonhole::stanza::XmlCodec;
///
/// let backend = PgSqlBackend::new(pool);
/// let store = OfflineMessageStore::new(Arc::new(backend), Arc::new(XmlCodec::new()));
/// let queued = store.count_offline_messages("ortuman").await?;
/// ```
pub struct OfflineMessageStore<B, C>
where
    B: SqlBackend,
    C: StanzaCodec,
{
    backend: Arc<B>,
    codec: Arc<C>,
}

impl<B, C> Clone for OfflineMessageStore<B, C>
where
    B: SqlBackend,
    C: StanzaCodec,
{
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<B, C> OfflineMessageStore<B, C>
where
    B: SqlBackend,
    C: StanzaCodec,
{
    /// Creates a store over the given backend and codec.
    #[must_use]
    pub const fn new(backend: Arc<B>, codec: Arc<C>) -> Self {
        Self { backend, codec }
    }

    /// Returns the backend.
    #[must_use]
    pub const fn backend(&self) -> &Arc<B> {
        &self.backend
    }
}

#[async_trait]
impl<B, C> OfflineStorage for OfflineMessageStore<B, C>
where
    B: SqlBackend,
    C: StanzaCodec,
{
    async fn insert_offline_message(
        &self,
        message: &Message,
        recipient: &str,
    ) -> OfflineStoreResult<()> {
        let payload = self.codec.encode(message);
        let params = [SqlValue::from(recipient), SqlValue::Text(payload)];
        self.backend
            .execute(INSERT_OFFLINE_MESSAGE, &params)
            .await?;
        Ok(())
    }

    async fn count_offline_messages(&self, recipient: &str) -> OfflineStoreResult<usize> {
        let rows = self
            .backend
            .query(COUNT_OFFLINE_MESSAGES, &[SqlValue::from(recipient)])
            .await?;
        rows.first().map_or(Ok(0), count_from_row)
    }

    async fn fetch_offline_messages(&self, recipient: &str) -> OfflineStoreResult<Vec<Message>> {
        let rows = self
            .backend
            .query(FETCH_OFFLINE_MESSAGES, &[SqlValue::from(recipient)])
            .await?;

        rows.iter()
            .enumerate()
            .map(|(index, row)| {
                let payload = payload_from_row(row)?;
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
        self.backend
            .execute(DELETE_OFFLINE_MESSAGES, &[SqlValue::from(recipient)])
            .await?;
        Ok(())
    }
}

fn count_from_row(row: &SqlRow) -> OfflineStoreResult<usize> {
    let value = row
        .get(0)
        .ok_or_else(|| OfflineStoreError::unexpected_row("count row has no columns"))?;
    match value {
        SqlValue::Null => Ok(0),
        SqlValue::BigInt(count) => usize::try_from(*count).map_err(|_| {
            OfflineStoreError::unexpected_row(format!("count {count} is out of range"))
        }),
        SqlValue::Text(_) => Err(OfflineStoreError::unexpected_row(format!(
            "count column holds {value}, expected an integer"
        ))),
    }
}

fn payload_from_row(row: &SqlRow) -> OfflineStoreResult<&str> {
    let value = row
        .get(0)
        .ok_or_else(|| OfflineStoreError::unexpected_row("message row has no columns"))?;
    value.as_text().ok_or_else(|| {
        OfflineStoreError::unexpected_row(format!(
            "message payload holds {value}, expected text"
        ))
    })
}
