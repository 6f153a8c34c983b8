//! `PostgreSQL` implementation of the [`SqlBackend`] port.

use std::time::Duration;

use async_trait::async_trait;
use diesel::PgConnection;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::{BigInt, Nullable, Text};

use super::blocking_helpers::{PgPool, get_conn, run_blocking};
use super::row::DynamicRow;
use crate::config::StoreSettings;
use crate::offline::ports::{BackendError, BackendResult, SqlBackend, SqlRow, SqlValue};

/// `PostgreSQL`-backed [`SqlBackend`].
///
/// Uses Diesel with connection pooling via r2d2. Statements run on the
/// blocking thread pool via [`tokio::task::spawn_blocking`], so callers must
/// be inside a multi-threaded Tokio runtime.
///
/// # Example
///
/// ```ignore
/// use diesel::r2d2::{ConnectionManager, Pool};
/// use diesel::PgConnection;
/// use pigeonhole::offline::adapters::postgres::PgSqlBackend;
///
/// let manager = ConnectionManager::<PgConnection>::new("postgres://...");
/// let pool = Pool::builder().build(manager).expect("pool");
/// let backend = PgSqlBackend::new(pool);
/// ```
#[derive(Debug, Clone)]
pub struct PgSqlBackend {
    pool: PgPool,
}

impl PgSqlBackend {
    /// Creates a backend over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool from settings and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Connection`] when the pool cannot establish
    /// its initial connections.
    pub fn connect(settings: &StoreSettings) -> BackendResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(settings.database_url.as_str());
        let pool = Pool::builder()
            .max_size(settings.max_connections)
            .connection_timeout(Duration::from_secs(settings.connection_timeout_secs))
            .build(manager)
            .map_err(BackendError::connection)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SqlBackend for PgSqlBackend {
    async fn execute(&self, statement: &str, params: &[SqlValue]) -> BackendResult<u64> {
        let pool = self.pool.clone();
        let query = bind_params(statement, params);

        let affected = run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            query.execute(&mut conn).map_err(BackendError::execution)
        })
        .await?;

        tracing::debug!(statement, affected, "executed statement");
        u64::try_from(affected).map_err(BackendError::execution)
    }

    async fn query(&self, statement: &str, params: &[SqlValue]) -> BackendResult<Vec<SqlRow>> {
        let pool = self.pool.clone();
        let query = bind_params(statement, params);

        let rows = run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            query
                .load::<DynamicRow>(&mut conn)
                .map_err(BackendError::query)
        })
        .await?;

        tracing::debug!(statement, rows = rows.len(), "ran query");
        Ok(rows.into_iter().map(|row| row.0).collect())
    }
}

/// Builds a boxed raw query with every parameter bound in order.
fn bind_params(statement: &str, params: &[SqlValue]) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
    params
        .iter()
        .cloned()
        .fold(diesel::sql_query(statement).into_boxed(), |query, param| {
            match param {
                SqlValue::Null => query.bind::<Nullable<Text>, _>(None::<String>),
                SqlValue::Text(text) => query.bind::<Text, _>(text),
                SqlValue::BigInt(value) => query.bind::<BigInt, _>(value),
            }
        })
}
