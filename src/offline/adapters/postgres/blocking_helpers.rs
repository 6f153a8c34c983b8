//! Blocking operation helpers for the `PostgreSQL` backend.
//!
//! Provides utilities for offloading synchronous Diesel operations to a
//! dedicated thread pool, avoiding blocking the async executor.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};

use crate::offline::ports::{BackendError, BackendResult};

/// `PostgreSQL` connection pool type.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection type for internal use.
pub(super) type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Runs a blocking database operation on a dedicated thread pool.
///
/// Wraps the closure in [`tokio::task::spawn_blocking`] to prevent
/// blocking the async executor's worker threads.
pub(super) async fn run_blocking<F, T>(f: F) -> BackendResult<T>
where
    F: FnOnce() -> BackendResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(BackendError::connection)?
}

/// Obtains a connection from the pool.
pub(super) fn get_conn(pool: &PgPool) -> BackendResult<PooledConn> {
    pool.get().map_err(BackendError::connection)
}
