//! Port contracts for offline message persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by offline services.

pub mod backend;
pub mod storage;

pub use backend::{BackendCause, BackendError, BackendResult, SqlBackend, SqlRow, SqlValue};
pub use storage::{OfflineStorage, OfflineStoreResult};

#[cfg(test)]
pub use backend::MockSqlBackend;
