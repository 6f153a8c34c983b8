//! `PostgreSQL` adapter for the offline message backend port.
//!
//! The schema lives in `migrations/` and uses a `BIGSERIAL` key so that
//! ordering by `id` reproduces insertion order.

mod backend;
mod blocking_helpers;
mod row;

pub use backend::PgSqlBackend;
pub use blocking_helpers::PgPool;
