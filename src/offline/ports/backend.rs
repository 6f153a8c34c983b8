//! Relational backend port.
//!
//! The offline store talks to its database exclusively through
//! [`SqlBackend`]: parameterized statements in, affected-row counts or rows
//! out. Connection management and pooling stay behind the port.

use async_trait::async_trait;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// A bound statement parameter or a column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// SQL `NULL`.
    Null,
    /// Text value.
    Text(String),
    /// 64-bit integer value.
    BigInt(i64),
}

impl SqlValue {
    /// Returns the text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Null | Self::BigInt(_) => None,
        }
    }

    /// Returns the integer content, if this is an integer value.
    #[must_use]
    pub const fn as_big_int(&self) -> Option<i64> {
        match self {
            Self::BigInt(value) => Some(*value),
            Self::Null | Self::Text(_) => None,
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::BigInt(value)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Text(text) => write!(f, "'{text}'"),
            Self::BigInt(value) => write!(f, "{value}"),
        }
    }
}

/// A result row with values addressable by position or column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlRow {
    columns: Vec<(String, SqlValue)>,
}

impl SqlRow {
    /// Creates an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Appends a named column value, returning the updated row.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Appends a named column value.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) {
        self.columns.push((name.into(), value.into()));
    }

    /// Returns the value at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SqlValue> {
        self.columns.get(index).map(|(_, value)| value)
    }

    /// Returns the value of the first column called `name`.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` when the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Shared error source carried by [`BackendError`].
pub type BackendCause = Arc<dyn StdError + Send + Sync>;

/// Failures originating in the relational backend.
///
/// Equality is identity: two errors are equal only when they are the same
/// variant wrapping the same shared cause. Clones of one error compare equal,
/// so a failure can be checked for verbatim propagation.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// A connection could not be obtained or was lost.
    #[error("backend connection error: {0}")]
    Connection(BackendCause),

    /// A data-modifying statement failed.
    #[error("statement execution failed: {0}")]
    Execution(BackendCause),

    /// A query failed or its rows could not be read.
    #[error("query failed: {0}")]
    Query(BackendCause),
}

impl BackendError {
    /// Wraps a connection failure.
    pub fn connection(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Connection(Arc::new(err))
    }

    /// Wraps a statement execution failure.
    pub fn execution(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Execution(Arc::new(err))
    }

    /// Wraps a query failure.
    pub fn query(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Query(Arc::new(err))
    }

    /// Returns the wrapped cause.
    #[must_use]
    pub fn cause(&self) -> &BackendCause {
        match self {
            Self::Connection(cause) | Self::Execution(cause) | Self::Query(cause) => cause,
        }
    }
}

impl PartialEq for BackendError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Connection(left), Self::Connection(right))
            | (Self::Execution(left), Self::Execution(right))
            | (Self::Query(left), Self::Query(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

/// Capability to run parameterized SQL against a relational database.
///
/// Parameters are bound positionally (`$1`, `$2`, ...) in the order given.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SqlBackend: Send + Sync {
    /// Runs a data-modifying statement and returns the affected-row count.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the connection or the statement fails.
    async fn execute(&self, statement: &str, params: &[SqlValue]) -> BackendResult<u64>;

    /// Runs a query and returns every result row.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the connection or the query fails.
    async fn query(&self, statement: &str, params: &[SqlValue]) -> BackendResult<Vec<SqlRow>>;
}
