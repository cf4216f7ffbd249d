//! Leader/follower database handle.
//!
//! Repositories talk to the database only through these traits: writes go to
//! [`Database::leader`], reads to [`Database::follower`]. Every call carries a
//! short statement label used for tracing. Connection pooling and limits are
//! the implementation's concern.
//!
//! Cancellation is by drop: abandoning a returned future aborts the
//! in-flight statement.

use async_trait::async_trait;
use roster_core::value::SqlValue;

use crate::row::{Row, ScanError};

/// Low-level failure reported by a [`Connection`] or [`Transaction`].
#[derive(Debug, thiserror::Error)]
pub enum SqlError {
    /// The statement matched no rows where exactly one was expected.
    #[error("No rows in result set")]
    NotFound,

    /// Error from the sqlx driver.
    #[error(transparent)]
    Driver(#[from] sqlx::Error),

    /// A result column could not be represented as a [`SqlValue`].
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Any other failure, with a human-readable message.
    #[error("{0}")]
    Other(String),
}

/// Outcome of a write statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

/// An open transaction on the leader.
///
/// `commit` and `rollback` consume the transaction. A failed commit leaves it
/// rolled back.
#[async_trait]
pub trait Transaction: Send {
    async fn exec(
        &mut self,
        label: &str,
        sql: &str,
        args: &[SqlValue],
    ) -> Result<ExecResult, SqlError>;

    async fn commit(self: Box<Self>) -> Result<(), SqlError>;

    async fn rollback(self: Box<Self>) -> Result<(), SqlError>;
}

/// One side (leader or follower) of the database.
#[async_trait]
pub trait Connection: Send + Sync {
    async fn begin_tx(&self, label: &str) -> Result<Box<dyn Transaction>, SqlError>;

    async fn exec(&self, label: &str, sql: &str, args: &[SqlValue])
        -> Result<ExecResult, SqlError>;

    /// Fetch every matching row.
    async fn query(&self, label: &str, sql: &str, args: &[SqlValue])
        -> Result<Vec<Row>, SqlError>;

    /// Fetch the first matching row, or [`SqlError::NotFound`].
    async fn query_row(&self, label: &str, sql: &str, args: &[SqlValue])
        -> Result<Row, SqlError>;

    /// Fetch a single integer aggregate such as `COUNT(*)`.
    async fn get_i64(&self, label: &str, sql: &str, args: &[SqlValue]) -> Result<i64, SqlError>;
}

/// A primary/replica pair.
pub trait Database: Send + Sync {
    /// Connection for writes and transactions.
    fn leader(&self) -> &dyn Connection;

    /// Connection for reads.
    fn follower(&self) -> &dyn Connection;
}
