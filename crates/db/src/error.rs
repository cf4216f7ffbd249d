//! Error taxonomy surfaced by the repositories.
//!
//! Nothing here is retried. Callers decide user-visible behavior, usually by
//! matching on [`StoreError::kind`].

use roster_core::error::QueryBuilderError;
use roster_core::types::DbId;

use crate::handle::SqlError;
use crate::row::ScanError;

/// Repository-level failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The leader could not open a transaction.
    #[error("Failed to begin transaction: {0}")]
    TxBegin(#[source] SqlError),

    /// A write statement failed to execute.
    #[error("Failed to execute `{label}`: {source}")]
    TxExec {
        label: &'static str,
        #[source]
        source: SqlError,
    },

    /// The insert ran but the commit failed. `id` is the id the insert was
    /// assigned before the transaction was rolled back.
    #[error("Failed to commit transaction (id {id}): {source}")]
    TxCommit {
        id: DbId,
        #[source]
        source: SqlError,
    },

    /// The database accepted a write that changed nothing.
    #[error("No rows affected by `{label}`")]
    NoRowsAffected { label: &'static str },

    /// The parameters could not be turned into SQL.
    #[error("Failed to build query: {0}")]
    QueryBuilder(#[from] QueryBuilderError),

    /// A read statement failed.
    #[error("Failed to read `{label}`: {source}")]
    Read {
        label: &'static str,
        #[source]
        source: SqlError,
    },

    /// A row was read but could not be decoded.
    #[error("Failed to scan row: {0}")]
    RowScan(#[from] ScanError),

    /// The read matched zero rows.
    #[error("{entity} not found")]
    RecordNotFound { entity: &'static str },
}

/// Classification of a [`StoreError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TxBegin,
    TxExec,
    TxCommit,
    NoRowsAffected,
    QueryBuilder,
    Read,
    RowScan,
    RecordNotFound,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::TxBegin(_) => ErrorKind::TxBegin,
            StoreError::TxExec { .. } => ErrorKind::TxExec,
            StoreError::TxCommit { .. } => ErrorKind::TxCommit,
            StoreError::NoRowsAffected { .. } => ErrorKind::NoRowsAffected,
            StoreError::QueryBuilder(_) => ErrorKind::QueryBuilder,
            StoreError::Read { .. } => ErrorKind::Read,
            StoreError::RowScan(_) => ErrorKind::RowScan,
            StoreError::RecordNotFound { .. } => ErrorKind::RecordNotFound,
        }
    }

    /// Map a failed single-row read: the not-found sentinel becomes
    /// [`StoreError::RecordNotFound`], a column conversion failure becomes
    /// [`StoreError::RowScan`], anything else is a [`StoreError::Read`].
    pub(crate) fn from_read(entity: &'static str, label: &'static str, err: SqlError) -> Self {
        match err {
            SqlError::NotFound | SqlError::Driver(sqlx::Error::RowNotFound) => {
                StoreError::RecordNotFound { entity }
            }
            SqlError::Scan(e) => StoreError::RowScan(e),
            source => StoreError::Read { label, source },
        }
    }
}
