//! Statement plumbing shared by the entity repositories.

use roster_core::pagination::Pagination;
use roster_core::query::BuiltQuery;
use roster_core::types::DbId;
use roster_core::value::SqlValue;

use crate::error::StoreError;
use crate::handle::{Database, SqlError, Transaction};
use crate::row::FromRow;

/// Labels and base statements for one entity's list read.
pub(crate) struct ListStatement<'a> {
    pub label: &'static str,
    pub count_label: &'static str,
    /// `SELECT <columns> FROM <table>`; the built fragment is appended.
    pub select: &'a str,
    /// `SELECT COUNT(*) FROM <table>`; the built count fragment is appended.
    pub count: &'a str,
}

/// Run `sql` inside a leader transaction and return the inserted id.
///
/// Every failure after the transaction opens rolls it back. Rollback errors
/// are logged and dropped so the insert failure reaches the caller.
pub(crate) async fn insert(
    db: &dyn Database,
    tx_label: &'static str,
    label: &'static str,
    sql: &str,
    args: &[SqlValue],
) -> Result<DbId, StoreError> {
    let mut tx = db
        .leader()
        .begin_tx(tx_label)
        .await
        .map_err(StoreError::TxBegin)?;

    let id = match exec_insert(tx.as_mut(), label, sql, args).await {
        Ok(id) => id,
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(label = tx_label, error = %rollback_err, "Rollback failed");
            }
            return Err(err);
        }
    };

    tx.commit()
        .await
        .map_err(|source| StoreError::TxCommit { id, source })?;

    Ok(id)
}

async fn exec_insert(
    tx: &mut dyn Transaction,
    label: &'static str,
    sql: &str,
    args: &[SqlValue],
) -> Result<DbId, StoreError> {
    let result = tx
        .exec(label, sql, args)
        .await
        .map_err(|source| StoreError::TxExec { label, source })?;

    if result.rows_affected < 1 {
        return Err(StoreError::NoRowsAffected { label });
    }
    Ok(result.last_insert_id)
}

/// Read exactly one row from the follower.
pub(crate) async fn fetch_one<T: FromRow>(
    db: &dyn Database,
    entity: &'static str,
    label: &'static str,
    sql: &str,
    args: &[SqlValue],
) -> Result<T, StoreError> {
    let row = db
        .follower()
        .query_row(label, sql, args)
        .await
        .map_err(|err| StoreError::from_read(entity, label, err))?;

    Ok(T::from_row(&row)?)
}

/// Read a page of rows from the follower, counting the full match set when the
/// query is paged and returned anything.
pub(crate) async fn fetch_list<T: FromRow>(
    db: &dyn Database,
    stmt: ListStatement<'_>,
    built: &BuiltQuery,
    sort_by: &[String],
) -> Result<(Vec<T>, Option<Pagination>), StoreError> {
    let sql = format!("{}{}", stmt.select, built.sql);
    let rows = match db.follower().query(stmt.label, &sql, &built.args).await {
        Ok(rows) => rows,
        Err(SqlError::NotFound) => Vec::new(),
        Err(SqlError::Scan(err)) => return Err(StoreError::RowScan(err)),
        Err(source) => {
            return Err(StoreError::Read {
                label: stmt.label,
                source,
            })
        }
    };

    let mut items = Vec::with_capacity(rows.len());
    for row in &rows {
        match T::from_row(row) {
            Ok(item) => items.push(item),
            Err(err) => {
                tracing::error!(label = stmt.label, error = %err, "Aborting list read");
                return Err(err.into());
            }
        }
    }

    if items.is_empty() {
        return Ok((items, None));
    }

    let current = items.len() as i64;
    let mut pagination = Pagination::new(built.page, current, sort_by.to_vec());
    if built.is_paged() {
        let count_sql = format!("{}{}", stmt.count, built.count_sql);
        pagination.total_elements = db
            .follower()
            .get_i64(stmt.count_label, &count_sql, &built.count_args)
            .await
            .map_err(|source| StoreError::Read {
                label: stmt.count_label,
                source,
            })?;
    }
    pagination.process(built.limit);

    Ok((items, Some(pagination)))
}

/// Execute a single update statement on the leader, outside any transaction.
///
/// Zero affected rows is reported as [`StoreError::NoRowsAffected`], whether
/// nothing matched or the matched rows already held the new values.
pub(crate) async fn update(
    db: &dyn Database,
    label: &'static str,
    sql: &str,
    args: &[SqlValue],
) -> Result<u64, StoreError> {
    let result = db
        .leader()
        .exec(label, sql, args)
        .await
        .map_err(|source| StoreError::TxExec { label, source })?;

    if result.rows_affected < 1 {
        return Err(StoreError::NoRowsAffected { label });
    }
    Ok(result.rows_affected)
}
