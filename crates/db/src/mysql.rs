//! sqlx-backed MySQL implementation of the leader/follower handle.

use async_trait::async_trait;
use roster_core::value::SqlValue;
use sqlx::mysql::{MySql, MySqlArguments, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

use crate::config::DbConfig;
use crate::handle::{Connection, Database, ExecResult, SqlError, Transaction};
use crate::row::{Row, ScanError};

type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

/// Leader and follower pools. When no follower URL is configured both sides
/// share the leader pool.
#[derive(Clone)]
pub struct MySqlDatabase {
    leader: MySqlConnection,
    follower: MySqlConnection,
}

impl MySqlDatabase {
    /// Open both pools from `config`.
    pub async fn connect(config: &DbConfig) -> Result<Self, sqlx::Error> {
        tracing::info!(
            max_connections = config.max_connections,
            dedicated_follower = config.follower_url.is_some(),
            "Connecting to database"
        );
        let leader = create_pool(&config.leader_url, config.max_connections).await?;
        let follower = match &config.follower_url {
            Some(url) => create_pool(url, config.max_connections).await?,
            None => leader.clone(),
        };
        Ok(Self::from_pools(leader, follower))
    }

    pub fn from_pools(leader: MySqlPool, follower: MySqlPool) -> Self {
        Self {
            leader: MySqlConnection {
                pool: leader,
                role: "leader",
            },
            follower: MySqlConnection {
                pool: follower,
                role: "follower",
            },
        }
    }

    /// Verify both sides answer a trivial query.
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.leader.pool).await?;
        sqlx::query("SELECT 1").execute(&self.follower.pool).await?;
        Ok(())
    }
}

impl Database for MySqlDatabase {
    fn leader(&self) -> &dyn Connection {
        &self.leader
    }

    fn follower(&self) -> &dyn Connection {
        &self.follower
    }
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct MySqlConnection {
    pool: MySqlPool,
    role: &'static str,
}

#[async_trait]
impl Connection for MySqlConnection {
    async fn begin_tx(&self, label: &str) -> Result<Box<dyn Transaction>, SqlError> {
        tracing::debug!(label, role = self.role, "Beginning transaction");
        let tx = self.pool.begin().await?;
        Ok(Box::new(MySqlTransaction { tx }))
    }

    async fn exec(
        &self,
        label: &str,
        sql: &str,
        args: &[SqlValue],
    ) -> Result<ExecResult, SqlError> {
        tracing::debug!(label, role = self.role, sql, "Executing statement");
        let result = bind_args(sqlx::query(sql), args)
            .execute(&self.pool)
            .await?;
        Ok(exec_result(&result))
    }

    async fn query(
        &self,
        label: &str,
        sql: &str,
        args: &[SqlValue],
    ) -> Result<Vec<Row>, SqlError> {
        tracing::debug!(label, role = self.role, sql, "Querying rows");
        let rows = bind_args(sqlx::query(sql), args)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| to_row(row).map_err(SqlError::from))
            .collect()
    }

    async fn query_row(
        &self,
        label: &str,
        sql: &str,
        args: &[SqlValue],
    ) -> Result<Row, SqlError> {
        tracing::debug!(label, role = self.role, sql, "Querying single row");
        let row = bind_args(sqlx::query(sql), args)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(SqlError::NotFound)?;
        Ok(to_row(&row)?)
    }

    async fn get_i64(&self, label: &str, sql: &str, args: &[SqlValue]) -> Result<i64, SqlError> {
        tracing::debug!(label, role = self.role, sql, "Querying scalar");
        let row = bind_args(sqlx::query(sql), args)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>(0)?)
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

struct MySqlTransaction {
    tx: sqlx::Transaction<'static, MySql>,
}

#[async_trait]
impl Transaction for MySqlTransaction {
    async fn exec(
        &mut self,
        label: &str,
        sql: &str,
        args: &[SqlValue],
    ) -> Result<ExecResult, SqlError> {
        tracing::debug!(label, sql, "Executing statement in transaction");
        let result = bind_args(sqlx::query(sql), args)
            .execute(&mut *self.tx)
            .await?;
        Ok(exec_result(&result))
    }

    async fn commit(self: Box<Self>) -> Result<(), SqlError> {
        // On failure the dropped transaction is rolled back by sqlx.
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), SqlError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bind_args<'q>(mut query: MySqlQuery<'q>, args: &'q [SqlValue]) -> MySqlQuery<'q> {
    for arg in args {
        query = match arg {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Bool(v) => query.bind(*v),
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::Timestamp(v) => query.bind(*v),
        };
    }
    query
}

fn exec_result(result: &sqlx::mysql::MySqlQueryResult) -> ExecResult {
    ExecResult {
        rows_affected: result.rows_affected(),
        last_insert_id: i64::try_from(result.last_insert_id()).unwrap_or(i64::MAX),
    }
}

fn to_row(row: &MySqlRow) -> Result<Row, ScanError> {
    let mut out = Row::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name())
            .map_err(|reason| ScanError {
                column: column.name().to_string(),
                reason,
            })?;
        out.push(column.name(), value);
    }
    Ok(out)
}

fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Result<SqlValue, String> {
    let is_null = row
        .try_get_raw(index)
        .map_err(|e| e.to_string())?
        .is_null();
    if is_null {
        return Ok(SqlValue::Null);
    }

    let value = match type_name {
        "BOOLEAN" => SqlValue::Bool(row.try_get(index).map_err(|e| e.to_string())?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            SqlValue::Int(row.try_get(index).map_err(|e| e.to_string())?)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => {
            let v: u64 = row.try_get(index).map_err(|e| e.to_string())?;
            SqlValue::Int(i64::try_from(v).map_err(|e| e.to_string())?)
        }
        "FLOAT" => {
            let v: f32 = row.try_get(index).map_err(|e| e.to_string())?;
            SqlValue::Float(f64::from(v))
        }
        "DOUBLE" => SqlValue::Float(row.try_get(index).map_err(|e| e.to_string())?),
        "DATETIME" | "TIMESTAMP" => {
            SqlValue::Timestamp(row.try_get(index).map_err(|e| e.to_string())?)
        }
        _ => SqlValue::Text(row.try_get(index).map_err(|e| e.to_string())?),
    };
    Ok(value)
}
