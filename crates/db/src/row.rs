//! Driver-independent result rows and column decoding.
//!
//! A [`Row`] is an ordered list of `(column, value)` pairs. Entities decode
//! themselves with [`FromRow`], pulling columns by name through
//! [`Row::get`]. A column that is absent from the row decodes to the target
//! type's default, so a query selecting fewer columns still scans; a column
//! whose value cannot be converted is a [`ScanError`].

use chrono::{NaiveDateTime, TimeZone, Utc};
use roster_core::types::Timestamp;
use roster_core::value::SqlValue;

/// A column could not be converted into the requested Rust type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot scan column `{column}`: {reason}")]
pub struct ScanError {
    pub column: String,
    pub reason: String,
}

/// One result row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, SqlValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, builder style.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        self.columns.push((column.into(), value.into()));
    }

    pub fn value(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Decode `column`, or return `T::default()` when the row lacks it.
    pub fn get<T: FromSqlValue + Default>(&self, column: &str) -> Result<T, ScanError> {
        match self.value(column) {
            None => Ok(T::default()),
            Some(value) => T::from_sql_value(value).map_err(|reason| ScanError {
                column: column.to_string(),
                reason,
            }),
        }
    }
}

/// Decode a whole entity from a row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self, ScanError>;
}

/// Conversion from a single column value.
///
/// Text values holding numbers or timestamps are parsed, the way a
/// text-protocol driver hands them over.
pub trait FromSqlValue: Sized {
    fn from_sql_value(value: &SqlValue) -> Result<Self, String>;
}

fn mismatch(expected: &str, value: &SqlValue) -> String {
    format!("expected {expected}, found {value:?}")
}

impl FromSqlValue for i64 {
    fn from_sql_value(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Int(v) => Ok(*v),
            SqlValue::Bool(v) => Ok(i64::from(*v)),
            SqlValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|e| format!("converting {s:?} to i64: {e}")),
            other => Err(mismatch("integer", other)),
        }
    }
}

impl FromSqlValue for bool {
    fn from_sql_value(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Bool(v) => Ok(*v),
            SqlValue::Int(v) => Ok(*v != 0),
            SqlValue::Text(s) => match s.trim() {
                "1" | "true" => Ok(true),
                "0" | "false" => Ok(false),
                _ => Err(format!("converting {s:?} to bool")),
            },
            other => Err(mismatch("boolean", other)),
        }
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Text(s) => Ok(s.clone()),
            SqlValue::Int(v) => Ok(v.to_string()),
            SqlValue::Float(v) => Ok(v.to_string()),
            other => Err(mismatch("text", other)),
        }
    }
}

impl FromSqlValue for Timestamp {
    fn from_sql_value(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Timestamp(t) => Ok(*t),
            SqlValue::Text(s) => parse_timestamp(s),
            other => Err(mismatch("timestamp", other)),
        }
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Null => Ok(None),
            other => T::from_sql_value(other).map(Some),
        }
    }
}

/// Accepts RFC 3339 and MySQL's `YYYY-MM-DD HH:MM:SS[.ffffff]` (taken as UTC).
fn parse_timestamp(s: &str) -> Result<Timestamp, String> {
    if let Ok(t) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| format!("converting {s:?} to timestamp: {e}"))
}
