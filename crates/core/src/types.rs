/// All primary keys are MySQL `BIGINT AUTO_INCREMENT`.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Value of the `status` column for rows that are live (not soft-deleted).
pub const STATUS_ACTIVE: i64 = 1;
