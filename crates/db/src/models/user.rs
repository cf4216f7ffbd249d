//! User entity model and parameter types.

use roster_core::param::{PaginationParam, QueryOption};
use roster_core::query::{Field, Filter, Update};
use roster_core::types::{DbId, Timestamp};
use roster_core::value::SqlValue;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::row::{FromRow, Row, ScanError};

/// Full user row from the `user` table.
///
/// `password` holds the stored hash and is never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct User {
    pub id: DbId,
    pub role_id: DbId,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub display_name: String,
    pub status: i64,
    pub created_at: Option<Timestamp>,
    pub created_by: Option<String>,
    pub updated_at: Option<Timestamp>,
    pub updated_by: Option<String>,
}

impl FromRow for User {
    fn from_row(row: &Row) -> Result<Self, ScanError> {
        Ok(Self {
            id: row.get("id")?,
            role_id: row.get("fk_role_id")?,
            email: row.get("email")?,
            username: row.get("username")?,
            password: row.get("password")?,
            display_name: row.get("display_name")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
            created_by: row.get("created_by")?,
            updated_at: row.get("updated_at")?,
            updated_by: row.get("updated_by")?,
        })
    }
}

/// Filter selecting users. Every `Some` field becomes an equality condition.
#[derive(Debug, Clone, Default)]
pub struct UserParam {
    pub id: Option<DbId>,
    pub role_id: Option<DbId>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub query_option: QueryOption,
    pub pagination: PaginationParam,
}

impl UserParam {
    pub fn by_id(id: DbId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

impl Filter for UserParam {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "id",
            column: "id",
            value: |p| p.id.map(SqlValue::from),
        },
        Field {
            name: "role_id",
            column: "fk_role_id",
            value: |p| p.role_id.map(SqlValue::from),
        },
        Field {
            name: "email",
            column: "email",
            value: |p| p.email.clone().map(SqlValue::from),
        },
        Field {
            name: "username",
            column: "username",
            value: |p| p.username.clone().map(SqlValue::from),
        },
        Field {
            name: "display_name",
            column: "display_name",
            value: |p| p.display_name.clone().map(SqlValue::from),
        },
    ];

    fn query_option(&self) -> &QueryOption {
        &self.query_option
    }

    fn pagination(&self) -> &PaginationParam {
        &self.pagination
    }
}

/// DTO for creating a new user.
///
/// `password` must already be hashed when it reaches the repository.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserParam {
    pub role_id: DbId,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[serde(default)]
    #[validate(must_match(other = "password"))]
    pub confirm_password: String,
    #[validate(length(min = 1, max = 128))]
    pub display_name: String,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// DTO for updating users. Only `Some` fields are written.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserParam {
    pub role_id: Option<DbId>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 3, max = 64))]
    pub username: Option<String>,
    pub password: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub display_name: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl Update for UpdateUserParam {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "role_id",
            column: "fk_role_id",
            value: |p| p.role_id.map(SqlValue::from),
        },
        Field {
            name: "email",
            column: "email",
            value: |p| p.email.clone().map(SqlValue::from),
        },
        Field {
            name: "username",
            column: "username",
            value: |p| p.username.clone().map(SqlValue::from),
        },
        Field {
            name: "password",
            column: "password",
            value: |p| p.password.clone().map(SqlValue::from),
        },
        Field {
            name: "display_name",
            column: "display_name",
            value: |p| p.display_name.clone().map(SqlValue::from),
        },
    ];

    fn updated_by(&self) -> SqlValue {
        self.updated_by.clone().into()
    }
}
