//! Role entity model and parameter types.

use roster_core::param::{PaginationParam, QueryOption};
use roster_core::query::{Field, Filter, Update};
use roster_core::types::{DbId, Timestamp};
use roster_core::value::SqlValue;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::row::{FromRow, Row, ScanError};

/// A role row from the `role` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub role_type: i64,
    pub rank: i64,
    pub status: i64,
    pub created_at: Option<Timestamp>,
    pub created_by: Option<String>,
    pub updated_at: Option<Timestamp>,
    pub updated_by: Option<String>,
}

impl FromRow for Role {
    fn from_row(row: &Row) -> Result<Self, ScanError> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            role_type: row.get("type")?,
            rank: row.get("rank")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
            created_by: row.get("created_by")?,
            updated_at: row.get("updated_at")?,
            updated_by: row.get("updated_by")?,
        })
    }
}

/// Filter selecting roles.
#[derive(Debug, Clone, Default)]
pub struct RoleParam {
    pub id: Option<DbId>,
    pub name: Option<String>,
    pub role_type: Option<i64>,
    pub rank: Option<i64>,
    pub query_option: QueryOption,
    pub pagination: PaginationParam,
}

impl RoleParam {
    pub fn by_id(id: DbId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

// `rank` is reserved from MySQL 8.0.2 on and must stay quoted.
impl Filter for RoleParam {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "id",
            column: "id",
            value: |p| p.id.map(SqlValue::from),
        },
        Field {
            name: "name",
            column: "name",
            value: |p| p.name.clone().map(SqlValue::from),
        },
        Field {
            name: "type",
            column: "type",
            value: |p| p.role_type.map(SqlValue::from),
        },
        Field {
            name: "rank",
            column: "`rank`",
            value: |p| p.rank.map(SqlValue::from),
        },
    ];

    fn query_option(&self) -> &QueryOption {
        &self.query_option
    }

    fn pagination(&self) -> &PaginationParam {
        &self.pagination
    }
}

/// DTO for creating a new role.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoleParam {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default, rename = "type")]
    pub role_type: i64,
    #[serde(default)]
    pub rank: i64,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// DTO for updating roles. Only `Some` fields are written.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRoleParam {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub role_type: Option<i64>,
    pub rank: Option<i64>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl Update for UpdateRoleParam {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "name",
            column: "name",
            value: |p| p.name.clone().map(SqlValue::from),
        },
        Field {
            name: "type",
            column: "type",
            value: |p| p.role_type.map(SqlValue::from),
        },
        Field {
            name: "rank",
            column: "`rank`",
            value: |p| p.rank.map(SqlValue::from),
        },
    ];

    fn updated_by(&self) -> SqlValue {
        self.updated_by.clone().into()
    }
}
