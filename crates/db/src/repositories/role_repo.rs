//! Repository for the `role` table.

use std::sync::Arc;

use roster_core::pagination::Pagination;
use roster_core::query;
use roster_core::value::SqlValue;

use crate::error::StoreError;
use crate::handle::Database;
use crate::models::role::{CreateRoleParam, Role, RoleParam, UpdateRoleParam};
use crate::repositories::crud::{self, ListStatement};

const COLUMNS: &str =
    "id, name, type, `rank`, status, created_at, created_by, updated_at, updated_by";

const INSERT: &str =
    "INSERT INTO role (name, type, `rank`, created_by, updated_by) VALUES (?, ?, ?, ?, ?)";

const ENTITY: &str = "Role";

/// Create, read and update operations for roles.
#[derive(Clone)]
pub struct RoleRepo {
    db: Arc<dyn Database>,
}

impl RoleRepo {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Insert a role and return it as stored. The creator is also recorded
    /// as the first updater.
    pub async fn create(&self, input: &CreateRoleParam) -> Result<Role, StoreError> {
        let args = [
            SqlValue::from(&input.name),
            SqlValue::from(input.role_type),
            SqlValue::from(input.rank),
            SqlValue::from(input.created_by.clone()),
            SqlValue::from(input.created_by.clone()),
        ];

        let id = crud::insert(self.db.as_ref(), "create_role_tx", "insert_role", INSERT, &args).await?;
        tracing::debug!(id, "Role inserted");

        self.get(&RoleParam::by_id(id)).await
    }

    pub async fn get(&self, params: &RoleParam) -> Result<Role, StoreError> {
        let built = query::build(params)?;
        let sql = format!("SELECT {COLUMNS} FROM role{}", built.sql);
        crud::fetch_one(self.db.as_ref(), ENTITY, "read_role", &sql, &built.args).await
    }

    pub async fn get_list(
        &self,
        params: &RoleParam,
    ) -> Result<(Vec<Role>, Option<Pagination>), StoreError> {
        let built = query::build(params)?;
        let select = format!("SELECT {COLUMNS} FROM role");
        let stmt = ListStatement {
            label: "list_roles",
            count_label: "count_roles",
            select: &select,
            count: "SELECT COUNT(*) FROM role",
        };
        crud::fetch_list(self.db.as_ref(), stmt, &built, &params.pagination.sort_by).await
    }

    pub async fn update(
        &self,
        update: &UpdateRoleParam,
        filter: &RoleParam,
    ) -> Result<(), StoreError> {
        tracing::debug!(?filter, ?update, "Updating roles");

        let built = query::build_update(update, filter)?;
        let sql = format!("UPDATE role{}", built.sql);
        let rows_affected = crud::update(self.db.as_ref(), "update_role", &sql, &built.args).await?;

        tracing::debug!(rows_affected, "Roles updated");
        Ok(())
    }
}
