//! Repository for the `user` table.

use std::sync::Arc;

use roster_core::pagination::Pagination;
use roster_core::query;
use roster_core::value::SqlValue;

use crate::error::StoreError;
use crate::handle::Database;
use crate::models::user::{CreateUserParam, UpdateUserParam, User, UserParam};
use crate::repositories::crud::{self, ListStatement};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, fk_role_id, email, username, password, display_name, status, \
    created_at, created_by, updated_at, updated_by";

const INSERT: &str = "INSERT INTO user (fk_role_id, email, username, password, display_name, created_by) \
    VALUES (?, ?, ?, ?, ?, ?)";

const ENTITY: &str = "User";

/// Create, read and update operations for users.
#[derive(Clone)]
pub struct UserRepo {
    db: Arc<dyn Database>,
}

impl UserRepo {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Insert a user, then re-read it from the follower by its new id.
    ///
    /// `input.password` is stored as given; hash it first.
    pub async fn create(&self, input: &CreateUserParam) -> Result<User, StoreError> {
        let args = [
            SqlValue::from(input.role_id),
            SqlValue::from(&input.email),
            SqlValue::from(&input.username),
            SqlValue::from(&input.password),
            SqlValue::from(&input.display_name),
            SqlValue::from(input.created_by.clone()),
        ];

        let id = crud::insert(self.db.as_ref(), "create_user_tx", "insert_user", INSERT, &args).await?;
        tracing::debug!(id, "User inserted");

        self.get(&UserParam::by_id(id)).await
    }

    /// Fetch the first user matching `params`.
    pub async fn get(&self, params: &UserParam) -> Result<User, StoreError> {
        let built = query::build(params)?;
        let sql = format!("SELECT {COLUMNS} FROM user{}", built.sql);
        crud::fetch_one(self.db.as_ref(), ENTITY, "read_user", &sql, &built.args).await
    }

    /// List users matching `params`, with pagination metadata when anything
    /// matched.
    pub async fn get_list(
        &self,
        params: &UserParam,
    ) -> Result<(Vec<User>, Option<Pagination>), StoreError> {
        let built = query::build(params)?;
        let select = format!("SELECT {COLUMNS} FROM user");
        let stmt = ListStatement {
            label: "list_users",
            count_label: "count_users",
            select: &select,
            count: "SELECT COUNT(*) FROM user",
        };
        crud::fetch_list(self.db.as_ref(), stmt, &built, &params.pagination.sort_by).await
    }

    /// Apply `update` to every user matching `filter`.
    pub async fn update(
        &self,
        update: &UpdateUserParam,
        filter: &UserParam,
    ) -> Result<(), StoreError> {
        tracing::debug!(?filter, "Updating users");

        let built = query::build_update(update, filter)?;
        let sql = format!("UPDATE user{}", built.sql);
        let rows_affected = crud::update(self.db.as_ref(), "update_user", &sql, &built.args).await?;

        tracing::debug!(rows_affected, "Users updated");
        Ok(())
    }
}
