//! Repository tests for roles against the scripted database.

use std::sync::Arc;

use assert_matches::assert_matches;
use roster_core::param::{PaginationParam, QueryOption};
use roster_core::value::SqlValue;
use roster_db::models::role::{CreateRoleParam, RoleParam, UpdateRoleParam};
use roster_db::repositories::RoleRepo;
use roster_db::row::Row;
use roster_db::testing::{Op, ScriptedDatabase, Side, Step};
use roster_db::StoreError;

const SELECT: &str =
    "SELECT id, name, type, `rank`, status, created_at, created_by, updated_at, updated_by FROM role";

fn role_row(id: i64, name: &str) -> Row {
    Row::new()
        .with("id", id)
        .with("name", name)
        .with("type", 1i64)
        .with("rank", 10i64)
        .with("status", 1i64)
        .with("created_at", "2024-03-01 10:20:30")
        .with("created_by", "seed")
        .with("updated_at", "2024-03-01 10:20:30")
        .with("updated_by", "seed")
}

fn setup(steps: impl IntoIterator<Item = Step>) -> (Arc<ScriptedDatabase>, RoleRepo) {
    let db = Arc::new(ScriptedDatabase::new(steps));
    let repo = RoleRepo::new(db.clone());
    (db, repo)
}

#[tokio::test]
async fn create_records_creator_as_updater() {
    let (db, repo) = setup([
        Step::begin(),
        Step::exec(1, 3),
        Step::commit(),
        Step::row(role_row(3, "editor")),
    ]);

    let input = CreateRoleParam {
        name: "editor".to_string(),
        role_type: 1,
        rank: 10,
        created_by: Some("admin".to_string()),
    };
    let role = repo.create(&input).await.unwrap();
    assert_eq!(role.id, 3);
    assert_eq!(role.name, "editor");
    assert_eq!(role.rank, 10);
    db.assert_exhausted();

    let calls = db.calls();
    assert_eq!(
        calls[1].sql,
        "INSERT INTO role (name, type, `rank`, created_by, updated_by) VALUES (?, ?, ?, ?, ?)"
    );
    assert_eq!(
        calls[1].args,
        vec![
            SqlValue::from("editor"),
            SqlValue::Int(1),
            SqlValue::Int(10),
            SqlValue::from("admin"),
            SqlValue::from("admin"),
        ]
    );
    assert_eq!(calls[3].sql, format!("{SELECT} WHERE 1=1 AND id=?;"));
}

#[tokio::test]
async fn create_exec_failure_rolls_back() {
    let (db, repo) = setup([
        Step::begin(),
        Step::fail(Op::Exec, "duplicate entry 'editor'"),
        Step::rollback(),
    ]);

    let input = CreateRoleParam {
        name: "editor".to_string(),
        role_type: 0,
        rank: 0,
        created_by: None,
    };
    let err = repo.create(&input).await.unwrap_err();
    assert_matches!(err, StoreError::TxExec { label: "insert_role", .. });
    db.assert_exhausted();
}

#[tokio::test]
async fn get_missing_role_is_record_not_found() {
    let (_db, repo) = setup([Step::not_found(Op::QueryRow)]);

    let err = repo.get(&RoleParam::by_id(8)).await.unwrap_err();
    assert_matches!(err, StoreError::RecordNotFound { entity: "Role" });
}

#[tokio::test]
async fn get_list_sorts_by_quoted_rank() {
    let (db, repo) = setup([
        Step::rows(vec![role_row(2, "admin"), role_row(1, "viewer")]),
        Step::scalar(2),
    ]);

    let mut params = RoleParam {
        role_type: Some(1),
        query_option: QueryOption::active(),
        pagination: PaginationParam::page(1, 5),
        ..RoleParam::default()
    };
    params.pagination.sort_by = vec!["-rank".to_string(), "name".to_string()];

    let (roles, pagination) = repo.get_list(&params).await.unwrap();
    assert_eq!(roles.len(), 2);
    assert_eq!(roles[0].name, "admin");

    let pagination = pagination.unwrap();
    assert_eq!(pagination.total_elements, 2);
    assert_eq!(pagination.total_pages, 1);

    let calls = db.calls();
    assert_eq!(
        calls[0].sql,
        format!(
            "{SELECT} WHERE 1=1 AND type=? AND status=1 ORDER BY `rank` DESC, name ASC LIMIT 0, 5;"
        )
    );
    assert_eq!(
        calls[1].sql,
        "SELECT COUNT(*) FROM role WHERE 1=1 AND type=? AND status=1;"
    );
    assert_eq!(calls[1].args, vec![SqlValue::Int(1)]);
}

#[tokio::test]
async fn update_renders_name_then_updater() {
    let (db, repo) = setup([Step::exec(1, 0)]);

    let update = UpdateRoleParam {
        name: Some("owner".to_string()),
        updated_by: Some("admin".to_string()),
        ..UpdateRoleParam::default()
    };
    let filter = RoleParam {
        id: Some(2),
        query_option: QueryOption::active(),
        ..RoleParam::default()
    };
    repo.update(&update, &filter).await.unwrap();

    let call = &db.calls()[0];
    assert_eq!(call.side, Side::Leader);
    assert_eq!(
        call.sql,
        "UPDATE role SET name=?, updated_by=? WHERE 1=1 AND status=1 AND id=?"
    );
    assert_eq!(
        call.args,
        vec![
            SqlValue::from("owner"),
            SqlValue::from("admin"),
            SqlValue::Int(2)
        ]
    );
}

#[tokio::test]
async fn update_without_updater_binds_null() {
    let (db, repo) = setup([Step::exec(1, 0)]);

    let update = UpdateRoleParam {
        rank: Some(50),
        ..UpdateRoleParam::default()
    };
    repo.update(&update, &RoleParam::by_id(2)).await.unwrap();

    let call = &db.calls()[0];
    assert_eq!(call.sql, "UPDATE role SET `rank`=?, updated_by=? WHERE 1=1 AND id=?");
    assert_eq!(
        call.args,
        vec![SqlValue::Int(50), SqlValue::Null, SqlValue::Int(2)]
    );
}
