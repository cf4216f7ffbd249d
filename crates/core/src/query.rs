//! Parameterized SQL fragment builder.
//!
//! Each filter or update parameter type declares a static list of [`Field`]
//! descriptors. The builder walks that list in declaration order, so the same
//! parameter value always yields the same SQL text and the same argument
//! order. Only present (`Some`) fields participate.
//!
//! Generated shapes:
//!
//! ```text
//! build:         " WHERE 1=1[ AND <col>=?]*[ AND status=1][ AND (<raw>)]*[ ORDER BY ..][ LIMIT <offset>, <size>];"
//! count:         " WHERE 1=1[ AND <col>=?]*[ AND status=1][ AND (<raw>)]*;"
//! build_update:  " SET <col>=?[, <col>=?]*, updated_by=? WHERE 1=1[ AND status=1][ AND <col>=?]*[ AND (<raw>)]*"
//! ```

use crate::error::QueryBuilderError;
use crate::param::{PaginationParam, QueryOption, RawCondition};
use crate::types::STATUS_ACTIVE;
use crate::value::SqlValue;

/// Audit columns every entity can be sorted by in addition to its filter fields.
pub const AUDIT_SORT_COLUMNS: &[&str] = &["created_at", "updated_at"];

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// Declarative description of one optional parameter field.
pub struct Field<P> {
    /// Key used by callers (e.g. in `sort_by`).
    pub name: &'static str,
    /// Column rendered into SQL.
    pub column: &'static str,
    /// Returns the bound value when the field is present.
    pub value: fn(&P) -> Option<SqlValue>,
}

/// A parameter type that selects rows.
pub trait Filter: Sized + 'static {
    /// Equality fields in rendering order.
    const FIELDS: &'static [Field<Self>];

    fn query_option(&self) -> &QueryOption;

    fn pagination(&self) -> &PaginationParam;
}

/// A parameter type that sets column values.
pub trait Update: Sized + 'static {
    /// Settable fields in rendering order.
    const FIELDS: &'static [Field<Self>];

    /// Value for the trailing `updated_by=?`, always rendered.
    fn updated_by(&self) -> SqlValue;
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Fragments produced by [`build`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    /// WHERE (+ ORDER/LIMIT) fragment for the row query.
    pub sql: String,
    pub args: Vec<SqlValue>,
    /// WHERE fragment for the COUNT query.
    pub count_sql: String,
    pub count_args: Vec<SqlValue>,
    /// Normalized 1-based page.
    pub page: i64,
    /// Page size rendered into LIMIT, `0` when no LIMIT was rendered.
    pub limit: i64,
}

impl BuiltQuery {
    pub fn is_paged(&self) -> bool {
        self.limit > 0
    }
}

/// Fragment produced by [`build_update`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltUpdate {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build the WHERE/ORDER/LIMIT fragment and its COUNT counterpart for `param`.
pub fn build<P: Filter>(param: &P) -> Result<BuiltQuery, QueryBuilderError> {
    let option = param.query_option();
    let pagination = param.pagination();

    let mut clause = String::from(" WHERE 1=1");
    let mut args = Vec::new();

    push_fields(param, &mut clause, &mut args);
    if option.is_active {
        clause.push_str(&format!(" AND status={STATUS_ACTIVE}"));
    }
    push_conditions(&option.conditions, &mut clause, &mut args)?;

    let count_sql = format!("{clause};");
    let count_args = args.clone();

    let mut sql = clause;
    sql.push_str(&order_by::<P>(&pagination.sort_by)?);

    let page = pagination.normalized_page();
    let mut limit = 0;
    if pagination.include_pagination && !option.disable_limit {
        limit = pagination.normalized_limit();
        sql.push_str(&format!(" LIMIT {}, {}", pagination.offset(), limit));
    }
    sql.push(';');

    Ok(BuiltQuery {
        sql,
        args,
        count_sql,
        count_args,
        page,
        limit,
    })
}

/// Build the SET/WHERE fragment applying `update` to rows selected by `filter`.
///
/// Fails with [`QueryBuilderError::NothingToUpdate`] when `update` has no
/// present fields; `updated_by` alone does not count.
pub fn build_update<U: Update, P: Filter>(
    update: &U,
    filter: &P,
) -> Result<BuiltUpdate, QueryBuilderError> {
    let mut sets = Vec::new();
    let mut args = Vec::new();

    for field in U::FIELDS {
        if let Some(value) = (field.value)(update) {
            sets.push(format!("{}=?", field.column));
            args.push(value);
        }
    }
    if sets.is_empty() {
        return Err(QueryBuilderError::NothingToUpdate);
    }
    sets.push("updated_by=?".to_string());
    args.push(update.updated_by());

    let option = filter.query_option();
    let mut sql = format!(" SET {} WHERE 1=1", sets.join(", "));
    if option.is_active {
        sql.push_str(&format!(" AND status={STATUS_ACTIVE}"));
    }
    push_fields(filter, &mut sql, &mut args);
    push_conditions(&option.conditions, &mut sql, &mut args)?;

    Ok(BuiltUpdate { sql, args })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn push_fields<P: Filter>(param: &P, sql: &mut String, args: &mut Vec<SqlValue>) {
    for field in P::FIELDS {
        if let Some(value) = (field.value)(param) {
            sql.push_str(" AND ");
            sql.push_str(field.column);
            sql.push_str("=?");
            args.push(value);
        }
    }
}

fn push_conditions(
    conditions: &[RawCondition],
    sql: &mut String,
    args: &mut Vec<SqlValue>,
) -> Result<(), QueryBuilderError> {
    for condition in conditions {
        let fragment = condition.sql.trim();
        if fragment.is_empty() {
            return Err(QueryBuilderError::EmptyCondition);
        }
        let placeholders = fragment.matches('?').count();
        if placeholders != condition.args.len() {
            return Err(QueryBuilderError::PlaceholderMismatch {
                sql: fragment.to_string(),
                placeholders,
                args: condition.args.len(),
            });
        }
        sql.push_str(" AND (");
        sql.push_str(fragment);
        sql.push(')');
        args.extend(condition.args.iter().cloned());
    }
    Ok(())
}

/// Resolve a sort key to its column: a field name, or an audit column.
fn sort_column<P: Filter>(key: &str) -> Option<&'static str> {
    P::FIELDS
        .iter()
        .find(|f| f.name == key)
        .map(|f| f.column)
        .or_else(|| AUDIT_SORT_COLUMNS.iter().copied().find(|c| *c == key))
}

fn order_by<P: Filter>(sort_by: &[String]) -> Result<String, QueryBuilderError> {
    if sort_by.is_empty() {
        return Ok(String::new());
    }

    let mut terms = Vec::with_capacity(sort_by.len());
    for key in sort_by {
        let (name, direction) = match key.strip_prefix('-') {
            Some(name) => (name, "DESC"),
            None => (key.as_str(), "ASC"),
        };
        let column = sort_column::<P>(name)
            .ok_or_else(|| QueryBuilderError::UnknownSortColumn(key.clone()))?;
        terms.push(format!("{column} {direction}"));
    }
    Ok(format!(" ORDER BY {}", terms.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[derive(Default)]
    struct SampleParam {
        id: Option<i64>,
        owner_id: Option<i64>,
        name: Option<String>,
        query_option: QueryOption,
        pagination: PaginationParam,
    }

    impl Filter for SampleParam {
        const FIELDS: &'static [Field<Self>] = &[
            Field {
                name: "id",
                column: "id",
                value: |p| p.id.map(SqlValue::from),
            },
            Field {
                name: "owner_id",
                column: "fk_owner_id",
                value: |p| p.owner_id.map(SqlValue::from),
            },
            Field {
                name: "name",
                column: "name",
                value: |p| p.name.clone().map(SqlValue::from),
            },
        ];

        fn query_option(&self) -> &QueryOption {
            &self.query_option
        }

        fn pagination(&self) -> &PaginationParam {
            &self.pagination
        }
    }

    #[derive(Default)]
    struct SampleUpdate {
        name: Option<String>,
        owner_id: Option<i64>,
        updated_by: Option<String>,
    }

    impl Update for SampleUpdate {
        const FIELDS: &'static [Field<Self>] = &[
            Field {
                name: "owner_id",
                column: "fk_owner_id",
                value: |p| p.owner_id.map(SqlValue::from),
            },
            Field {
                name: "name",
                column: "name",
                value: |p| p.name.clone().map(SqlValue::from),
            },
        ];

        fn updated_by(&self) -> SqlValue {
            self.updated_by.clone().into()
        }
    }

    // -- build ---------------------------------------------------------------

    #[test]
    fn empty_filter_yields_bare_where() {
        let built = build(&SampleParam::default()).unwrap();
        assert_eq!(built.sql, " WHERE 1=1;");
        assert_eq!(built.count_sql, " WHERE 1=1;");
        assert!(built.args.is_empty());
        assert!(built.count_args.is_empty());
        assert!(!built.is_paged());
    }

    #[test]
    fn single_present_field_yields_one_placeholder() {
        let param = SampleParam {
            name: Some("alpha".into()),
            ..Default::default()
        };
        let built = build(&param).unwrap();
        assert_eq!(built.sql, " WHERE 1=1 AND name=?;");
        assert_eq!(built.args, vec![SqlValue::Text("alpha".into())]);
    }

    #[test]
    fn fields_render_in_declaration_order() {
        let param = SampleParam {
            name: Some("alpha".into()),
            id: Some(7),
            owner_id: Some(3),
            ..Default::default()
        };
        let built = build(&param).unwrap();
        assert_eq!(
            built.sql,
            " WHERE 1=1 AND id=? AND fk_owner_id=? AND name=?;"
        );
        assert_eq!(
            built.args,
            vec![
                SqlValue::Int(7),
                SqlValue::Int(3),
                SqlValue::Text("alpha".into())
            ]
        );
    }

    #[test]
    fn same_filter_builds_identical_sql() {
        let param = SampleParam {
            id: Some(1),
            name: Some("x".into()),
            ..Default::default()
        };
        assert_eq!(build(&param).unwrap(), build(&param).unwrap());
    }

    #[test]
    fn active_only_appends_status() {
        let param = SampleParam {
            id: Some(1),
            query_option: QueryOption::active(),
            ..Default::default()
        };
        let built = build(&param).unwrap();
        assert_eq!(built.sql, " WHERE 1=1 AND id=? AND status=1;");
        assert_eq!(built.count_sql, " WHERE 1=1 AND id=? AND status=1;");
    }

    #[test]
    fn pagination_limits_primary_fragment_only() {
        let param = SampleParam {
            id: Some(1),
            pagination: PaginationParam {
                include_pagination: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let built = build(&param).unwrap();
        assert_eq!(built.sql, " WHERE 1=1 AND id=? LIMIT 0, 10;");
        assert_eq!(built.count_sql, " WHERE 1=1 AND id=?;");
        assert_eq!(built.args, built.count_args);
        assert_eq!(built.page, 1);
        assert_eq!(built.limit, 10);
    }

    #[test]
    fn pagination_offset_uses_page_and_size() {
        let param = SampleParam {
            pagination: PaginationParam::page(3, 20),
            ..Default::default()
        };
        let built = build(&param).unwrap();
        assert_eq!(built.sql, " WHERE 1=1 LIMIT 40, 20;");
        assert_eq!(built.page, 3);
    }

    #[test]
    fn disable_limit_suppresses_limit() {
        let param = SampleParam {
            query_option: QueryOption {
                disable_limit: true,
                ..Default::default()
            },
            pagination: PaginationParam::page(2, 5),
            ..Default::default()
        };
        let built = build(&param).unwrap();
        assert_eq!(built.sql, " WHERE 1=1;");
        assert_eq!(built.limit, 0);
    }

    #[test]
    fn no_limit_without_include_pagination() {
        let param = SampleParam {
            pagination: PaginationParam {
                page: 2,
                limit: 5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(build(&param).unwrap().sql, " WHERE 1=1;");
    }

    #[test]
    fn sort_keys_map_to_columns() {
        let mut pagination = PaginationParam::page(1, 10);
        pagination.sort_by = vec!["owner_id".into(), "-created_at".into()];
        let param = SampleParam {
            pagination,
            ..Default::default()
        };
        let built = build(&param).unwrap();
        assert_eq!(
            built.sql,
            " WHERE 1=1 ORDER BY fk_owner_id ASC, created_at DESC LIMIT 0, 10;"
        );
        assert_eq!(built.count_sql, " WHERE 1=1;");
    }

    #[test]
    fn unknown_sort_key_fails() {
        let param = SampleParam {
            pagination: PaginationParam {
                sort_by: vec!["password; DROP TABLE x".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert_matches!(
            build(&param),
            Err(QueryBuilderError::UnknownSortColumn(_))
        );
    }

    #[test]
    fn raw_conditions_follow_status() {
        let param = SampleParam {
            id: Some(9),
            query_option: QueryOption {
                is_active: true,
                conditions: vec![RawCondition::new(
                    "created_at >= ?",
                    vec![SqlValue::Text("2024-01-01".into())],
                )],
                ..Default::default()
            },
            ..Default::default()
        };
        let built = build(&param).unwrap();
        assert_eq!(
            built.sql,
            " WHERE 1=1 AND id=? AND status=1 AND (created_at >= ?);"
        );
        assert_eq!(built.args.len(), 2);
    }

    #[test]
    fn raw_condition_placeholder_mismatch_fails() {
        let param = SampleParam {
            query_option: QueryOption {
                conditions: vec![RawCondition::new("a = ? OR b = ?", vec![SqlValue::Int(1)])],
                ..Default::default()
            },
            ..Default::default()
        };
        assert_matches!(
            build(&param),
            Err(QueryBuilderError::PlaceholderMismatch {
                placeholders: 2,
                args: 1,
                ..
            })
        );
    }

    #[test]
    fn blank_raw_condition_fails() {
        let param = SampleParam {
            query_option: QueryOption {
                conditions: vec![RawCondition::new("   ", vec![])],
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(build(&param), Err(QueryBuilderError::EmptyCondition));
    }

    // -- build_update --------------------------------------------------------

    #[test]
    fn update_renders_present_fields_then_updated_by() {
        let update = SampleUpdate {
            name: Some("renamed".into()),
            updated_by: Some("1".into()),
            ..Default::default()
        };
        let filter = SampleParam {
            id: Some(1),
            query_option: QueryOption::active(),
            ..Default::default()
        };
        let built = build_update(&update, &filter).unwrap();
        assert_eq!(
            built.sql,
            " SET name=?, updated_by=? WHERE 1=1 AND status=1 AND id=?"
        );
        assert_eq!(
            built.args,
            vec![
                SqlValue::Text("renamed".into()),
                SqlValue::Text("1".into()),
                SqlValue::Int(1)
            ]
        );
    }

    #[test]
    fn update_field_order_is_declaration_order() {
        let update = SampleUpdate {
            name: Some("n".into()),
            owner_id: Some(4),
            updated_by: None,
        };
        let built = build_update(&update, &SampleParam::default()).unwrap();
        assert_eq!(built.sql, " SET fk_owner_id=?, name=?, updated_by=? WHERE 1=1");
        assert_eq!(built.args[2], SqlValue::Null);
    }

    #[test]
    fn update_never_renders_limit() {
        let update = SampleUpdate {
            name: Some("n".into()),
            ..Default::default()
        };
        let filter = SampleParam {
            id: Some(2),
            pagination: PaginationParam::page(1, 10),
            ..Default::default()
        };
        let built = build_update(&update, &filter).unwrap();
        assert!(!built.sql.contains("LIMIT"));
    }

    #[test]
    fn update_without_present_fields_fails() {
        let update = SampleUpdate {
            updated_by: Some("1".into()),
            ..Default::default()
        };
        let filter = SampleParam {
            id: Some(1),
            ..Default::default()
        };
        assert_eq!(
            build_update(&update, &filter),
            Err(QueryBuilderError::NothingToUpdate)
        );
    }
}
