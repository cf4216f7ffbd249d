//! Options shared by every filter parameter.
//!
//! Entity filters hold a [`QueryOption`] and a [`PaginationParam`] as named
//! fields; the query builder reads them through the [`Filter`](crate::query::Filter)
//! trait.

use crate::value::SqlValue;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Page used when the caller leaves `page` unset or non-positive.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller leaves `limit` unset or non-positive.
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest page size a caller may request.
pub const MAX_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Query options
// ---------------------------------------------------------------------------

/// A caller-supplied WHERE fragment with its own positional arguments.
///
/// The fragment is wrapped in parentheses and AND-ed onto the generated
/// clause. The number of `?` placeholders must match `args`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCondition {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

impl RawCondition {
    pub fn new(sql: impl Into<String>, args: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

/// Row-selection options that are not tied to a single column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOption {
    /// Restrict to live rows (`status=1`).
    pub is_active: bool,
    /// Never render a LIMIT, even when pagination is requested.
    pub disable_limit: bool,
    /// Extra WHERE fragments, appended after the field conditions.
    pub conditions: Vec<RawCondition>,
}

impl QueryOption {
    /// Options selecting live rows only.
    pub fn active() -> Self {
        Self {
            is_active: true,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination request
// ---------------------------------------------------------------------------

/// Paging request attached to a list filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationParam {
    /// 1-based page number.
    pub page: i64,
    /// Page size.
    pub limit: i64,
    /// Render ORDER/LIMIT and compute totals.
    pub include_pagination: bool,
    /// Sort keys; a leading `-` sorts descending.
    pub sort_by: Vec<String>,
}

impl PaginationParam {
    /// Request page `page` of size `limit` with totals.
    pub fn page(page: i64, limit: i64) -> Self {
        Self {
            page,
            limit,
            include_pagination: true,
            sort_by: Vec::new(),
        }
    }

    /// The requested page, falling back to [`DEFAULT_PAGE`].
    pub fn normalized_page(&self) -> i64 {
        if self.page > 0 {
            self.page
        } else {
            DEFAULT_PAGE
        }
    }

    /// The requested page size, falling back to [`DEFAULT_LIMIT`] and capped at [`MAX_LIMIT`].
    pub fn normalized_limit(&self) -> i64 {
        if self.limit > 0 {
            self.limit.min(MAX_LIMIT)
        } else {
            DEFAULT_LIMIT
        }
    }

    /// Row offset of the first element on the requested page.
    pub fn offset(&self) -> i64 {
        (self.normalized_page() - 1).saturating_mul(self.normalized_limit())
    }
}
