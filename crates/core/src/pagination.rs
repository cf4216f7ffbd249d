//! Pagination metadata returned alongside list results.

use serde::Serialize;

/// Page metadata, recomputed on every list call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: i64,
    pub current_elements: i64,
    pub total_pages: i64,
    pub total_elements: i64,
    pub sort_by: Vec<String>,
}

impl Pagination {
    pub fn new(current_page: i64, current_elements: i64, sort_by: Vec<String>) -> Self {
        Self {
            current_page,
            current_elements,
            sort_by,
            ..Self::default()
        }
    }

    /// Derive `total_pages` from `total_elements` and the page size.
    ///
    /// A non-positive `limit` means the list was not paged: everything is on
    /// one page.
    pub fn process(&mut self, limit: i64) {
        self.total_pages = if limit > 0 {
            let full = self.total_elements / limit;
            if self.total_elements % limit > 0 {
                full + 1
            } else {
                full
            }
        } else {
            1
        };
    }
}
