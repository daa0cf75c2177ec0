//! Shared query parameter types for API handlers.

use khayroukum_core::site::{clamp_page, clamp_per_page, page_offset};
use serde::Deserialize;

/// Page-based pagination (`?page=&per_page=`). `per_page` is clamped to
/// `1..=100` and defaults to 20.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageParams {
    /// Resolve to `(page, per_page, offset)`.
    pub fn resolve(&self) -> (i64, i64, i64) {
        let page = clamp_page(self.page);
        let per_page = clamp_per_page(self.per_page);
        (page, per_page, page_offset(page, per_page))
    }
}

/// Offset pagination (`?limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Limit clamped to `1..=100` (default 20) and a non-negative offset.
    pub fn resolve(&self) -> (i64, i64) {
        (clamp_per_page(self.limit), self.offset.unwrap_or(0).max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_default_to_first_page() {
        assert_eq!(PageParams::default().resolve(), (1, 20, 0));
        let p = PageParams {
            page: Some(3),
            per_page: Some(500),
        };
        assert_eq!(p.resolve(), (3, 100, 200));
    }

    #[test]
    fn negative_offset_is_zeroed() {
        let p = PaginationParams {
            limit: Some(0),
            offset: Some(-4),
        };
        assert_eq!(p.resolve(), (1, 0));
    }
}
