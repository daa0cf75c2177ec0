//! Shared response envelope types for API handlers.
//!
//! Successful responses use a `{ "data": ... }` envelope; paginated listings
//! add a `meta` block.

use khayroukum_core::site::last_page;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "meta": {...} }` envelope for paginated listings.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub last_page: i64,
}

impl PageMeta {
    pub fn new(current_page: i64, per_page: i64, total: i64) -> Self {
        Self {
            current_page,
            per_page,
            total,
            last_page: last_page(total, per_page),
        }
    }
}

/// Confirmation body for actions that have nothing else to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_meta_computes_last_page() {
        let meta = PageMeta::new(2, 20, 45);
        assert_eq!(meta.last_page, 3);
        assert_eq!(PageMeta::new(1, 20, 0).last_page, 1);
    }

    #[test]
    fn paginated_response_serializes_meta() {
        let body = PaginatedResponse {
            data: vec![1, 2],
            meta: PageMeta::new(1, 2, 2),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["meta"]["total"], 2);
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
    }
}
