//! Technical document model and DTOs.

use khayroukum_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `documents_techniques` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentTechnique {
    pub id: DbId,
    pub projet_id: DbId,
    pub titre: String,
    pub type_document: String,
    pub file_path: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploaded_by: DbId,
    pub review_status: String,
    pub review_comment: Option<String>,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording an uploaded document.
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub projet_id: DbId,
    pub titre: String,
    pub type_document: String,
    pub file_path: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploaded_by: DbId,
}

/// DTO for an administrator's review of a document.
#[derive(Debug, Clone)]
pub struct ReviewDocument {
    pub review_status: String,
    pub review_comment: Option<String>,
    pub reviewed_by: DbId,
}
