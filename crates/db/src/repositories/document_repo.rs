//! Repository for the `documents_techniques` table.

use khayroukum_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{CreateDocument, DocumentTechnique, ReviewDocument};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, projet_id, titre, type_document, file_path, original_name, \
                       mime_type, size_bytes, uploaded_by, review_status, review_comment, \
                       reviewed_by, reviewed_at, created_at, updated_at";

/// Provides CRUD operations for technical documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Record an uploaded document, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDocument,
    ) -> Result<DocumentTechnique, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents_techniques
                (projet_id, titre, type_document, file_path, original_name, mime_type, size_bytes, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocumentTechnique>(&query)
            .bind(input.projet_id)
            .bind(&input.titre)
            .bind(&input.type_document)
            .bind(&input.file_path)
            .bind(&input.original_name)
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Find a document by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DocumentTechnique>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents_techniques WHERE id = $1");
        sqlx::query_as::<_, DocumentTechnique>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the documents attached to a projet, newest first.
    pub async fn list_by_projet(
        pool: &PgPool,
        projet_id: DbId,
    ) -> Result<Vec<DocumentTechnique>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents_techniques
             WHERE projet_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, DocumentTechnique>(&query)
            .bind(projet_id)
            .fetch_all(pool)
            .await
    }

    /// Stored file paths for every document of a projet, so the files can be
    /// removed before the rows cascade away.
    pub async fn file_paths_for_projet(
        pool: &PgPool,
        projet_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT file_path FROM documents_techniques WHERE projet_id = $1")
            .bind(projet_id)
            .fetch_all(pool)
            .await
    }

    /// Stored file paths for every document of every projet in a village.
    pub async fn file_paths_for_village(
        pool: &PgPool,
        village_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT d.file_path FROM documents_techniques d
             JOIN projets p ON p.id = d.projet_id
             WHERE p.village_id = $1",
        )
        .bind(village_id)
        .fetch_all(pool)
        .await
    }

    /// Files removed by the cascade when a user is deleted: documents they
    /// uploaded plus every document under their projets and villages.
    pub async fn file_paths_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT d.file_path FROM documents_techniques d
             JOIN projets p ON p.id = d.projet_id
             JOIN villages v ON v.id = p.village_id
             WHERE d.uploaded_by = $1 OR p.created_by = $1 OR v.created_by = $1",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Record an administrator's review decision.
    pub async fn review(
        pool: &PgPool,
        id: DbId,
        input: &ReviewDocument,
    ) -> Result<Option<DocumentTechnique>, sqlx::Error> {
        let query = format!(
            "UPDATE documents_techniques SET
                review_status = $2,
                review_comment = $3,
                reviewed_by = $4,
                reviewed_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocumentTechnique>(&query)
            .bind(id)
            .bind(&input.review_status)
            .bind(&input.review_comment)
            .bind(input.reviewed_by)
            .fetch_optional(pool)
            .await
    }

    /// Delete a document row, returning it so the caller can remove the file.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DocumentTechnique>, sqlx::Error> {
        let query = format!("DELETE FROM documents_techniques WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, DocumentTechnique>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
