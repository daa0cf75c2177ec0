//! Repository for the `contact_messages` table.

use khayroukum_core::site::CONTACT_LU;
use khayroukum_core::types::DbId;
use sqlx::PgPool;

use crate::models::contact::{ContactMessage, CreateContactMessage};

const COLUMNS: &str = "id, nom, email, sujet, message, statut, created_at, updated_at";

pub struct ContactMessageRepo;

impl ContactMessageRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateContactMessage,
    ) -> Result<ContactMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_messages (nom, email, sujet, message)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(&input.nom)
            .bind(&input.email)
            .bind(&input.sujet)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// Newest first, optionally filtered by `statut`.
    pub async fn list(
        pool: &PgPool,
        statut: Option<&str>,
    ) -> Result<Vec<ContactMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_messages
             WHERE ($1::text IS NULL OR statut = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(statut)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, statut: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM contact_messages WHERE ($1::text IS NULL OR statut = $1)",
        )
        .bind(statut)
        .fetch_one(pool)
        .await
    }

    pub async fn mark_read(pool: &PgPool, id: DbId) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_messages SET statut = '{CONTACT_LU}' WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
