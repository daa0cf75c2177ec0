//! Contact-form message model and DTOs.

use khayroukum_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `contact_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactMessage {
    pub id: DbId,
    pub nom: String,
    pub email: String,
    pub sujet: Option<String>,
    pub message: String,
    pub statut: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateContactMessage {
    pub nom: String,
    pub email: String,
    pub sujet: Option<String>,
    pub message: String,
}
