//! Village entity model and DTOs.

use khayroukum_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A village row from the `villages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Village {
    pub id: DbId,
    pub nom: String,
    pub region: String,
    pub commune: Option<String>,
    pub population: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub statut: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Village with its projet count, used by listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VillageSummary {
    pub id: DbId,
    pub nom: String,
    pub region: String,
    pub commune: Option<String>,
    pub population: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub statut: String,
    pub projets_count: i64,
}

/// DTO for creating a new village.
#[derive(Debug, Clone)]
pub struct CreateVillage {
    pub nom: String,
    pub region: String,
    pub commune: Option<String>,
    pub population: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    /// Defaults to `actif` if omitted.
    pub statut: Option<String>,
    pub created_by: DbId,
}

/// DTO for updating an existing village. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateVillage {
    pub nom: Option<String>,
    pub region: Option<String>,
    pub commune: Option<String>,
    pub population: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub statut: Option<String>,
}
