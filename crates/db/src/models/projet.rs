//! Projet entity model and DTOs.

use chrono::NaiveDate;
use khayroukum_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A projet row from the `projets` table.
///
/// `budget` is stored as `NUMERIC(14,2)` and read back as `float8`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Projet {
    pub id: DbId,
    pub titre: String,
    pub description: String,
    pub type_projet: Option<String>,
    pub budget: f64,
    pub date_debut: Option<NaiveDate>,
    pub date_fin: Option<NaiveDate>,
    pub statut: String,
    pub village_id: DbId,
    pub created_by: DbId,
    pub validated_by: Option<DbId>,
    pub validated_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A projet joined with its village and funding totals.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjetWithFunding {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub projet: Projet,
    pub village_nom: String,
    pub village_region: String,
    pub montant_collecte: f64,
    pub offres_count: i64,
}

/// DTO for creating a new projet. New projets always start `en_attente`.
#[derive(Debug, Clone)]
pub struct CreateProjet {
    pub titre: String,
    pub description: String,
    pub type_projet: Option<String>,
    pub budget: f64,
    pub date_debut: Option<NaiveDate>,
    pub date_fin: Option<NaiveDate>,
    pub village_id: DbId,
    pub created_by: DbId,
}

/// DTO for updating an existing projet. The status is not part of it:
/// status changes go through the dedicated repository methods.
#[derive(Debug, Clone, Default)]
pub struct UpdateProjet {
    pub titre: Option<String>,
    pub description: Option<String>,
    pub type_projet: Option<String>,
    pub budget: Option<f64>,
    pub date_debut: Option<NaiveDate>,
    pub date_fin: Option<NaiveDate>,
    pub village_id: Option<DbId>,
}

/// Listing filters for projets.
#[derive(Debug, Clone, Default)]
pub struct ProjetFilter {
    pub statut: Option<String>,
    pub created_by: Option<DbId>,
    pub village_id: Option<DbId>,
    pub region: Option<String>,
    /// Restrict to statuses visible to donors and the public.
    pub public_only: bool,
    pub limit: Option<i64>,
}
