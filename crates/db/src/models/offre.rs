//! Funding offer model and DTOs.

use khayroukum_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `offres_financement` table, joined with the donor name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OffreFinancement {
    pub id: DbId,
    pub projet_id: DbId,
    pub donateur_id: DbId,
    pub donateur_nom: String,
    pub montant: f64,
    pub nom_sur_tableau: Option<String>,
    pub message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public donor-board entry for a projet.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DonorBoardEntry {
    /// `nom_sur_tableau`, or `None` for anonymous pledges.
    pub nom: Option<String>,
    pub montant: f64,
    pub message: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new offer.
#[derive(Debug, Clone)]
pub struct CreateOffre {
    pub projet_id: DbId,
    pub donateur_id: DbId,
    pub montant: f64,
    pub nom_sur_tableau: Option<String>,
    pub message: Option<String>,
}
