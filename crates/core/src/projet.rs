//! Projet lifecycle vocabulary and transition rules.
//!
//! A projet is submitted `en_attente`, validated by an administrator into
//! `valide`, then moved by administrators to `en_cours` and finally
//! `termine`. No other transition exists and prestataire edits never touch
//! the status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const STATUT_EN_ATTENTE: &str = "en_attente";
pub const STATUT_VALIDE: &str = "valide";
pub const STATUT_EN_COURS: &str = "en_cours";
pub const STATUT_TERMINE: &str = "termine";

/// All canonical status values, in lifecycle order.
pub const VALID_STATUTS: &[&str] = &[
    STATUT_EN_ATTENTE,
    STATUT_VALIDE,
    STATUT_EN_COURS,
    STATUT_TERMINE,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjetStatut {
    EnAttente,
    Valide,
    EnCours,
    Termine,
}

impl ProjetStatut {
    pub const ALL: [ProjetStatut; 4] = [
        ProjetStatut::EnAttente,
        ProjetStatut::Valide,
        ProjetStatut::EnCours,
        ProjetStatut::Termine,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjetStatut::EnAttente => STATUT_EN_ATTENTE,
            ProjetStatut::Valide => STATUT_VALIDE,
            ProjetStatut::EnCours => STATUT_EN_COURS,
            ProjetStatut::Termine => STATUT_TERMINE,
        }
    }

    /// Parse a status name. The accented spelling `terminé` found in older
    /// records is accepted as `termine`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            STATUT_EN_ATTENTE => Some(ProjetStatut::EnAttente),
            STATUT_VALIDE => Some(ProjetStatut::Valide),
            STATUT_EN_COURS => Some(ProjetStatut::EnCours),
            STATUT_TERMINE | "terminé" => Some(ProjetStatut::Termine),
            _ => None,
        }
    }

    /// Whether projets in this status are visible to donors and the public.
    pub fn is_public(self) -> bool {
        !matches!(self, ProjetStatut::EnAttente)
    }
}

impl std::fmt::Display for ProjetStatut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a status coming from request input, mapping failures to a
/// validation error.
pub fn parse_statut(value: &str) -> Result<ProjetStatut, CoreError> {
    ProjetStatut::parse(value).ok_or_else(|| {
        CoreError::Validation(format!(
            "Invalid statut '{value}'. Must be one of: {}",
            VALID_STATUTS.join(", ")
        ))
    })
}

/// Check that a projet in `current` status may be validated.
pub fn validate_validation(current: ProjetStatut) -> Result<(), CoreError> {
    match current {
        ProjetStatut::EnAttente => Ok(()),
        ProjetStatut::Valide => Err(CoreError::Conflict(
            "Projet is already validated".into(),
        )),
        other => Err(CoreError::Conflict(format!(
            "Projet with statut '{other}' cannot be validated"
        ))),
    }
}

/// Check an administrator-driven status change after validation.
pub fn validate_admin_transition(from: ProjetStatut, to: ProjetStatut) -> Result<(), CoreError> {
    match (from, to) {
        (ProjetStatut::Valide, ProjetStatut::EnCours)
        | (ProjetStatut::EnCours, ProjetStatut::Termine) => Ok(()),
        (_, ProjetStatut::Valide) => Err(CoreError::Conflict(
            "Use the valider action to validate a projet".into(),
        )),
        (from, to) => Err(CoreError::Conflict(format!(
            "Transition from '{from}' to '{to}' is not allowed"
        ))),
    }
}

/// Funding offers are accepted on validated projets only.
pub fn is_fundable(statut: ProjetStatut) -> bool {
    statut == ProjetStatut::Valide
}

/// `date_fin` may not precede `date_debut` when both are present.
pub fn validate_dates(debut: Option<NaiveDate>, fin: Option<NaiveDate>) -> Result<(), CoreError> {
    match (debut, fin) {
        (Some(d), Some(f)) if f < d => Err(CoreError::Validation(
            "date_fin must be on or after date_debut".into(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_accepts_canonical_names() {
        for name in VALID_STATUTS {
            let statut = ProjetStatut::parse(name).expect("canonical name must parse");
            assert_eq!(statut.as_str(), *name);
        }
    }

    #[test]
    fn parse_accepts_accented_termine() {
        assert_eq!(ProjetStatut::parse("terminé"), Some(ProjetStatut::Termine));
    }

    #[test]
    fn parse_statut_reports_valid_values() {
        let err = parse_statut("brouillon").unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("en_attente"));
    }

    #[test]
    fn only_pending_projets_can_be_validated() {
        assert!(validate_validation(ProjetStatut::EnAttente).is_ok());
        assert_matches!(
            validate_validation(ProjetStatut::Valide),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            validate_validation(ProjetStatut::Termine),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn admin_transitions_follow_lifecycle() {
        assert!(validate_admin_transition(ProjetStatut::Valide, ProjetStatut::EnCours).is_ok());
        assert!(validate_admin_transition(ProjetStatut::EnCours, ProjetStatut::Termine).is_ok());
    }

    #[test]
    fn admin_transitions_reject_skips_and_reversals() {
        assert!(validate_admin_transition(ProjetStatut::EnAttente, ProjetStatut::EnCours).is_err());
        assert!(validate_admin_transition(ProjetStatut::Valide, ProjetStatut::Termine).is_err());
        assert!(validate_admin_transition(ProjetStatut::Termine, ProjetStatut::EnCours).is_err());
        assert!(validate_admin_transition(ProjetStatut::EnAttente, ProjetStatut::Valide).is_err());
    }

    #[test]
    fn only_validated_projets_are_fundable() {
        assert!(is_fundable(ProjetStatut::Valide));
        assert!(!is_fundable(ProjetStatut::EnAttente));
        assert!(!is_fundable(ProjetStatut::EnCours));
        assert!(!is_fundable(ProjetStatut::Termine));
    }

    #[test]
    fn pending_projets_are_not_public() {
        assert!(!ProjetStatut::EnAttente.is_public());
        assert!(ProjetStatut::Valide.is_public());
        assert!(ProjetStatut::Termine.is_public());
    }

    #[test]
    fn dates_must_be_ordered() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 1);
        let f = NaiveDate::from_ymd_opt(2025, 2, 1);
        assert!(validate_dates(d, f).is_err());
        assert!(validate_dates(f, d).is_ok());
        assert!(validate_dates(d, None).is_ok());
        assert!(validate_dates(None, None).is_ok());
    }
}
