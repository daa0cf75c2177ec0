//! Authorization predicates.
//!
//! Each resource is guarded by a boolean check over the calling [`Actor`]
//! and the ownership/status facts of the record. Handlers translate a
//! `false` into a 403 response.

use crate::projet::{self, ProjetStatut};
use crate::roles::Role;
use crate::types::DbId;

/// The authenticated caller, as seen by policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    fn owns(&self, owner_id: DbId) -> bool {
        self.user_id == owner_id
    }
}

// ---------------------------------------------------------------------------
// Villages
// ---------------------------------------------------------------------------

pub fn can_create_village(actor: &Actor) -> bool {
    matches!(actor.role, Role::Administrateur | Role::Prestataire)
}

pub fn can_manage_village(actor: &Actor, village_creator: DbId) -> bool {
    actor.is_admin() || actor.owns(village_creator)
}

// ---------------------------------------------------------------------------
// Projets
// ---------------------------------------------------------------------------

pub fn can_create_projet(actor: &Actor) -> bool {
    matches!(actor.role, Role::Administrateur | Role::Prestataire)
}

/// Pending projets are visible to administrators and their creator only.
/// Once public, any authenticated role may read them, as anonymous
/// visitors can through the public listing.
pub fn can_view_projet(actor: &Actor, creator: DbId, statut: ProjetStatut) -> bool {
    actor.is_admin() || actor.owns(creator) || statut.is_public()
}

/// Creators may edit their projet until an administrator validates it.
pub fn can_update_projet(actor: &Actor, creator: DbId, statut: ProjetStatut) -> bool {
    actor.is_admin() || (actor.owns(creator) && statut == ProjetStatut::EnAttente)
}

pub fn can_delete_projet(actor: &Actor, creator: DbId, statut: ProjetStatut) -> bool {
    can_update_projet(actor, creator, statut)
}

pub fn can_validate_projet(actor: &Actor) -> bool {
    actor.is_admin()
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Only the creator of the parent projet may attach documents to it.
pub fn can_upload_document(actor: &Actor, projet_creator: DbId) -> bool {
    actor.owns(projet_creator)
}

pub fn can_delete_document(actor: &Actor, uploader: DbId) -> bool {
    actor.is_admin() || actor.owns(uploader)
}

// ---------------------------------------------------------------------------
// Funding offers
// ---------------------------------------------------------------------------

/// Reasons a funding offer is refused, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingDenial {
    NotDonor,
    NotVerified,
    ProjetNotFundable,
}

impl FundingDenial {
    pub fn message(self) -> &'static str {
        match self {
            FundingDenial::NotDonor => "Only donors can create funding offers",
            FundingDenial::NotVerified => "Your donor account must be verified before funding",
            FundingDenial::ProjetNotFundable => "Only validated projets can receive funding offers",
        }
    }
}

/// A donor may fund a projet once their account is verified and the projet
/// has been validated.
pub fn check_funding(
    actor: &Actor,
    donor_is_verified: bool,
    statut: ProjetStatut,
) -> Result<(), FundingDenial> {
    if actor.role != Role::Donateur {
        return Err(FundingDenial::NotDonor);
    }
    if !donor_is_verified {
        return Err(FundingDenial::NotVerified);
    }
    if !projet::is_fundable(statut) {
        return Err(FundingDenial::ProjetNotFundable);
    }
    Ok(())
}

pub fn can_fund(actor: &Actor, donor_is_verified: bool, statut: ProjetStatut) -> bool {
    check_funding(actor, donor_is_verified, statut).is_ok()
}

/// Full offer listings of a projet are for administrators and the projet
/// creator. Donors get their own offers through a filtered listing.
pub fn can_view_offres(actor: &Actor, projet_creator: DbId) -> bool {
    actor.is_admin() || actor.owns(projet_creator)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: Actor = Actor {
        user_id: 1,
        role: Role::Administrateur,
    };
    const PRESTATAIRE: Actor = Actor {
        user_id: 2,
        role: Role::Prestataire,
    };
    const OTHER_PRESTATAIRE: Actor = Actor {
        user_id: 3,
        role: Role::Prestataire,
    };
    const DONATEUR: Actor = Actor {
        user_id: 4,
        role: Role::Donateur,
    };

    #[test]
    fn prestataire_and_admin_can_create_villages() {
        assert!(can_create_village(&PRESTATAIRE));
        assert!(can_create_village(&ADMIN));
        assert!(!can_create_village(&DONATEUR));
    }

    #[test]
    fn village_management_requires_ownership_or_admin() {
        assert!(can_manage_village(&PRESTATAIRE, 2));
        assert!(can_manage_village(&ADMIN, 2));
        assert!(!can_manage_village(&OTHER_PRESTATAIRE, 2));
    }

    #[test]
    fn pending_projet_hidden_from_donors_and_other_prestataires() {
        assert!(can_view_projet(&PRESTATAIRE, 2, ProjetStatut::EnAttente));
        assert!(can_view_projet(&ADMIN, 2, ProjetStatut::EnAttente));
        assert!(!can_view_projet(&DONATEUR, 2, ProjetStatut::EnAttente));
        assert!(!can_view_projet(&OTHER_PRESTATAIRE, 2, ProjetStatut::EnAttente));
        assert!(can_view_projet(&DONATEUR, 2, ProjetStatut::Valide));
    }

    #[test]
    fn public_projets_visible_to_every_role() {
        for statut in [ProjetStatut::Valide, ProjetStatut::EnCours, ProjetStatut::Termine] {
            assert!(can_view_projet(&DONATEUR, 2, statut));
            assert!(can_view_projet(&OTHER_PRESTATAIRE, 2, statut));
            assert!(can_view_projet(&ADMIN, 2, statut));
        }
    }

    #[test]
    fn creator_loses_edit_rights_after_validation() {
        assert!(can_update_projet(&PRESTATAIRE, 2, ProjetStatut::EnAttente));
        assert!(!can_update_projet(&PRESTATAIRE, 2, ProjetStatut::Valide));
        assert!(can_update_projet(&ADMIN, 2, ProjetStatut::Valide));
        assert!(!can_delete_projet(&OTHER_PRESTATAIRE, 2, ProjetStatut::EnAttente));
    }

    #[test]
    fn only_admin_validates() {
        assert!(can_validate_projet(&ADMIN));
        assert!(!can_validate_projet(&PRESTATAIRE));
        assert!(!can_validate_projet(&DONATEUR));
    }

    #[test]
    fn document_upload_requires_projet_creator() {
        assert!(can_upload_document(&PRESTATAIRE, 2));
        assert!(!can_upload_document(&OTHER_PRESTATAIRE, 2));
        assert!(!can_upload_document(&ADMIN, 2));
    }

    #[test]
    fn document_delete_by_uploader_or_admin() {
        assert!(can_delete_document(&PRESTATAIRE, 2));
        assert!(can_delete_document(&ADMIN, 2));
        assert!(!can_delete_document(&DONATEUR, 2));
    }

    #[test]
    fn unverified_donor_cannot_fund() {
        assert_eq!(
            check_funding(&DONATEUR, false, ProjetStatut::Valide),
            Err(FundingDenial::NotVerified)
        );
    }

    #[test]
    fn verified_donor_funds_validated_projet_only() {
        assert!(can_fund(&DONATEUR, true, ProjetStatut::Valide));
        assert_eq!(
            check_funding(&DONATEUR, true, ProjetStatut::EnAttente),
            Err(FundingDenial::ProjetNotFundable)
        );
    }

    #[test]
    fn non_donors_cannot_fund() {
        assert_eq!(
            check_funding(&ADMIN, true, ProjetStatut::Valide),
            Err(FundingDenial::NotDonor)
        );
        assert!(!can_fund(&PRESTATAIRE, true, ProjetStatut::Valide));
    }

    #[test]
    fn offre_listing_for_admin_and_creator() {
        assert!(can_view_offres(&ADMIN, 2));
        assert!(can_view_offres(&PRESTATAIRE, 2));
        assert!(!can_view_offres(&DONATEUR, 2));
    }
}
