//! In-app notifications.
//!
//! A [`Notice`] describes what happened; a [`Notifier`] stores one row per
//! recipient and publishes `notification.created` on the event bus so the
//! mail dispatcher can follow up by e-mail. Delivery failures are logged and
//! never fail the request that triggered them.

use khayroukum_core::roles::ROLE_ADMIN;
use khayroukum_core::types::DbId;
use khayroukum_db::models::contact::ContactMessage;
use khayroukum_db::models::document::DocumentTechnique;
use khayroukum_db::models::notification::{CreateNotification, Notification};
use khayroukum_db::models::offre::OffreFinancement;
use khayroukum_db::models::projet::Projet;
use khayroukum_db::repositories::{NotificationRepo, UserRepo};
use khayroukum_db::DbPool;
use khayroukum_events::bus::EVENT_NOTIFICATION_CREATED;
use khayroukum_events::{EventBus, PlatformEvent};
use serde_json::json;

pub const KIND_PROJET_SOUMIS: &str = "projet_soumis";
pub const KIND_PROJET_VALIDE: &str = "projet_valide";
pub const KIND_PROJET_STATUT: &str = "projet_statut";
pub const KIND_DOCUMENT_AJOUTE: &str = "document_ajoute";
pub const KIND_DOCUMENT_REVISE: &str = "document_revise";
pub const KIND_OFFRE_RECUE: &str = "offre_recue";
pub const KIND_COMPTE_VERIFIE: &str = "compte_verifie";
pub const KIND_CONTACT_RECU: &str = "contact_recu";

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// Content of a notification, independent of its recipients.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: &'static str,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
}

impl Notice {
    pub fn projet_soumis(projet: &Projet) -> Self {
        Self {
            kind: KIND_PROJET_SOUMIS,
            title: "Nouveau projet soumis".into(),
            message: format!(
                "Le projet « {} » a été soumis et attend votre validation.",
                projet.titre
            ),
            data: json!({ "projet_id": projet.id }),
        }
    }

    pub fn projet_valide(projet: &Projet) -> Self {
        Self {
            kind: KIND_PROJET_VALIDE,
            title: "Projet validé".into(),
            message: format!(
                "Votre projet « {} » a été validé et peut désormais recevoir des financements.",
                projet.titre
            ),
            data: json!({ "projet_id": projet.id }),
        }
    }

    pub fn projet_statut(projet: &Projet) -> Self {
        Self {
            kind: KIND_PROJET_STATUT,
            title: "Statut du projet mis à jour".into(),
            message: format!(
                "Le projet « {} » est maintenant « {} ».",
                projet.titre, projet.statut
            ),
            data: json!({ "projet_id": projet.id, "statut": projet.statut }),
        }
    }

    pub fn document_ajoute(document: &DocumentTechnique, projet_titre: &str) -> Self {
        Self {
            kind: KIND_DOCUMENT_AJOUTE,
            title: "Nouveau document technique".into(),
            message: format!(
                "Le document « {} » a été ajouté au projet « {projet_titre} ».",
                document.titre
            ),
            data: json!({ "projet_id": document.projet_id, "document_id": document.id }),
        }
    }

    pub fn document_revise(document: &DocumentTechnique) -> Self {
        let verdict = match document.review_status.as_str() {
            khayroukum_core::document::REVIEW_APPROVED => "approuvé",
            _ => "rejeté",
        };
        let mut message = format!("Votre document « {} » a été {verdict}.", document.titre);
        if let Some(comment) = &document.review_comment {
            message.push_str(&format!(" Commentaire : {comment}"));
        }
        Self {
            kind: KIND_DOCUMENT_REVISE,
            title: "Document révisé".into(),
            message,
            data: json!({
                "projet_id": document.projet_id,
                "document_id": document.id,
                "review_status": document.review_status,
            }),
        }
    }

    pub fn offre_recue(offre: &OffreFinancement, projet_titre: &str) -> Self {
        Self {
            kind: KIND_OFFRE_RECUE,
            title: "Nouvelle offre de financement".into(),
            message: format!(
                "{} a proposé {:.2} FCFA pour le projet « {projet_titre} ».",
                offre.donateur_nom, offre.montant
            ),
            data: json!({
                "projet_id": offre.projet_id,
                "offre_id": offre.id,
                "montant": offre.montant,
            }),
        }
    }

    pub fn compte_verifie() -> Self {
        Self {
            kind: KIND_COMPTE_VERIFIE,
            title: "Compte vérifié".into(),
            message: "Votre compte a été vérifié par un administrateur.".into(),
            data: json!({}),
        }
    }

    pub fn contact_recu(contact: &ContactMessage) -> Self {
        let sujet = contact.sujet.as_deref().unwrap_or("(sans sujet)");
        Self {
            kind: KIND_CONTACT_RECU,
            title: "Nouveau message de contact".into(),
            message: format!("{} <{}> : {sujet}", contact.nom, contact.email),
            data: json!({ "contact_message_id": contact.id }),
        }
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Writes notifications and announces them on the event bus.
pub struct Notifier<'a> {
    pool: &'a DbPool,
    bus: &'a EventBus,
}

impl<'a> Notifier<'a> {
    pub fn new(pool: &'a DbPool, bus: &'a EventBus) -> Self {
        Self { pool, bus }
    }

    /// Notify one user.
    pub async fn notify(&self, user_id: DbId, notice: &Notice) {
        if let Err(e) = self.deliver(user_id, notice).await {
            tracing::error!(error = %e, user_id, kind = notice.kind, "Failed to store notification");
        }
    }

    /// Notify every administrateur, skipping `except` (usually the actor).
    pub async fn notify_admins(&self, notice: &Notice, except: Option<DbId>) {
        let admin_ids = match UserRepo::list_ids_by_role(self.pool, ROLE_ADMIN).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(error = %e, kind = notice.kind, "Failed to list administrateurs");
                return;
            }
        };
        for admin_id in admin_ids.into_iter().filter(|id| Some(*id) != except) {
            self.notify(admin_id, notice).await;
        }
    }

    async fn deliver(&self, user_id: DbId, notice: &Notice) -> Result<Notification, sqlx::Error> {
        let notification = NotificationRepo::create(
            self.pool,
            &CreateNotification {
                user_id,
                kind: notice.kind.to_string(),
                title: notice.title.clone(),
                message: notice.message.clone(),
                data: notice.data.clone(),
            },
        )
        .await?;

        self.bus.publish(
            PlatformEvent::new(EVENT_NOTIFICATION_CREATED)
                .with_source("notification", notification.id)
                .with_payload(json!({
                    "user_id": user_id,
                    "kind": notice.kind,
                    "title": notice.title,
                    "message": notice.message,
                })),
        );
        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn projet(statut: &str) -> Projet {
        Projet {
            id: 9,
            titre: "Forage de Sanankoroba".into(),
            description: "Puits".into(),
            type_projet: Some("eau".into()),
            budget: 1_500_000.0,
            date_debut: None,
            date_fin: None,
            statut: statut.into(),
            village_id: 1,
            created_by: 2,
            validated_by: None,
            validated_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn projet_notices_reference_the_projet() {
        let notice = Notice::projet_valide(&projet("valide"));
        assert_eq!(notice.kind, KIND_PROJET_VALIDE);
        assert!(notice.message.contains("Forage de Sanankoroba"));
        assert_eq!(notice.data["projet_id"], 9);

        let notice = Notice::projet_statut(&projet("en_cours"));
        assert_eq!(notice.data["statut"], "en_cours");
    }

    #[test]
    fn rejected_document_notice_carries_comment() {
        let doc = DocumentTechnique {
            id: 4,
            projet_id: 9,
            titre: "Plan du forage".into(),
            type_document: "plan".into(),
            file_path: "documents/9/a.pdf".into(),
            original_name: "plan.pdf".into(),
            mime_type: "application/pdf".into(),
            size_bytes: 10,
            uploaded_by: 2,
            review_status: "rejected".into(),
            review_comment: Some("Échelle manquante".into()),
            reviewed_by: Some(1),
            reviewed_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let notice = Notice::document_revise(&doc);
        assert!(notice.message.contains("rejeté"));
        assert!(notice.message.contains("Échelle manquante"));
    }

    #[test]
    fn offre_notice_formats_amount() {
        let offre = OffreFinancement {
            id: 3,
            projet_id: 9,
            donateur_id: 5,
            donateur_nom: "Awa Traoré".into(),
            montant: 250000.0,
            nom_sur_tableau: None,
            message: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let notice = Notice::offre_recue(&offre, "Forage");
        assert!(notice.message.starts_with("Awa Traoré a proposé 250000.00 FCFA"));
    }
}
