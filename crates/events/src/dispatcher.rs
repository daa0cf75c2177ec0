//! Email fan-out for in-app notifications.
//!
//! [`MailDispatcher`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and, for each `notification.created` event, looks up the recipient and
//! sends them a copy by email. Failures are logged and never reach the
//! request that created the notification.

use khayroukum_core::types::DbId;
use khayroukum_db::repositories::UserRepo;
use khayroukum_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::{PlatformEvent, EVENT_NOTIFICATION_CREATED};
use crate::delivery::email::{EmailDelivery, EmailError};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error("Event payload is missing '{0}'")]
    MalformedPayload(&'static str),
}

/// Subject and body of the email sent for a notification event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailContent {
    pub recipient_id: DbId,
    pub subject: String,
    pub body: String,
}

impl MailContent {
    /// Extract the mail to send from a `notification.created` event.
    pub fn from_event(event: &PlatformEvent) -> Result<Self, DispatchError> {
        let recipient_id = event
            .payload_id("user_id")
            .ok_or(DispatchError::MalformedPayload("user_id"))?;
        let title = event
            .payload_str("title")
            .ok_or(DispatchError::MalformedPayload("title"))?;
        let message = event.payload_str("message").unwrap_or_default();

        Ok(Self {
            recipient_id,
            subject: title.to_string(),
            body: format!("{message}\n\n-- \nKhayroukum"),
        })
    }
}

/// Background service that emails notification recipients.
pub struct MailDispatcher {
    pool: DbPool,
    delivery: EmailDelivery,
}

impl MailDispatcher {
    pub fn new(pool: DbPool, delivery: EmailDelivery) -> Self {
        Self { pool, delivery }
    }

    /// Run until the bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) if event.event_type == EVENT_NOTIFICATION_CREATED => {
                    if let Err(e) = self.dispatch(&event).await {
                        tracing::error!(
                            error = %e,
                            notification_id = ?event.source_entity_id,
                            "Failed to email notification"
                        );
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Mail dispatcher lagged, some emails were not sent");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, mail dispatcher shutting down");
                    break;
                }
            }
        }
    }

    async fn dispatch(&self, event: &PlatformEvent) -> Result<(), DispatchError> {
        let mail = MailContent::from_event(event)?;
        let Some(user) = UserRepo::find_by_id(&self.pool, mail.recipient_id).await? else {
            tracing::debug!(user_id = mail.recipient_id, "Recipient no longer exists, skipping email");
            return Ok(());
        };
        self.delivery
            .deliver(&user.email, &mail.subject, &mail.body)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mail_content_uses_title_and_message() {
        let event = PlatformEvent::new(EVENT_NOTIFICATION_CREATED).with_payload(serde_json::json!({
            "user_id": 8,
            "title": "Projet validé",
            "message": "Votre projet « Forage » a été validé.",
        }));
        let mail = MailContent::from_event(&event).unwrap();
        assert_eq!(mail.recipient_id, 8);
        assert_eq!(mail.subject, "Projet validé");
        assert!(mail.body.starts_with("Votre projet « Forage »"));
    }

    #[test]
    fn mail_content_requires_recipient() {
        let event = PlatformEvent::new(EVENT_NOTIFICATION_CREATED)
            .with_payload(serde_json::json!({"title": "Sans destinataire"}));
        assert!(matches!(
            MailContent::from_event(&event),
            Err(DispatchError::MalformedPayload("user_id"))
        ));
    }
}
