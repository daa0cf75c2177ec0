//! Khayroukum event bus and outbound notification delivery.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the domain event envelope.
//! - [`delivery`] -- external delivery channels (email).
//! - [`MailDispatcher`] -- background service that emails users about the
//!   notifications created for them.

pub mod bus;
pub mod delivery;
pub mod dispatcher;

pub use bus::{EventBus, PlatformEvent};
pub use delivery::email::{EmailConfig, EmailDelivery};
pub use dispatcher::MailDispatcher;
