//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod contact_message_repo;
pub mod document_repo;
pub mod notification_repo;
pub mod offre_repo;
pub mod projet_repo;
pub mod session_repo;
pub mod site_content_repo;
pub mod site_media_repo;
pub mod site_setting_repo;
pub mod stats_repo;
pub mod user_repo;
pub mod village_repo;

pub use contact_message_repo::ContactMessageRepo;
pub use document_repo::DocumentRepo;
pub use notification_repo::NotificationRepo;
pub use offre_repo::OffreRepo;
pub use projet_repo::ProjetRepo;
pub use session_repo::SessionRepo;
pub use site_content_repo::SiteContentRepo;
pub use site_media_repo::SiteMediaRepo;
pub use site_setting_repo::SiteSettingRepo;
pub use stats_repo::StatsRepo;
pub use user_repo::UserRepo;
pub use village_repo::VillageRepo;
