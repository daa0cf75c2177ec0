pub mod admin;
pub mod auth;
pub mod document;
pub mod notification;
pub mod offre;
pub mod projet;
pub mod public;
pub mod site_admin;
pub mod upload;
pub mod village;
