//! Portfolio Content Module
//! Mission: Profile, projects, skills and experiences for the public site and admin panel

pub mod api;
pub mod error;
pub mod models;
pub mod store;

pub use api::router;
pub use error::ContentError;
pub use store::ContentStore;
