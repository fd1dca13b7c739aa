//! Folio Backend Library
//!
//! Portfolio site backend: password login with signed session tokens,
//! a path-prefix gate for admin routes, content CRUD and image uploads.

pub mod auth;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod upload;

pub use config::AppConfig;
pub use routes::{build_app, build_router};
