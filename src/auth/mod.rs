//! Authentication Module
//! Mission: Password login, signed session tokens and the request gatekeeper

pub mod api;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod user_store;

pub use api::AuthState;
pub use error::AuthError;
pub use jwt::JwtHandler;
pub use middleware::{auth_middleware, Gatekeeper};
pub use models::Identity;
pub use password::PasswordHasher;
pub use service::AuthService;
pub use user_store::UserStore;
