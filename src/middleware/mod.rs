//! Middleware for observability.
//!
//! Authentication gating lives with the rest of the auth code in `crate::auth::middleware`.

pub mod logging;

pub use logging::request_logging;
