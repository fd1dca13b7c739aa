//! JWT Token Handler
//! Mission: Issue and verify signed, time-bound identity tokens

use crate::auth::models::{Claims, Identity};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;
use uuid::Uuid;

/// Tokens live for a fixed seven days.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// JWT Handler for token operations (HS256)
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtHandler {
    /// Refuses an empty secret; there is no fallback key.
    pub fn new(secret: &str) -> Result<Self> {
        if secret.trim().is_empty() {
            anyhow::bail!("JWT secret must not be empty");
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked against an explicit clock in `verify_at`
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Issue a token for `identity`, valid for seven days from now.
    pub fn issue(&self, identity: &Identity) -> Result<String> {
        self.issue_at(identity, Utc::now())
    }

    pub fn issue_at(&self, identity: &Identity, issued_at: DateTime<Utc>) -> Result<String> {
        let expiration = issued_at
            .checked_add_signed(Duration::days(TOKEN_TTL_DAYS))
            .context("Invalid timestamp")?;

        let claims = Claims {
            user_id: identity.user_id.clone(),
            email: identity.email.clone(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
        };

        debug!(
            "Generating JWT for {} ({}), expires {}",
            claims.email, claims.user_id, expiration
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to generate JWT")
    }

    /// Verify signature and expiry against the current time.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        self.verify_at(token, Utc::now())
    }

    /// Verify against `now`. A token is valid only while `now < exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<Claims> {
        let claims = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!("JWT rejected: {}", e);
                return None;
            }
        };

        if now.timestamp() >= claims.exp {
            debug!("JWT rejected: expired at {} for {}", claims.exp, claims.email);
            return None;
        }

        Some(claims)
    }
}
