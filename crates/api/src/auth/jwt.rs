//! Tokens handed out by `/api/auth/token/`.
//!
//! An access token is a short-lived HS256 JWT naming the catalog user and
//! their role; the access policy only ever looks at the role. A refresh token
//! is an opaque random string that works once: its SHA-256 digest keys a row
//! in `user_sessions`, and each refresh consumes that row and opens another.

use baja_core::types::{DbId, Timestamp};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// `iss` claim stamped on, and required of, every access token.
pub const TOKEN_ISSUER: &str = "baja-catalog";

/// Shortest `JWT_SECRET` accepted at startup, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

/// Payload of a catalog access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Id of the `users` row.
    pub sub: DbId,
    /// `admin` or `user`.
    pub role: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Signing secret and token lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Load token settings.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or shorter than [`MIN_SECRET_BYTES`],
    /// or a lifetime is not a positive number.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(
            secret.len() >= MIN_SECRET_BYTES,
            "JWT_SECRET must be at least {MIN_SECRET_BYTES} bytes"
        );

        Self {
            secret,
            access_token_expiry_mins: positive_env(
                "JWT_ACCESS_EXPIRY_MINS",
                DEFAULT_ACCESS_EXPIRY_MINS,
            ),
            refresh_token_expiry_days: positive_env(
                "JWT_REFRESH_EXPIRY_DAYS",
                DEFAULT_REFRESH_EXPIRY_DAYS,
            ),
        }
    }

    /// Access token lifetime in seconds, reported to clients as `expires_in`.
    pub fn access_token_ttl_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    /// When a refresh token minted at `now` stops working.
    pub fn refresh_expires_at(&self, now: Timestamp) -> Timestamp {
        now + chrono::Duration::days(self.refresh_token_expiry_days)
    }

    /// Sign an access token for a catalog user.
    pub fn sign_access(
        &self,
        user_id: DbId,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now().timestamp();
        let claims = AccessClaims {
            sub: user_id,
            role: role.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat: now,
            exp: now + self.access_token_ttl_secs(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Check signature, issuer and expiry, with no clock leeway.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = 0;

        decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }
}

fn positive_env(name: &str, default: i64) -> i64 {
    let value: i64 = std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{name} must be a whole number"));
    assert!(value > 0, "{name} must be positive");
    value
}

/// A freshly minted refresh token and the digest stored for it.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    /// Handed to the client, never stored.
    pub token: String,
    pub digest: String,
}

impl RefreshToken {
    pub fn mint() -> Self {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let digest = refresh_digest(&token);
        Self { token, digest }
    }
}

/// Hex SHA-256 of a refresh token, the lookup key in `user_sessions`.
pub fn refresh_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
