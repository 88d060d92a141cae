//! Refresh sessions: one row per refresh token that has been handed out.
//!
//! A row is live while it is neither revoked nor past `expires_at`. Refreshing
//! consumes the live row (sets `is_revoked`) and opens a new one, so each
//! refresh token works exactly once.

use baja_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct RefreshSession {
    pub id: DbId,
    pub user_id: DbId,
    /// Hex SHA-256 of the refresh token; the token itself is never stored.
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    /// Set once the token is used, or on logout and password reset.
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RefreshSession {
    pub fn is_live_at(&self, now: Timestamp) -> bool {
        !self.is_revoked && self.expires_at > now
    }
}

/// A session about to be opened for a freshly minted refresh token.
#[derive(Debug, Clone)]
pub struct NewRefreshSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
