//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- Requires a valid JWT Bearer token.
//! - [`auth::Caller`] -- Optional identity, checked against the access policy
//!   table by each handler.

pub mod auth;
