//! Well-known role name constants.
//!
//! These must match the `chk_users_role` constraint in
//! `20260301000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Whether the role grants write access to the admin-gated resources.
pub fn is_privileged(role: &str) -> bool {
    role == ROLE_ADMIN
}
