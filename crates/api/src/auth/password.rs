//! Password storage for catalog accounts.
//!
//! Hashes are Argon2id PHC strings in `users.password_hash`. Login runs one
//! verification whether or not the username exists, so response timing does
//! not tell which accounts are registered.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Shortest password `baja-seed-admin` will set.
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// `Ok(false)` on a wrong password; `Err` only when the stored hash is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let stored = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Spend the same work as a real check when there is no account to check.
pub fn verify_against_placeholder(password: &str) {
    static PLACEHOLDER: OnceLock<Option<String>> = OnceLock::new();
    let placeholder = PLACEHOLDER.get_or_init(|| hash_password("no-such-catalog-account").ok());
    if let Some(hash) = placeholder {
        let _ = verify_password(password, hash);
    }
}

/// Rules for an admin password set from the command line.
///
/// It must have [`MIN_PASSWORD_LENGTH`] characters that are not all
/// whitespace and must not contain the username.
pub fn check_admin_password(password: &str, username: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    if password.trim().is_empty() {
        return Err("Password must not be blank".into());
    }
    let username = username.trim().to_lowercase();
    if !username.is_empty() && password.to_lowercase().contains(&username) {
        return Err("Password must not contain the username".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curator_password_verifies() {
        let hash = hash_password("sarangi-at-dawn").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("sarangi-at-dawn", &hash).unwrap());
        assert!(!verify_password("Sarangi-at-dawn", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let a = hash_password("madal-rhythm").unwrap();
        let b = hash_password("madal-rhythm").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("madal-rhythm", &b).unwrap());
    }

    #[test]
    fn corrupt_stored_hash_is_an_error() {
        assert!(verify_password("anything", "plaintext-left-in-db").is_err());
    }

    #[test]
    fn placeholder_check_never_panics() {
        verify_against_placeholder("");
        verify_against_placeholder("guess");
    }

    #[test]
    fn admin_password_rules() {
        assert!(check_admin_password("short", "admin").is_err());
        assert!(check_admin_password("        ", "admin").is_err());
        assert!(check_admin_password("Admin2026!", "admin").is_err());
        assert!(check_admin_password("bansuri-notes", "admin").is_ok());
        assert!(check_admin_password("eight ch", "").is_ok());
    }
}
