//! Category slug generation and validation.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::CoreError;

/// Maximum slug length, matching the `categories.slug` column.
pub const MAX_SLUG_LEN: usize = 140;

/// Generate a URL-safe slug from a display name.
///
/// Letters are decomposed (NFKD) and their combining marks dropped, so
/// `Bājā` becomes `baja`. Whatever is still not ASCII alphanumeric turns
/// into a hyphen; runs of hyphens collapse and are trimmed from both ends.
/// The result is cut to [`MAX_SLUG_LEN`].
pub fn generate_slug(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_hyphen = false;
    let folded = name.nfkd().filter(|c| !is_combining_mark(*c));
    for c in folded.flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }

    let mut slug = result.trim_matches('-').to_string();
    slug.truncate(MAX_SLUG_LEN);
    slug.trim_end_matches('-').to_string()
}

/// Validate a slug (non-empty, lowercase alphanumeric + hyphens, bounded length).
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::field("slug", "Slug must not be empty"));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::field(
            "slug",
            format!("Slug must be at most {MAX_SLUG_LEN} characters"),
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::field(
            "slug",
            "Slug must contain only lowercase alphanumeric characters and hyphens",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_basic_name() {
        assert_eq!(generate_slug("String Instruments"), "string-instruments");
    }

    #[test]
    fn slug_special_characters() {
        assert_eq!(generate_slug("Wind & Brass (Folk)"), "wind-brass-folk");
    }

    #[test]
    fn slug_collapses_and_trims_hyphens() {
        assert_eq!(generate_slug("  --Percussion--  "), "percussion");
    }

    #[test]
    fn slug_strips_diacritics() {
        assert_eq!(generate_slug("Bājā Nepal"), "baja-nepal");
        assert_eq!(generate_slug("Śāstrīya Saṅgīt"), "sastriya-sangit");
        assert_eq!(generate_slug("Ｍadal"), "madal");
    }

    #[test]
    fn slug_drops_unmapped_scripts() {
        assert_eq!(generate_slug("मादल Madal"), "madal");
        assert_eq!(generate_slug("मादल"), "");
    }

    #[test]
    fn slug_is_truncated() {
        let long = "a".repeat(300);
        assert_eq!(generate_slug(&long).len(), MAX_SLUG_LEN);
    }

    #[test]
    fn slug_valid() {
        assert!(validate_slug("percussion-2").is_ok());
    }

    #[test]
    fn slug_empty_rejected() {
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn slug_uppercase_rejected() {
        assert!(validate_slug("Percussion").is_err());
    }
}
