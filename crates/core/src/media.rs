//! Media asset rules: type names, file-extension checks, primary selection,
//! and public URL construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Kind of a media asset attached to an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "audio")]
    Audio,
    #[serde(rename = "model_3d")]
    Model3d,
    #[serde(rename = "video")]
    Video,
}

impl MediaType {
    pub const ALL: [MediaType; 4] = [
        MediaType::Image,
        MediaType::Audio,
        MediaType::Model3d,
        MediaType::Video,
    ];

    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Audio => "audio",
            MediaType::Model3d => "model_3d",
            MediaType::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                CoreError::field(
                    "media_type",
                    format!(
                        "'{s}' is not a valid choice. Valid choices: {}",
                        MediaType::ALL.map(MediaType::as_str).join(", ")
                    ),
                )
            })
    }
}

/// File extensions accepted for `model_3d` media (compared case-insensitively).
pub const MODEL_3D_EXTENSIONS: &[&str] = &[".glb", ".gltf", ".bin"];

/// Validate a media file name against its declared type.
///
/// Only `model_3d` is constrained; every other type accepts any file name.
pub fn validate_media_file(media_type: MediaType, file_name: &str) -> Result<(), CoreError> {
    if media_type != MediaType::Model3d {
        return Ok(());
    }
    let lower = file_name.to_lowercase();
    if MODEL_3D_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return Ok(());
    }
    Err(CoreError::field(
        "file",
        format!(
            "Unsupported 3D model file '{file_name}'. Allowed extensions: {}",
            MODEL_3D_EXTENSIONS.join(", ")
        ),
    ))
}

// ---------------------------------------------------------------------------
// Primary media selection
// ---------------------------------------------------------------------------

/// Anything that can compete for "primary media of a type".
pub trait MediaCandidate {
    fn candidate_id(&self) -> DbId;
    fn candidate_type(&self) -> Option<MediaType>;
    fn candidate_is_primary(&self) -> bool;
}

/// Pick the primary media of `kind`: an `is_primary` row first, then the
/// lowest id. Returns `None` when no row of that type exists.
pub fn select_primary<T: MediaCandidate>(items: &[T], kind: MediaType) -> Option<&T> {
    items
        .iter()
        .filter(|m| m.candidate_type() == Some(kind))
        .min_by_key(|m| (!m.candidate_is_primary(), m.candidate_id()))
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

/// Build the public URL of a stored file.
///
/// `prefix` is the configured media URL (e.g. `/media/`); `origin` is the
/// request's scheme + host when known (e.g. `https://example.org`). Paths that
/// are already absolute URLs are returned unchanged.
pub fn media_url(prefix: &str, origin: Option<&str>, stored_path: &str) -> String {
    if stored_path.starts_with("http://") || stored_path.starts_with("https://") {
        return stored_path.to_string();
    }

    let relative = format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        stored_path.trim_start_matches('/')
    );

    if relative.starts_with("http://") || relative.starts_with("https://") {
        return relative;
    }

    match origin {
        Some(origin) => format!(
            "{}/{}",
            origin.trim_end_matches('/'),
            relative.trim_start_matches('/')
        ),
        None => relative,
    }
}

/// Reduce a client-supplied file reference to the stored relative path.
///
/// Clients may echo back URLs they received (absolute or relative); anything
/// under the media prefix is stripped back to the storage path. Other values
/// are kept verbatim.
pub fn stored_path_from_reference(prefix: &str, reference: &str) -> String {
    let prefix = format!("/{}/", prefix.trim_matches('/'));
    let path_part = match reference.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |i| &rest[i..]),
        None => reference,
    };
    match path_part.strip_prefix(prefix.as_str()) {
        Some(stripped) => stripped.to_string(),
        None => reference.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: DbId,
        kind: MediaType,
        primary: bool,
    }

    impl MediaCandidate for Row {
        fn candidate_id(&self) -> DbId {
            self.id
        }
        fn candidate_type(&self) -> Option<MediaType> {
            Some(self.kind)
        }
        fn candidate_is_primary(&self) -> bool {
            self.primary
        }
    }

    fn row(id: DbId, kind: MediaType, primary: bool) -> Row {
        Row { id, kind, primary }
    }

    #[test]
    fn media_type_round_trips_through_str() {
        for t in MediaType::ALL {
            assert_eq!(t.as_str().parse::<MediaType>().unwrap(), t);
        }
        assert!("hologram".parse::<MediaType>().is_err());
    }

    #[test]
    fn media_type_serde_names() {
        assert_eq!(serde_json::to_string(&MediaType::Model3d).unwrap(), "\"model_3d\"");
        let t: MediaType = serde_json::from_str("\"audio\"").unwrap();
        assert_eq!(t, MediaType::Audio);
    }

    #[test]
    fn model_3d_accepts_known_extensions_any_case() {
        for name in ["madal.glb", "madal.GLTF", "scene/buffers.Bin"] {
            assert!(validate_media_file(MediaType::Model3d, name).is_ok(), "{name}");
        }
    }

    #[test]
    fn model_3d_rejects_other_extensions_naming_the_file() {
        let err = validate_media_file(MediaType::Model3d, "madal.obj").unwrap_err();
        match err {
            CoreError::InvalidField { field, message } => {
                assert_eq!(field, "file");
                assert!(message.contains("madal.obj"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn other_types_accept_any_extension() {
        assert!(validate_media_file(MediaType::Image, "madal.obj").is_ok());
        assert!(validate_media_file(MediaType::Audio, "madal").is_ok());
    }

    #[test]
    fn primary_flag_wins_over_lower_id() {
        let items = vec![
            row(1, MediaType::Audio, false),
            row(5, MediaType::Audio, true),
            row(2, MediaType::Image, true),
        ];
        assert_eq!(select_primary(&items, MediaType::Audio).unwrap().id, 5);
    }

    #[test]
    fn lowest_id_when_no_primary() {
        let items = vec![
            row(9, MediaType::Model3d, false),
            row(3, MediaType::Model3d, false),
        ];
        assert_eq!(select_primary(&items, MediaType::Model3d).unwrap().id, 3);
    }

    #[test]
    fn lowest_id_among_several_primaries() {
        let items = vec![
            row(8, MediaType::Audio, true),
            row(4, MediaType::Audio, true),
        ];
        assert_eq!(select_primary(&items, MediaType::Audio).unwrap().id, 4);
    }

    #[test]
    fn none_when_type_missing() {
        let items = vec![row(1, MediaType::Image, true)];
        assert!(select_primary(&items, MediaType::Audio).is_none());
    }

    #[test]
    fn relative_url_without_origin() {
        assert_eq!(
            media_url("/media/", None, "instruments/media/a.mp3"),
            "/media/instruments/media/a.mp3"
        );
    }

    #[test]
    fn absolute_url_with_origin() {
        assert_eq!(
            media_url("/media/", Some("https://example.org"), "instruments/media/a.mp3"),
            "https://example.org/media/instruments/media/a.mp3"
        );
    }

    #[test]
    fn absolute_stored_paths_pass_through() {
        assert_eq!(
            media_url("/media/", Some("http://x"), "https://cdn.example.org/a.glb"),
            "https://cdn.example.org/a.glb"
        );
    }

    #[test]
    fn references_are_reduced_to_stored_paths() {
        assert_eq!(
            stored_path_from_reference("/media/", "http://h:3000/media/instruments/a.png"),
            "instruments/a.png"
        );
        assert_eq!(
            stored_path_from_reference("/media/", "/media/instruments/a.png"),
            "instruments/a.png"
        );
        assert_eq!(
            stored_path_from_reference("/media/", "instruments/a.png"),
            "instruments/a.png"
        );
    }
}
