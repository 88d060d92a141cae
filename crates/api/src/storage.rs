//! Write-once storage for uploaded media files.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Directory (relative to the media root) uploaded instrument media lands in.
pub const UPLOAD_DIR: &str = "instruments/media";

/// Longest sanitized file name kept after the uuid prefix.
const MAX_NAME_LEN: usize = 100;

/// Local-disk media storage rooted at `MEDIA_ROOT`.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether uploads can be written, creating the root if needed.
    pub async fn is_writable(&self) -> bool {
        if let Err(e) = tokio::fs::create_dir_all(&self.root).await {
            tracing::warn!(root = %self.root.display(), error = %e, "Media root unavailable");
            return false;
        }
        tokio::fs::metadata(&self.root)
            .await
            .map(|meta| meta.is_dir() && !meta.permissions().readonly())
            .unwrap_or(false)
    }

    /// Store `bytes` under a fresh name derived from `original_name`.
    ///
    /// Returns the path relative to the root, which is what gets persisted.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<String> {
        let relative = format!(
            "{UPLOAD_DIR}/{}-{}",
            Uuid::new_v4().simple(),
            sanitize_file_name(original_name)
        );
        let target = self.root.join(&relative);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;

        tracing::debug!(path = %target.display(), size = bytes.len(), "Stored upload");
        Ok(relative)
    }
}

/// Reduce a client-supplied file name to a safe single path component.
///
/// Directory parts are dropped and anything outside `[A-Za-z0-9._-]` becomes
/// `_`. Leading dots are removed from the stem only, so `.glb` is stored as
/// `upload.glb` and still passes the extension checks. The extension also
/// survives truncation.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let (stem, ext) = match cleaned.rfind('.') {
        Some(i) if cleaned.len() - i > 1 && cleaned.len() - i < MAX_NAME_LEN => {
            (&cleaned[..i], &cleaned[i..])
        }
        Some(i) if cleaned.len() - i == 1 => (&cleaned[..i], ""),
        _ => (cleaned.as_str(), ""),
    };

    let stem = stem.trim_start_matches('.');
    let stem = if stem.is_empty() { "upload" } else { stem };
    let keep = (MAX_NAME_LEN - ext.len()).min(stem.len());

    format!("{}{ext}", &stem[..keep])
}
