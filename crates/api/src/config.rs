use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Default upload ceiling: 100 MiB.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Host names trusted for absolute file URLs (`ALLOWED_HOSTS`).
    ///
    /// Entries are exact names, `.example.org` for a domain and its
    /// subdomains, or `*`. Other hosts get relative URLs.
    pub allowed_hosts: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Where uploaded files live and how they are addressed.
    pub media: MediaConfig,
}

/// Uploaded-file storage settings.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory uploaded files are written under.
    pub root: PathBuf,
    /// Public URL prefix files are served at, e.g. `/media/`.
    pub url_prefix: String,
    /// Largest accepted request body for uploads.
    pub max_upload_bytes: usize,
}

impl MediaConfig {
    /// Load media settings.
    ///
    /// | Env Var            | Default     |
    /// |--------------------|-------------|
    /// | `MEDIA_ROOT`       | `media`     |
    /// | `MEDIA_URL`        | `/media/`   |
    /// | `MAX_UPLOAD_BYTES` | `104857600` |
    pub fn from_env() -> Self {
        let root = std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".into());

        let url_prefix = normalize_prefix(
            &std::env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".into()),
        );
        check_url_prefix(&url_prefix).unwrap_or_else(|e| panic!("Invalid MEDIA_URL: {e}"));

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            root: PathBuf::from(root),
            url_prefix,
            max_upload_bytes,
        }
    }

    /// Route path the media directory is mounted at (no trailing slash).
    ///
    /// `None` when files are served from elsewhere (absolute URL prefix) or
    /// the prefix is the site root, which [`check_url_prefix`] rejects.
    pub fn mount_path(&self) -> Option<String> {
        if is_absolute_url(&self.url_prefix) {
            return None;
        }
        let trimmed = self.url_prefix.trim_end_matches('/');
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Paths owned by the router; the media mount may not shadow them.
const RESERVED_PATHS: [&str; 2] = ["/api", "/health"];

/// Reject media prefixes that cannot be mounted beside the API.
///
/// The site root would capture every request, and anything under a reserved
/// path would collide with the routes served there.
pub fn check_url_prefix(prefix: &str) -> Result<(), String> {
    if is_absolute_url(prefix) {
        return Ok(());
    }
    let path = prefix.trim_end_matches('/');
    if path.is_empty() {
        return Err("media cannot be served from the site root".into());
    }
    let lowered = path.to_ascii_lowercase();
    for reserved in RESERVED_PATHS {
        if lowered == reserved || lowered.starts_with(&format!("{reserved}/")) {
            return Err(format!("'{prefix}' overlaps the {reserved} routes"));
        }
    }
    Ok(())
}

fn is_absolute_url(prefix: &str) -> bool {
    prefix.starts_with("http://") || prefix.starts_with("https://")
}

/// Ensure a relative prefix has exactly one leading and trailing slash.
/// Absolute URL prefixes (a CDN in front of the media directory) are kept,
/// with a trailing slash added.
fn normalize_prefix(raw: &str) -> String {
    let raw = raw.trim();
    if is_absolute_url(raw) {
        return format!("{}/", raw.trim_end_matches('/'));
    }
    let inner = raw.trim_matches('/');
    if inner.is_empty() {
        "/".to_string()
    } else {
        format!("/{inner}/")
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `ALLOWED_HOSTS`        | `localhost,127.0.0.1`      |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// JWT and media settings are documented on [`JwtConfig::from_env`] and
    /// [`MediaConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = comma_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let allowed_hosts = comma_list(
            &std::env::var("ALLOWED_HOSTS").unwrap_or_else(|_| "localhost,127.0.0.1".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            allowed_hosts,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            media: MediaConfig::from_env(),
        }
    }
}

fn comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
