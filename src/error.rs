use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version error: {0}")]
    Version(#[from] semver::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Malformed manifest: {0}")]
    Manifest(String),

    #[error("Download size mismatch: expected {expected} bytes, received {received}")]
    SizeMismatch { expected: u64, received: u64 },

    #[error("Installer not found: {0}")]
    InstallerNotFound(String),

    #[error("Installer failed: {0}")]
    Installer(String),
}

/// Convenience Result type using our Error
pub type Result<T> = std::result::Result<T, Error>;
