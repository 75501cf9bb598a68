use std::path::PathBuf;

use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UpdateStatus {
    #[default]
    Idle,
    Checking,
    Available { version: String, download_url: Url },
    /// `progress_pct` is `None` while the package size is unknown.
    Downloading { version: String, progress_pct: Option<u8> },
    ReadyToInstall { version: String, path: PathBuf },
    Failed(String),
}
