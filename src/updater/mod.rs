//! In-app self update: manifest check, package download, installer hand-off.

pub mod checker;
pub mod download;
pub mod install;
pub mod manifest;
pub mod upgrade;
pub mod version;

pub use checker::UpdateChecker;
pub use download::{CHUNK_SIZE, DownloadProgress, Downloader, INSTALLER_PREFIX, InstallerCache};
pub use install::{INSTALLER_MIME_TYPE, InstallRequest, Installer, SystemInstaller};
pub use manifest::{INSTALLER_SUFFIX, ReleaseManifest, UpdateInfo};
pub use upgrade::{DownloadOutcome, UpgradeEvent, UpgradePhase, UpgradeTask};
pub use version::parse_version;
