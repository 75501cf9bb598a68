//! Remote release manifest parsing.

use semver::Version;
use url::Url;

use super::version::parse_version;
use crate::error::{Error, Result};

/// Suffix of installer packages published alongside a release.
pub const INSTALLER_SUFFIX: &str = ".apk";

/// The parsed remote descriptor, before it is compared with the running build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseManifest {
    pub version: Version,
    pub download_url: Option<Url>,
}

/// Outcome of one update check cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateInfo {
    pub latest_version: Option<Version>,
    /// Present only when `latest_version` is newer than the running build.
    pub download_url: Option<Url>,
}

impl UpdateInfo {
    /// The "no update" result, also used when the check failed.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_available(&self) -> bool {
        self.download_url.is_some()
    }
}

/// Parse either a GitHub release object or a flat `{latest_version, download_url}` manifest.
pub fn parse_manifest(json: &serde_json::Value) -> Result<ReleaseManifest> {
    if let Some(tag) = json["tag_name"].as_str() {
        let version = parse_version(tag)?;
        let download_url = find_asset_url(json).map(|u| Url::parse(&u)).transpose()?;
        return Ok(ReleaseManifest { version, download_url });
    }

    let version = match &json["latest_version"] {
        serde_json::Value::String(s) => parse_version(s)?,
        // Float-style versions, e.g. 2.5
        serde_json::Value::Number(n) => parse_version(&n.to_string())?,
        _ => return Err(Error::Manifest("missing latest_version or tag_name".into())),
    };
    let download_url = json["download_url"].as_str().map(Url::parse).transpose()?;

    Ok(ReleaseManifest { version, download_url })
}

/// Find the first installer asset URL in a GitHub release JSON.
fn find_asset_url(release: &serde_json::Value) -> Option<String> {
    release["assets"].as_array()?.iter().find_map(|a| {
        let name = a["name"].as_str()?;
        if name.ends_with(INSTALLER_SUFFIX) {
            a["browser_download_url"].as_str().map(String::from)
        } else {
            None
        }
    })
}
