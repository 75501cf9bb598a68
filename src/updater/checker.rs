use semver::Version;
use url::Url;

use super::manifest::{ReleaseManifest, UpdateInfo, parse_manifest};
use super::version::{current_version, is_newer};
use crate::error::Result;

/// Queries the remote manifest and decides whether an update should be offered.
#[derive(Clone)]
pub struct UpdateChecker {
    client: reqwest::Client,
    manifest_url: Url,
    current: Version,
}

impl UpdateChecker {
    pub fn new(client: reqwest::Client, manifest_url: Url) -> Self {
        Self { client, manifest_url, current: current_version() }
    }

    /// Compare against `current` instead of the running build's version.
    pub fn with_current_version(mut self, current: Version) -> Self {
        self.current = current;
        self
    }

    pub fn current_version(&self) -> &Version {
        &self.current
    }

    /// Fetch and parse the remote manifest.
    pub async fn fetch_manifest(&self) -> Result<ReleaseManifest> {
        let resp = self.client.get(self.manifest_url.clone()).send().await?.error_for_status()?;
        let json: serde_json::Value = resp.json().await?;
        parse_manifest(&json)
    }

    /// Run one check cycle. Failures degrade to "no update available".
    pub async fn check(&self) -> UpdateInfo {
        log::info!(
            "Update check: version={}, sha={}, manifest={}",
            self.current,
            short_sha(env!("SKYTUBE_GIT_SHA")),
            self.manifest_url
        );

        match self.fetch_manifest().await {
            Ok(manifest) => self.evaluate(manifest),
            Err(e) => {
                log::debug!("Update check failed: {e}");
                UpdateInfo::none()
            }
        }
    }

    /// Turn a manifest into an [`UpdateInfo`] relative to the current version.
    pub fn evaluate(&self, manifest: ReleaseManifest) -> UpdateInfo {
        let download_url = if is_newer(&manifest.version, &self.current) {
            manifest.download_url
        } else {
            None
        };

        match &download_url {
            Some(url) => log::info!("Update found: v{} at {url}", manifest.version),
            None => log::info!("No update: remote v{}, local v{}", manifest.version, self.current),
        }

        UpdateInfo { latest_version: Some(manifest.version), download_url }
    }
}

fn short_sha(sha: &str) -> &str {
    &sha[..7.min(sha.len())]
}
