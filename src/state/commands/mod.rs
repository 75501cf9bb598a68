//! Command helpers that run background work on the tokio worker pool.

mod updater;

use crate::error::Result;

pub struct AppCommands;

impl AppCommands {
    /// HTTP client shared by the update check and the package download.
    pub fn http_client() -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .user_agent(format!("SkyTube/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }
}
