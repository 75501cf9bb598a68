use std::io::Write as _;
use std::sync::Arc;

use anyhow::Context as _;
use futures::StreamExt as _;
use tokio::io::{AsyncBufReadExt as _, BufReader};
use url::Url;

use skytube::app::{Dialog, ScreenController};
use skytube::state::{AppCommands, AppSettings, ConfigManager, Session, StatusLevel};
use skytube::updater::{Downloader, SystemInstaller, UpdateChecker};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::var_os("SKYTUBE_CONFIG_DIR") {
        Some(dir) => ConfigManager::with_config_dir(dir.into())?,
        None => ConfigManager::new()?,
    };

    let mut settings = config.load_settings().unwrap_or_else(|e| {
        log::warn!("Failed to load settings, using defaults: {e:#}");
        AppSettings::default()
    });
    // Allow runtime override for testing against a local manifest
    if let Ok(url) = std::env::var("SKYTUBE_MANIFEST_URL") {
        settings.updater.manifest_url = url;
    }

    let saved = config.load_workspace().unwrap_or_else(|e| {
        log::warn!("Failed to load workspace: {e:#}");
        None
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(settings.updater.worker_threads.max(1))
        .enable_all()
        .build()
        .context("Failed to start worker pool")?;

    let session = Arc::new(Session::new());
    let mut controller = ScreenController::new(session, settings.clone(), saved);

    runtime.block_on(run_update_flow(&mut controller, &settings))?;

    for event in controller.take_events() {
        log::debug!("{event:?}");
    }
    if let Some(message) = controller.state().status_message() {
        match message.level {
            StatusLevel::Info => println!("{}", message.text),
            StatusLevel::Error => eprintln!("{}", message.text),
        }
    }

    config.save_workspace(&controller.save_state())?;
    Ok(())
}

/// Startup check, confirmation prompt, download and installer hand-off.
async fn run_update_flow(
    controller: &mut ScreenController,
    settings: &AppSettings,
) -> anyhow::Result<()> {
    if !controller.should_check_for_updates() {
        return Ok(());
    }

    let client = AppCommands::http_client()?;
    let manifest_url = Url::parse(&settings.updater.manifest_url)
        .with_context(|| format!("Invalid manifest URL {}", settings.updater.manifest_url))?;
    let checker = UpdateChecker::new(client.clone(), manifest_url);

    let Some(check) = AppCommands::check_for_updates(controller.session(), checker) else {
        return Ok(());
    };
    controller.on_update_check_started();
    let info = check.await.context("Update check task panicked")?;

    let Some(Dialog::UpdateAvailable { version, .. }) =
        controller.on_update_check_finished(info).cloned()
    else {
        return Ok(());
    };

    if !confirm(&format!("Update available: version {version}. Update now? [u]pdate/[L]ater "))
        .await?
    {
        controller.on_update_postponed();
        return Ok(());
    }
    let Some(url) = controller.on_update_confirmed() else {
        return Ok(());
    };

    let downloader = Downloader::new(client, settings.updater.cache_dir());
    let installer = SystemInstaller::new(settings.updater.installer_command.clone());
    let mut events = AppCommands::download_update(downloader, url);

    while let Some(event) = events.next().await {
        let install = controller.on_upgrade_event(event);
        render_progress(controller.dialog());

        if let Some(request) = install {
            let result = AppCommands::install_update(&installer, &request);
            controller.on_install_result(result);
        }
    }
    println!();

    Ok(())
}

async fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "u" | "update" | "y" | "yes"))
}

fn render_progress(dialog: Option<&Dialog>) {
    if let Some(Dialog::DownloadProgress { percent }) = dialog {
        match percent {
            Some(pct) => print!("\rDownloading... {pct:>3}%"),
            None => print!("\rDownloading..."),
        }
        let _ = std::io::stdout().flush();
    }
}
