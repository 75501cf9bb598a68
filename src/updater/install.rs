//! Handing a downloaded package to the platform installer.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use url::Url;

use crate::error::{Error, Result};

/// Media type of installer packages.
pub const INSTALLER_MIME_TYPE: &str = "application/vnd.android.package-archive";

#[cfg(target_os = "macos")]
const DEFAULT_OPENER: &str = "open";
#[cfg(target_os = "windows")]
const DEFAULT_OPENER: &str = "explorer";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const DEFAULT_OPENER: &str = "xdg-open";

/// "Open this package with the installer, in a new task, with temporary read access."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub path: PathBuf,
    pub uri: Url,
    pub mime_type: &'static str,
    pub new_task: bool,
    pub grant_read: bool,
}

impl InstallRequest {
    pub fn for_package(path: &Path) -> Result<Self> {
        let path = std::path::absolute(path)?;
        let uri = Url::from_file_path(&path)
            .map_err(|_| Error::Installer(format!("cannot build URI for {}", path.display())))?;

        Ok(Self { path, uri, mime_type: INSTALLER_MIME_TYPE, new_task: true, grant_read: true })
    }
}

/// Launches the platform installer. Fire and forget: the outcome is not tracked.
pub trait Installer: Send + Sync {
    fn launch(&self, request: &InstallRequest) -> Result<()>;
}

/// Installer backed by an external command (a configured one, or the desktop opener).
#[derive(Debug, Clone, Default)]
pub struct SystemInstaller {
    command: Option<String>,
}

impl SystemInstaller {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    /// Resolve the program and its leading arguments.
    fn resolve(&self) -> Result<(PathBuf, Vec<String>)> {
        let command = self.command.as_deref().unwrap_or(DEFAULT_OPENER);
        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or_else(|| Error::InstallerNotFound(command.to_string()))?;
        let program = which::which(program)
            .map_err(|e| Error::InstallerNotFound(format!("{program}: {e}")))?;

        Ok((program, parts.map(String::from).collect()))
    }
}

impl Installer for SystemInstaller {
    fn launch(&self, request: &InstallRequest) -> Result<()> {
        let (program, args) = self.resolve()?;
        log::info!(
            "Launching installer {} for {} ({})",
            program.display(),
            request.uri,
            request.mime_type
        );

        let mut command = Command::new(&program);
        command.args(&args).arg(&request.path);
        spawn_detached(command)?;

        Ok(())
    }
}

/// Spawn `command` and reap it on a background thread once it exits.
fn spawn_detached(mut command: Command) -> Result<JoinHandle<Option<ExitStatus>>> {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| Error::Installer(format!("{program}: {e}")))?;

    let reaper = std::thread::Builder::new()
        .name("installer-reaper".into())
        .spawn(move || match child.wait() {
            Ok(status) => {
                log::debug!("Installer {program} exited with {status}");
                Some(status)
            }
            Err(e) => {
                log::warn!("Failed to wait for installer {program}: {e}");
                None
            }
        })?;

    Ok(reaper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_targets_package_with_installer_semantics() {
        let dir = tempfile::TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("skytube-upgrade123.apk");

        let request = InstallRequest::for_package(&path).unwrap();
        assert_eq!(request.uri.scheme(), "file");
        assert!(request.uri.path().ends_with("skytube-upgrade123.apk"));
        assert_eq!(request.mime_type, INSTALLER_MIME_TYPE);
        assert!(request.new_task && request.grant_read);
    }

    #[test]
    fn missing_installer_command_is_reported() {
        let installer = SystemInstaller::new(Some("definitely-not-a-real-installer --flag".into()));
        let dir = tempfile::TempDir::new().expect("failed to create temp dir");
        let request = InstallRequest::for_package(&dir.path().join("a.apk")).unwrap();

        let err = installer.launch(&request).unwrap_err();
        assert!(matches!(err, Error::InstallerNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn launched_installer_is_reaped() {
        let Ok(sh) = which::which("sh") else {
            return;
        };
        let mut command = Command::new(sh);
        command.args(["-c", "exit 3"]);

        let reaper = spawn_detached(command).unwrap();
        let status = reaper.join().unwrap().expect("child should be waited on");
        assert_eq!(status.code(), Some(3));
    }

    #[test]
    fn configured_command_keeps_leading_arguments() {
        let installer = SystemInstaller::new(Some("sh -c true".into()));
        let Ok((program, args)) = installer.resolve() else {
            // No shell on this host
            return;
        };
        assert!(program.ends_with("sh"));
        assert_eq!(args, vec!["-c".to_string(), "true".to_string()]);
    }
}
