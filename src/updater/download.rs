//! Installer cache housekeeping and the chunked download loop.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use futures::{Stream, StreamExt as _};
use tempfile::NamedTempFile;
use url::Url;

use super::manifest::INSTALLER_SUFFIX;
use crate::error::{Error, Result};

/// Bytes copied from the network stream per write.
pub const CHUNK_SIZE: usize = 1024;

/// File name prefix of downloaded installer packages.
pub const INSTALLER_PREFIX: &str = "skytube-upgrade";

/// Bytes transferred so far against the declared size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub transferred: u64,
    pub total: Option<u64>,
}

impl DownloadProgress {
    /// Percentage complete, or `None` when the size is unknown (indeterminate progress).
    pub fn percent(&self) -> Option<u8> {
        match self.total {
            Some(total) if total > 0 => Some(((self.transferred * 100) / total).min(100) as u8),
            _ => None,
        }
    }
}

/// Directory dedicated to downloaded installer packages.
#[derive(Debug, Clone)]
pub struct InstallerCache {
    dir: PathBuf,
}

impl InstallerCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether `file_name` looks like a package this cache owns.
    pub fn is_installer(file_name: &str) -> bool {
        file_name.ends_with(INSTALLER_SUFFIX)
    }

    /// Create the cache directory if it does not exist yet.
    pub fn prepare(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    /// All installer packages currently in the cache.
    pub fn installers(&self) -> io::Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let is_match = entry.file_name().to_str().is_some_and(Self::is_installer);
            if is_match && entry.file_type()?.is_file() {
                found.push(entry.path());
            }
        }
        found.sort();
        Ok(found)
    }

    /// Every entry named like a package, whatever its type.
    fn stale_entries(&self) -> io::Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_name().to_str().is_some_and(Self::is_installer) {
                found.push(entry.path());
            }
        }
        found.sort();
        Ok(found)
    }

    /// Delete previously downloaded packages. Failures are logged and skipped.
    ///
    /// Returns how many files were removed.
    pub fn delete_stale(&self) -> usize {
        let stale = match self.stale_entries() {
            Ok(stale) => stale,
            Err(e) => {
                log::error!("Cannot list {}: {e}", self.dir.display());
                return 0;
            }
        };

        let mut deleted = 0;
        for path in stale {
            match fs::remove_file(&path) {
                Ok(()) => {
                    log::info!("Deleted {}", path.display());
                    deleted += 1;
                }
                Err(e) => log::error!("Cannot delete {}: {e}", path.display()),
            }
        }
        deleted
    }

    /// Create a new, uniquely named package file readable by every user.
    ///
    /// The file is removed when the handle is dropped unless it is kept.
    pub fn create_installer_file(&self) -> io::Result<NamedTempFile> {
        let file = tempfile::Builder::new()
            .prefix(INSTALLER_PREFIX)
            .suffix(INSTALLER_SUFFIX)
            .tempfile_in(&self.dir)?;
        make_world_readable(file.path())?;
        Ok(file)
    }
}

#[cfg(unix)]
fn make_world_readable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o444);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_world_readable(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Copy `stream` into `out` in [`CHUNK_SIZE`] pieces, reporting progress after each write.
///
/// Returns the number of bytes written. When `total` is declared, the stream must
/// deliver exactly that many bytes.
pub async fn copy_in_chunks<S, B, E, W, F>(
    stream: S,
    total: Option<u64>,
    out: &mut W,
    mut on_progress: F,
) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    Error: From<E>,
    W: Write,
    F: FnMut(DownloadProgress),
{
    let mut stream = std::pin::pin!(stream);
    let mut transferred: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        for piece in chunk.as_ref().chunks(CHUNK_SIZE) {
            out.write_all(piece)?;
            transferred += piece.len() as u64;
            on_progress(DownloadProgress { transferred, total });
        }
    }
    out.flush()?;

    if let Some(expected) = total
        && expected != transferred
    {
        return Err(Error::SizeMismatch { expected, received: transferred });
    }

    Ok(transferred)
}

/// Streams installer packages from the network into an [`InstallerCache`].
#[derive(Clone)]
pub struct Downloader {
    client: reqwest::Client,
    cache: InstallerCache,
}

impl Downloader {
    pub fn new(client: reqwest::Client, cache_dir: impl Into<PathBuf>) -> Self {
        Self { client, cache: InstallerCache::new(cache_dir) }
    }

    pub fn cache(&self) -> &InstallerCache {
        &self.cache
    }

    /// Download `url` into a fresh package file and return its path.
    ///
    /// On failure the partially written file is removed.
    pub async fn download<F>(&self, url: &Url, on_progress: F) -> Result<PathBuf>
    where
        F: FnMut(DownloadProgress),
    {
        let resp = self.client.get(url.clone()).send().await?.error_for_status()?;
        let total = resp.content_length();

        let mut file = self.cache.create_installer_file()?;
        let written = copy_in_chunks(resp.bytes_stream(), total, file.as_file_mut(), on_progress)
            .await?;

        let (_, path) = file.keep().map_err(|e| e.error)?;
        log::info!("Downloaded {written} bytes to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use futures::stream;
    use tempfile::TempDir;

    use super::*;

    fn ok_chunks(chunks: Vec<Vec<u8>>) -> impl Stream<Item = std::result::Result<Vec<u8>, Error>> {
        stream::iter(chunks.into_iter().map(Ok))
    }

    #[test]
    fn percent_guards_unknown_and_zero_totals() {
        assert_eq!(DownloadProgress { transferred: 10, total: None }.percent(), None);
        assert_eq!(DownloadProgress { transferred: 0, total: Some(0) }.percent(), None);
        assert_eq!(DownloadProgress { transferred: 512, total: Some(2048) }.percent(), Some(25));
        assert_eq!(DownloadProgress { transferred: 2047, total: Some(2048) }.percent(), Some(99));
        assert_eq!(DownloadProgress { transferred: 4096, total: Some(2048) }.percent(), Some(100));
    }

    #[tokio::test]
    async fn copies_in_fixed_chunks_with_monotonic_progress() {
        let data: Vec<u8> = (0..3000u32).map(|i| (i % 251) as u8).collect();
        let stream = ok_chunks(vec![data[..2500].to_vec(), data[2500..].to_vec()]);

        let mut out = Vec::new();
        let mut seen = Vec::new();
        let written =
            copy_in_chunks(stream, Some(3000), &mut out, |p| seen.push(p)).await.unwrap();

        assert_eq!(written, 3000);
        assert_eq!(out, data);
        // 2500 -> 1024 + 1024 + 452, then 500
        let transferred: Vec<u64> = seen.iter().map(|p| p.transferred).collect();
        assert_eq!(transferred, vec![1024, 2048, 2500, 3000]);
        assert!(seen.windows(2).all(|w| w[0].transferred <= w[1].transferred));
        assert_eq!(seen.last().unwrap().percent(), Some(100));
    }

    #[tokio::test]
    async fn short_stream_is_a_size_mismatch() {
        let mut out = Vec::new();
        let err = copy_in_chunks(ok_chunks(vec![vec![1; 100]]), Some(200), &mut out, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { expected: 200, received: 100 }));
    }

    #[tokio::test]
    async fn overlong_stream_is_a_size_mismatch() {
        let mut out = Vec::new();
        let err = copy_in_chunks(ok_chunks(vec![vec![1; 300]]), Some(200), &mut out, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { expected: 200, received: 300 }));
    }

    #[tokio::test]
    async fn unknown_total_accepts_any_length() {
        let mut out = Vec::new();
        let mut last = None;
        let written =
            copy_in_chunks(ok_chunks(vec![vec![7; 10]]), None, &mut out, |p| last = Some(p))
                .await
                .unwrap();
        assert_eq!(written, 10);
        assert_eq!(last.unwrap().percent(), None);
    }

    #[tokio::test]
    async fn stream_error_propagates() {
        let items: Vec<std::result::Result<Vec<u8>, Error>> = vec![
            Ok(vec![0; 1024]),
            Err(Error::Io(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))),
        ];
        let mut out = Vec::new();
        let mut calls = 0;
        let err = copy_in_chunks(stream::iter(items), Some(4096), &mut out, |_| calls += 1)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(calls, 1);
    }

    #[test]
    fn delete_stale_removes_only_installers() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let cache = InstallerCache::new(dir.path());
        fs::write(dir.path().join("skytube-upgrade1.apk"), b"old").unwrap();
        fs::write(dir.path().join("other.apk"), b"old").unwrap();
        fs::write(dir.path().join("notes.txt"), b"keep").unwrap();

        assert_eq!(cache.delete_stale(), 2);
        assert!(cache.installers().unwrap().is_empty());
        assert!(dir.path().join("notes.txt").exists());

        // Idempotent
        assert_eq!(cache.delete_stale(), 0);
    }

    #[test]
    fn undeletable_entry_is_skipped() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let cache = InstallerCache::new(dir.path());
        fs::create_dir(dir.path().join("stuck.apk")).unwrap();
        fs::write(dir.path().join("skytube-upgrade1.apk"), b"old").unwrap();

        assert_eq!(cache.delete_stale(), 1);
        assert!(dir.path().join("stuck.apk").is_dir());
        assert!(cache.installers().unwrap().is_empty());
    }

    #[test]
    fn delete_stale_on_missing_dir_is_harmless() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let cache = InstallerCache::new(dir.path().join("missing"));
        assert_eq!(cache.delete_stale(), 0);
    }

    #[test]
    fn installer_files_follow_naming_and_are_dropped_unless_kept() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let cache = InstallerCache::new(dir.path());

        let file = cache.create_installer_file().unwrap();
        let name = file.path().file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with(INSTALLER_PREFIX));
        assert!(InstallerCache::is_installer(&name));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(file.path()).unwrap().permissions().mode();
            assert_eq!(mode & 0o004, 0o004);
        }

        drop(file);
        assert!(cache.installers().unwrap().is_empty());
    }
}
