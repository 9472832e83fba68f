// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content-addressed artifact store.
//!
//! A file with hash `H` and name `N` lives at `<root>/H/N`. Validation
//! happens on every read, not just after a write, so interrupted downloads
//! and on-disk tampering read as "not cached" instead of being executed.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use errand_client::{ClientError, HttpGet};
use errand_core::FileEntry;
use sha2::{Digest, Sha256};

use crate::error::CacheError;

/// Tries per file before the download error surfaces.
const DOWNLOAD_ATTEMPTS: u32 = 2;
/// Pause between tries.
const RETRY_PAUSE: Duration = Duration::from_millis(100);

/// Local store for task files, addressed by sha256.
pub struct ArtifactCache<H> {
    root: PathBuf,
    http: H,
}

impl<H: HttpGet> ArtifactCache<H> {
    pub fn new(root: impl Into<PathBuf>, http: H) -> Self {
        Self { root: root.into(), http }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding all names for one content hash.
    fn entry_dir(&self, file: &FileEntry) -> PathBuf {
        self.root.join(&file.sha256)
    }

    /// Final on-disk location of a cached file.
    pub fn file_path(&self, file: &FileEntry) -> PathBuf {
        self.entry_dir(file).join(&file.filename)
    }

    /// A file is cached iff the hash directory and the file exist, the size
    /// matches, and the content re-hashes to the expected digest.
    pub fn is_cached(&self, file: &FileEntry) -> bool {
        if !self.entry_dir(file).is_dir() {
            return false;
        }
        let path = self.file_path(file);
        let Ok(meta) = std::fs::metadata(&path) else {
            return false;
        };
        if !meta.is_file() || meta.len() != file.size_bytes {
            return false;
        }
        match hash_file(&path) {
            Ok(digest) => digest == file.sha256.to_ascii_lowercase(),
            Err(_) => false,
        }
    }

    /// True when every file of the batch is cached.
    pub fn all_cached(&self, files: &[FileEntry]) -> bool {
        files.iter().all(|f| self.is_cached(f))
    }

    /// Ensure every file of the batch is cached, downloading what's missing.
    ///
    /// Any file that still fails after its retries fails the whole batch.
    pub async fn ensure_cached(&self, files: &[FileEntry]) -> Result<(), CacheError> {
        for file in files {
            if self.is_cached(file) {
                tracing::debug!(file = %file.filename, sha256 = %file.sha256, "already cached");
                continue;
            }
            self.download(file).await?;
        }
        Ok(())
    }

    /// Download one file with bounded retries. The error of the final
    /// attempt is the one the caller sees.
    async fn download(&self, file: &FileEntry) -> Result<(), CacheError> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(file).await {
                Ok(()) => {
                    tracing::info!(
                        file = %file.filename,
                        sha256 = %file.sha256,
                        attempt,
                        "task file cached"
                    );
                    return Ok(());
                }
                Err(e) if attempt >= DOWNLOAD_ATTEMPTS => return Err(e),
                Err(e) => {
                    tracing::warn!(file = %file.filename, attempt, error = %e, "download failed");
                    attempt += 1;
                    tokio::time::sleep(RETRY_PAUSE).await;
                }
            }
        }
    }

    /// One download attempt: fetch, stage, rename into place.
    ///
    /// The temp file is staged inside the hash directory so the rename
    /// stays on one filesystem and is atomic. Concurrent fetchers of the
    /// same hash each stage their own temp file; last rename wins and every
    /// winner is byte-identical.
    async fn fetch_once(&self, file: &FileEntry) -> Result<(), CacheError> {
        let url = file.uri.url();
        let response = self.http.get(&url, &[("Accept", "application/octet-stream")]).await?;
        if !response.is_success() {
            return Err(ClientError::status(response.code, &response.body).into());
        }

        let dir = self.entry_dir(file);
        std::fs::create_dir_all(&dir)?;
        set_mode(&dir, 0o750)?;

        let mut staged = tempfile::Builder::new().prefix(".download-").tempfile_in(&dir)?;
        staged.write_all(&response.body)?;
        staged.flush()?;
        set_mode(staged.path(), 0o750)?;
        staged.persist(self.file_path(file)).map_err(|e| CacheError::Io(e.error))?;
        Ok(())
    }
}

/// Hex-encoded sha256 of a file, streamed in chunks.
pub fn hash_file(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
