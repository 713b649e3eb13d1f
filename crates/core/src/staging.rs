//! Staged artifact writes.
//!
//! Artifacts are first written next to their destination as `<dest>.part` and
//! only renamed over the destination on commit, so a failed run never leaves a
//! half-written file where a previous good one used to be.
//!
//! When two artifacts have to change together, the first one is committed
//! with [`StagedFile::commit_with_backup`]: the previous file stays reachable
//! as `<dest>.bak` until the caller either restores or finishes it.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Suffix of staging files.
pub const STAGING_SUFFIX: &str = "part";

/// Suffix of the copy kept while a replacement is pending.
pub const BACKUP_SUFFIX: &str = "bak";

/// Returns `path` with `.suffix` appended to its full file name
/// (`song.raw` -> `song.raw.txth`).
pub fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// A fully written file waiting to replace its destination.
///
/// Dropping an uncommitted `StagedFile` removes the staging file and leaves
/// the destination untouched.
#[derive(Debug)]
pub struct StagedFile {
    staging_path: PathBuf,
    destination: PathBuf,
    done: bool,
}

impl StagedFile {
    /// Writes `contents` to the staging path for `destination`.
    pub async fn write(destination: &Path, contents: &[u8]) -> std::io::Result<Self> {
        let staging_path = sidecar_path(destination, STAGING_SUFFIX);

        if let Err(e) = Self::write_contents(&staging_path, contents).await {
            let _ = fs::remove_file(&staging_path).await;
            return Err(e);
        }

        Ok(Self {
            staging_path,
            destination: destination.to_path_buf(),
            done: false,
        })
    }

    async fn write_contents(path: &Path, contents: &[u8]) -> std::io::Result<()> {
        let mut file = File::create(path).await?;
        file.write_all(contents).await?;
        file.sync_all().await
    }

    /// Where the contents currently live.
    pub fn staging_path(&self) -> &Path {
        &self.staging_path
    }

    /// Renames the staging file over the destination.
    pub async fn commit(mut self) -> std::io::Result<PathBuf> {
        fs::rename(&self.staging_path, &self.destination).await?;
        self.done = true;
        Ok(self.destination.clone())
    }

    /// Renames the staging file over the destination, keeping the previous
    /// destination as a hard link at `<dest>.bak`.
    ///
    /// The destination is never absent during the swap. Fails without
    /// touching anything if the destination exists but cannot be linked
    /// (a directory, for instance).
    pub async fn commit_with_backup(self) -> std::io::Result<Replacement> {
        let backup = sidecar_path(&self.destination, BACKUP_SUFFIX);
        remove_if_present(&backup).await?;

        let backup = match fs::hard_link(&self.destination, &backup).await {
            Ok(()) => Some(backup),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };

        match self.commit().await {
            Ok(destination) => Ok(Replacement {
                destination,
                backup,
            }),
            Err(e) => {
                if let Some(backup) = &backup {
                    let _ = fs::remove_file(backup).await;
                }
                Err(e)
            }
        }
    }

    /// Removes the staging file without touching the destination.
    pub async fn discard(mut self) {
        let _ = fs::remove_file(&self.staging_path).await;
        self.done = true;
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.done {
            // Drop cannot await; a blocking unlink is acceptable here.
            let _ = std::fs::remove_file(&self.staging_path);
        }
    }
}

/// A committed file whose previous contents can still be put back.
#[derive(Debug)]
#[must_use = "call `finish` or `restore` to settle the backup"]
pub struct Replacement {
    destination: PathBuf,
    backup: Option<PathBuf>,
}

impl Replacement {
    /// Puts the previous contents back, or removes the destination if there
    /// was none.
    pub async fn restore(self) -> std::io::Result<()> {
        match &self.backup {
            Some(backup) => fs::rename(backup, &self.destination).await?,
            None => remove_if_present(&self.destination).await?,
        }
        debug!("Restored {:?}", self.destination);
        Ok(())
    }

    /// Keeps the new contents and drops the backup.
    pub async fn finish(self) {
        if let Some(backup) = &self.backup {
            if let Err(e) = fs::remove_file(backup).await {
                warn!("Failed to remove backup {:?}: {}", backup, e);
            }
        }
    }
}

async fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
