// Writing artifacts to disk with collision checks and numbered backups
//
// Backup-then-write is probe, copy, write. Nothing is locked, so two
// writers racing on the same path can clobber each other's backups.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// What to do when the target of a write already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Fail with `FileCollision`
    Reject,
    /// Copy the existing entry to the next free backup name, then write
    BackupThenWrite,
}

/// A file about to be written
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    pub path: PathBuf,
    pub content: String,
    pub policy: OverwritePolicy,
}

impl OutputArtifact {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, policy: OverwritePolicy) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            policy,
        }
    }
}

/// Result of a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Replaced { backup: PathBuf },
}

/// Writes artifacts, backing up what they replace
#[derive(Debug, Clone)]
pub struct OutputManager {
    backup_prefix: String,
}

impl OutputManager {
    /// `backup_prefix` is appended to a path before the backup number
    pub fn new(backup_prefix: impl Into<String>) -> Self {
        Self {
            backup_prefix: backup_prefix.into(),
        }
    }

    /// Create `path` and all missing ancestors
    pub fn ensure_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    /// Write an artifact according to its policy
    pub fn write(&self, artifact: &OutputArtifact) -> Result<WriteOutcome> {
        let path = &artifact.path;
        let mut outcome = WriteOutcome::Created;

        if path.exists() {
            match artifact.policy {
                OverwritePolicy::Reject => return Err(Error::FileCollision(path.clone())),
                OverwritePolicy::BackupThenWrite => {
                    let backup = self.backup(path)?;
                    info!(path = %path.display(), backup = %backup.display(), "backed up");
                    outcome = WriteOutcome::Replaced { backup };
                }
            }
        }

        fs::write(path, &artifact.content)?;
        debug!(path = %path.display(), "wrote");
        Ok(outcome)
    }

    /// Copy `source` to the first free `<source><prefix>N`, N counting from 0.
    /// Files are copied as is, directories recursively.
    pub fn backup(&self, source: &Path) -> Result<PathBuf> {
        let is_dir = if source.is_file() {
            false
        } else if source.is_dir() {
            true
        } else {
            return Err(Error::BackupSourceInvalid(source.to_path_buf()));
        };

        let mut n = 0usize;
        let mut target = self.backup_path(source, n);
        while target.exists() {
            n += 1;
            target = self.backup_path(source, n);
        }

        if is_dir {
            copy_tree(source, &target)?;
        } else {
            fs::copy(source, &target)?;
        }
        Ok(target)
    }

    fn backup_path(&self, source: &Path, n: usize) -> PathBuf {
        let mut name = OsString::from(source.as_os_str());
        name.push(format!("{}{}", self.backup_prefix, n));
        PathBuf::from(name)
    }
}

/// Recursive copy following symlinks
fn copy_tree(source: &Path, target: &Path) -> Result<()> {
    for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::other(e.to_string()))?;
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &dest)?;
        } else {
            warn!(path = %entry.path().display(), "skipping special file in backup");
        }
    }
    Ok(())
}
