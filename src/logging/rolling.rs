//! Size-based log file rotation
//!
//! A [`RollingFile`] appends to one path through a [`LogRoller`], which rolls the
//! file once it outgrows the size threshold and keeps at most `max_backups` rolled
//! copies. `LogRoller` has no notion of backup age, so backups older than
//! `max_age` are removed here, judged by modification time.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::Duration;
use logroller::{LogRoller, LogRollerBuilder, Rotation, RotationSize, TimeZone};

use super::clock::Clock;
use crate::error::{Error, Result};

/// Thresholds for size-based rotation and backup pruning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Maximum size in bytes before the file is rolled
    pub max_size: u64,
    /// Maximum number of backups to keep (0 keeps all)
    pub max_backups: usize,
    /// Maximum age of a backup (zero keeps all)
    pub max_age: Duration,
    /// Use local time instead of UTC when naming backups
    pub local_time: bool,
}

/// Default size threshold (2 MiB)
pub const DEFAULT_MAX_SIZE: u64 = 2 * 1024 * 1024;

/// Default number of backups kept
pub const DEFAULT_MAX_BACKUPS: usize = 30;

/// Default backup age limit in days
pub const DEFAULT_MAX_AGE_DAYS: i64 = 30;

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            max_backups: DEFAULT_MAX_BACKUPS,
            max_age: Duration::days(DEFAULT_MAX_AGE_DAYS),
            local_time: true,
        }
    }
}

impl RotationPolicy {
    fn rotation_size(&self) -> RotationSize {
        const MIB: u64 = 1024 * 1024;
        if self.max_size % MIB == 0 {
            RotationSize::MB(self.max_size / MIB)
        } else {
            RotationSize::KB(self.max_size.div_ceil(1024))
        }
    }

    fn time_zone(&self) -> TimeZone {
        if self.local_time {
            TimeZone::Local
        } else {
            TimeZone::UTC
        }
    }
}

/// An append-only file that rolls over when it grows past a size threshold
pub struct RollingFile {
    path: PathBuf,
    policy: RotationPolicy,
    clock: Arc<dyn Clock>,
    roller: Option<LogRoller>,
    /// Bytes written since the last estimated rollover
    size: u64,
}

impl RollingFile {
    /// Create a rolling file at `path`. Nothing is opened until the first write
    /// or an explicit [`RollingFile::open`].
    pub fn new(path: PathBuf, policy: RotationPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            path,
            policy,
            clock,
            roller: None,
            size: 0,
        }
    }

    /// Path of the active file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rotation thresholds in effect
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Open the active file, creating it if needed, and drop expired backups
    pub fn open(&mut self) -> Result<()> {
        if self.roller.is_some() {
            return Ok(());
        }

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|source| Error::CreateDirectory {
            path: dir.to_path_buf(),
            source,
        })?;

        // Make sure the dated file exists from the start, not only after the first write
        let existing = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|file| file.metadata())
            .map_err(|source| Error::Open {
                path: self.path.clone(),
                source,
            })?;
        self.size = existing.len();

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir_name = dir.to_string_lossy().into_owned();

        let mut builder = LogRollerBuilder::new(&*dir_name, &*file_name)
            .rotation(Rotation::SizeBased(self.policy.rotation_size()))
            .time_zone(self.policy.time_zone());
        if self.policy.max_backups > 0 {
            builder = builder.max_keep_files(self.policy.max_backups as _);
        }
        let roller = builder.build().map_err(|e| Error::Open {
            path: self.path.clone(),
            source: std::io::Error::other(e.to_string()),
        })?;
        self.roller = Some(roller);

        self.prune_expired_logged();
        Ok(())
    }

    /// Append `buf` in a single write
    pub fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        let len = buf.len() as u64;
        if len > self.policy.max_size {
            return Err(Error::EntryTooLarge {
                len,
                max: self.policy.max_size,
            });
        }

        self.open()?;
        let path = &self.path;
        let roller = self.roller.as_mut().ok_or_else(|| Error::Open {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "log file is not open"),
        })?;
        roller
            .write_all(buf)
            .and_then(|_| roller.flush())
            .map_err(|source| Error::Write {
                path: path.clone(),
                source,
            })?;

        self.size += len;
        if self.size > self.policy.max_size {
            // The roller has rolled the file by now; new backups may have aged out others
            self.size = len;
            self.prune_expired_logged();
        }
        Ok(())
    }

    /// Rolled backups of this file, newest first
    ///
    /// A backup is any other file in the directory whose name starts with the
    /// active file's name.
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let Some(file_name) = self.path.file_name().and_then(|n| n.to_str()) else {
            return Ok(Vec::new());
        };

        let mut backups = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name == file_name || !name.starts_with(file_name) {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            backups.push((modified, entry.path()));
        }

        backups.sort_by(|a, b| b.cmp(a));
        Ok(backups.into_iter().map(|(_, path)| path).collect())
    }

    /// Delete backups last modified before `now - max_age`
    ///
    /// Returns the number of files deleted.
    fn prune_expired(&self) -> Result<usize> {
        if self.policy.max_age <= Duration::zero() {
            return Ok(0);
        }
        let cutoff = SystemTime::from(self.clock.now() - self.policy.max_age);

        let mut deleted = 0;
        for path in self.backups()? {
            let expired = fs::metadata(&path)
                .and_then(|m| m.modified())
                .is_ok_and(|modified| modified < cutoff);
            if expired && fs::remove_file(&path).is_ok() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    fn prune_expired_logged(&self) {
        match self.prune_expired() {
            Ok(0) => {}
            Ok(count) => tracing::debug!("Pruned {} expired backups of {}", count, self.path.display()),
            Err(e) => tracing::warn!("Failed to prune backups of {}: {}", self.path.display(), e),
        }
    }
}
