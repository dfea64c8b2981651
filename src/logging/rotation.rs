//! Date-partitioned rotation targets
//!
//! Each calendar day gets its own `logfile_<YYYY-MM-DD>.log.json`. Within a day the
//! [`RollingFile`] handles size-based rotation; across days the [`RotationManager`]
//! swaps in a fresh target.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};

use super::clock::Clock;
use super::retention::sweep_old_files;
use super::rolling::{RollingFile, RotationPolicy};
use crate::error::{Error, Result};

/// File name of the log for a calendar day
pub fn log_file_name(date: NaiveDate) -> String {
    format!("logfile_{}.log.json", date.format("%Y-%m-%d"))
}

/// The active destination file for one calendar day
pub struct RotationTarget {
    date: NaiveDate,
    file: RollingFile,
}

impl RotationTarget {
    fn new(directory: &Path, date: NaiveDate, policy: RotationPolicy, clock: Arc<dyn Clock>) -> Self {
        let path = directory.join(log_file_name(date));
        Self {
            date,
            file: RollingFile::new(path, policy, clock),
        }
    }

    /// Calendar day this target covers
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Path of the dated log file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Size-based rotation thresholds for this target
    pub fn policy(&self) -> &RotationPolicy {
        self.file.policy()
    }

    /// Rolled backups of this target, newest first
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        self.file.backups()
    }
}

/// Owns the active rotation target and swaps it when the date changes
pub struct RotationManager {
    directory: PathBuf,
    policy: RotationPolicy,
    clock: Arc<dyn Clock>,
    target: RotationTarget,
}

impl RotationManager {
    /// Prepare `directory` and open today's log file
    ///
    /// Creates the directory if needed, then deletes files older than
    /// `retention_days` before opening the target.
    pub fn initialize(
        directory: impl Into<PathBuf>,
        retention_days: u64,
        policy: RotationPolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory).map_err(|source| Error::CreateDirectory {
            path: directory.clone(),
            source,
        })?;

        sweep_old_files(&directory, retention_days)?;

        let today = clock.now().date_naive();
        let mut target = RotationTarget::new(&directory, today, policy.clone(), Arc::clone(&clock));
        target.file.open()?;

        tracing::info!("Logging to {}", target.path().display());

        Ok(Self {
            directory,
            policy,
            clock,
            target,
        })
    }

    /// Return the target for `now`'s calendar day
    ///
    /// When the day differs from the active target's, a new target replaces it and
    /// the returned flag is `true` so the caller can reset date-scoped state.
    pub fn current_target(&mut self, now: DateTime<Local>) -> (&RotationTarget, bool) {
        let date = now.date_naive();
        if date == self.target.date {
            return (&self.target, false);
        }

        self.target = RotationTarget::new(
            &self.directory,
            date,
            self.policy.clone(),
            Arc::clone(&self.clock),
        );
        tracing::info!("Date changed, logging to {}", self.target.path().display());
        (&self.target, true)
    }

    /// Append bytes to the active target
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.target.file.write_all(bytes)
    }

    /// The active target
    pub fn target(&self) -> &RotationTarget {
        &self.target
    }

    /// Directory holding all log files
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Size-based rotation thresholds applied to every target
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}
