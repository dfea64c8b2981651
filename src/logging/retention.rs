//! Log file retention management
//!
//! Handles the startup sweep of old files from the log directory.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::error::{Error, Result};

/// Default retention period in days
pub const DEFAULT_RETENTION_DAYS: u64 = 30;

/// Delete every file in `logs_dir` last modified more than `retention_days` ago
///
/// Any file name qualifies; subdirectories are left alone. Failing to enumerate the
/// directory is an error, but a file that cannot be inspected or removed is skipped.
///
/// Returns the number of files deleted.
pub fn sweep_old_files(logs_dir: &Path, retention_days: u64) -> Result<usize> {
    let retention_duration = Duration::from_secs(retention_days * 24 * 60 * 60);
    let cutoff = SystemTime::now()
        .checked_sub(retention_duration)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let entries = fs::read_dir(logs_dir).map_err(|source| Error::Retention {
        path: logs_dir.to_path_buf(),
        source,
    })?;

    let mut deleted_count = 0;

    for entry in entries {
        let Ok(entry) = entry else {
            continue;
        };

        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if metadata.is_dir() {
            continue;
        }

        if let Ok(modified) = metadata.modified() {
            if modified < cutoff && fs::remove_file(entry.path()).is_ok() {
                deleted_count += 1;
            }
        }
    }

    if deleted_count > 0 {
        tracing::info!(
            "Removed {} log files older than {} days from {}",
            deleted_count,
            retention_days,
            logs_dir.display()
        );
    }

    Ok(deleted_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn age_file(path: &Path, days: u64) {
        let when = SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60);
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(when)
            .unwrap();
    }

    #[test]
    fn test_sweep_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        let count = sweep_old_files(temp_dir.path(), 30).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_sweep_nonexistent_dir_fails() {
        let path = Path::new("/nonexistent/path/for/testing");
        let err = sweep_old_files(path, 30).unwrap_err();
        assert!(matches!(err, Error::Retention { .. }));
    }

    #[test]
    fn test_sweep_keeps_recent_files() {
        let temp_dir = TempDir::new().unwrap();

        let log_file = temp_dir.path().join("logfile_2026-10-16.log.json");
        File::create(&log_file)
            .unwrap()
            .write_all(b"{}\n")
            .unwrap();

        let count = sweep_old_files(temp_dir.path(), 30).unwrap();
        assert_eq!(count, 0);
        assert!(log_file.exists());
    }

    #[test]
    fn test_sweep_removes_old_files_of_any_name() {
        let temp_dir = TempDir::new().unwrap();

        let old_log = temp_dir.path().join("logfile_2026-08-01.log.json");
        let old_other = temp_dir.path().join("notes.txt");
        let recent = temp_dir.path().join("logfile_2026-10-15.log.json");
        for path in [&old_log, &old_other, &recent] {
            File::create(path).unwrap().write_all(b"x").unwrap();
        }
        age_file(&old_log, 45);
        age_file(&old_other, 31);
        age_file(&recent, 29);

        let count = sweep_old_files(temp_dir.path(), 30).unwrap();
        assert_eq!(count, 2);
        assert!(!old_log.exists());
        assert!(!old_other.exists());
        assert!(recent.exists());

        // Nothing new to remove the second time round
        assert_eq!(sweep_old_files(temp_dir.path(), 30).unwrap(), 0);
        assert!(recent.exists());
    }

    #[test]
    fn test_sweep_skips_directories() {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("archive");
        fs::create_dir(&sub).unwrap();

        let count = sweep_old_files(temp_dir.path(), 0).unwrap();
        assert_eq!(count, 0);
        assert!(sub.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_sweep_ignores_files_it_cannot_delete() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let stuck = temp_dir.path().join("logfile_2026-08-01.log.json");
        File::create(&stuck).unwrap().write_all(b"{}\n").unwrap();
        age_file(&stuck, 45);

        fs::set_permissions(temp_dir.path(), fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits don't bind root; nothing to observe then
        let check_path = temp_dir.path().join(".write-check");
        if File::create(&check_path).is_ok() {
            let _ = fs::remove_file(&check_path);
            fs::set_permissions(temp_dir.path(), fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = sweep_old_files(temp_dir.path(), 30);
        fs::set_permissions(temp_dir.path(), fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(result.unwrap(), 0);
        assert!(stuck.exists());
    }
}
