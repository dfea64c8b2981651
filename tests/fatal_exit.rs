//! The fatal path ends the process, so it runs in a child copy of this test binary.

use std::fs;
use std::path::Path;
use std::process::Command;

use daylog::config::Config;
use daylog::{LogEntry, LogLevel, Logger};
use tempfile::TempDir;

const CHILD_DIR_VAR: &str = "DAYLOG_FATAL_CHILD_DIR";

fn read_all_entries(dir: &Path) -> Vec<LogEntry> {
    let mut paths: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("logfile_") && n.ends_with(".log.json"))
        })
        .collect();
    paths.sort();

    paths
        .iter()
        .flat_map(|p| {
            fs::read_to_string(p)
                .unwrap()
                .lines()
                .map(|line| serde_json::from_str::<LogEntry>(line).unwrap())
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn fatal_writes_entry_then_exits() {
    if let Ok(dir) = std::env::var(CHILD_DIR_VAR) {
        let mut config = Config::default();
        config.logging.directory = Some(dir);
        let logger = Logger::from_config(&config).unwrap();
        logger.info("child", "before fatal");
        logger.fatal("child", "giving up");
    }

    let temp_dir = TempDir::new().unwrap();
    let output = Command::new(std::env::current_exe().unwrap())
        .args(["fatal_writes_entry_then_exits", "--exact", "--nocapture"])
        .env(CHILD_DIR_VAR, temp_dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let entries = read_all_entries(temp_dir.path());
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].message, "before fatal");
    assert_eq!(entries[1].level, LogLevel::Fatal);
    assert_eq!(entries[1].component, "child");
    assert_eq!(entries[1].message, "giving up");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[fatal] child          : giving up"));
    // The harness never got to report the test as finished
    assert!(!stdout.contains("test result"));
}

const WRITE_FAILURE_DIR_VAR: &str = "DAYLOG_WRITE_FAILURE_CHILD_DIR";

#[test]
fn failed_write_aborts_with_diagnostic() {
    if let Ok(dir) = std::env::var(WRITE_FAILURE_DIR_VAR) {
        let mut config = Config::default();
        config.logging.directory = Some(dir);
        config.logging.max_size_mb = 1;
        let logger = Logger::from_config(&config).unwrap();
        logger.info("child", "fits");
        // Larger than the whole file is allowed to be
        logger.info("child", &"x".repeat(2 * 1024 * 1024));
        logger.info("child", "never written");
        std::process::exit(0);
    }

    let temp_dir = TempDir::new().unwrap();
    let output = Command::new(std::env::current_exe().unwrap())
        .args(["failed_write_aborts_with_diagnostic", "--exact", "--nocapture"])
        .env(WRITE_FAILURE_DIR_VAR, temp_dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("logging failed:"), "stderr was: {}", stderr);

    let entries = read_all_entries(temp_dir.path());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "fits");
}
