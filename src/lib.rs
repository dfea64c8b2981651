//! daylog - date-partitioned JSON line logging with size-based rotation
//!
//! A [`Logger`] writes every entry to `logfile_<YYYY-MM-DD>.log.json` in the log
//! directory, rolling the file by size within a day and switching files at midnight.

pub mod config;
pub mod error;
pub mod logging;
pub mod relay;

pub use error::{Error, Result};
pub use logging::{LogEntry, LogLevel, Logger};
