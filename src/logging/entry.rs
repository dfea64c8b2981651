//! Log entries and the in-memory session buffer

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// The label written to the log file and console
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so width and alignment flags apply
        f.pad(self.as_str())
    }
}

/// Returned when text does not name a log level
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// A single log entry
///
/// Field order is the serialized order: `time`, `level`, `component`, `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the entry was recorded, with the local offset at that moment
    #[serde(serialize_with = "serialize_time", deserialize_with = "deserialize_time")]
    pub time: DateTime<FixedOffset>,
    /// Severity
    pub level: LogLevel,
    /// Subsystem that produced the entry
    pub component: String,
    /// Log message
    pub message: String,
}

fn serialize_time<S: Serializer>(
    time: &DateTime<FixedOffset>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Nanos, true))
}

fn deserialize_time<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<DateTime<FixedOffset>, D::Error> {
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&s).map_err(serde::de::Error::custom)
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(
        time: DateTime<FixedOffset>,
        level: LogLevel,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            time,
            level,
            component: component.into(),
            message: message.into(),
        }
    }

    /// Serialize as a single newline-terminated JSON line
    pub fn to_json_line(&self) -> Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }

    /// Human-readable rendering for the console, without a trailing newline
    pub fn console_line(&self) -> String {
        format!(
            "[{}] [{:>5}] {:<15}: {}",
            self.time.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.level,
            self.component,
            self.message
        )
    }
}

/// Entries accumulated since the last date rollover, with the session header
///
/// This is a write-side accumulator only. Each entry is written to disk on its
/// own line; the session as a whole is never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct LogSession {
    /// Display name of the application
    #[serde(rename = "Name")]
    pub name: String,
    /// Host the application serves on
    #[serde(rename = "Server Host")]
    pub server_host: String,
    /// Port the application serves on
    #[serde(rename = "Server Port")]
    pub server_port: u16,
    /// Entries since the last reset
    #[serde(rename = "log")]
    log: Vec<LogEntry>,
}

impl LogSession {
    /// Create an empty session
    pub fn new(name: impl Into<String>, server_host: impl Into<String>, server_port: u16) -> Self {
        Self {
            name: name.into(),
            server_host: server_host.into(),
            server_port,
            log: Vec::new(),
        }
    }

    /// Append an entry
    pub fn push(&mut self, entry: LogEntry) {
        self.log.push(entry);
    }

    /// Drop all entries, keeping the header
    pub fn reset(&mut self) {
        self.log.clear();
    }

    /// Entries in append order
    pub fn entries(&self) -> &[LogEntry] {
        &self.log
    }

    /// Get the number of entries in the session
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Check if the session is empty
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}
