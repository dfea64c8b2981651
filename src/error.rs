//! Error types for the logging facility

use std::io;
use std::path::PathBuf;

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while initializing or writing logs
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error with no more specific context
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to create the log directory
    #[error("Failed to create log directory at {path}: {source}")]
    CreateDirectory {
        /// The directory that could not be created
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// Failed to enumerate the log directory during the retention sweep
    #[error("Failed to read log directory {path}: {source}")]
    Retention {
        /// The directory being swept
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// Failed to open the active log file
    #[error("Failed to open log file {path}: {source}")]
    Open {
        /// The file that could not be opened
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// Failed to append to the active log file
    #[error("Failed to write log file {path}: {source}")]
    Write {
        /// The file being written
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// A single write is larger than the size threshold
    #[error("Write of {len} bytes exceeds maximum log file size of {max} bytes")]
    EntryTooLarge {
        /// Length of the rejected write
        len: u64,
        /// Configured size threshold
        max: u64,
    },

    /// Failed to serialize an entry
    #[error("Failed to serialize log entry: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// The underlying I/O error, if there is one
    pub fn io_source(&self) -> Option<&io::Error> {
        match self {
            Error::Io(e) => Some(e),
            Error::CreateDirectory { source, .. }
            | Error::Retention { source, .. }
            | Error::Open { source, .. }
            | Error::Write { source, .. } => Some(source),
            Error::EntryTooLarge { .. } | Error::Serialization(_) => None,
        }
    }
}

/// Categories of disk errors for user-friendly messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskErrorKind {
    /// Disk is full or quota exceeded
    DiskFull,
    /// Permission denied (read or write)
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// Other IO error
    Other,
}

impl DiskErrorKind {
    /// Get a user-friendly message for this error kind
    pub fn user_message(&self) -> &'static str {
        match self {
            DiskErrorKind::DiskFull => "disk full, free space is needed to keep logging",
            DiskErrorKind::PermissionDenied => "permission denied on the log directory",
            DiskErrorKind::NotFound => "log file or directory not found",
            DiskErrorKind::Other => "failed to write log",
        }
    }
}

/// Categorize an IO error into a user-friendly category
pub fn categorize_io_error(e: &io::Error) -> DiskErrorKind {
    use std::io::ErrorKind;

    match e.kind() {
        ErrorKind::StorageFull | ErrorKind::WriteZero => DiskErrorKind::DiskFull,
        ErrorKind::PermissionDenied => DiskErrorKind::PermissionDenied,
        ErrorKind::NotFound => DiskErrorKind::NotFound,
        _ => {
            #[cfg(unix)]
            {
                if let Some(os_error) = e.raw_os_error() {
                    // ENOSPC = 28, EDQUOT = 122 (Linux) / 69 (macOS)
                    if os_error == 28 || os_error == 122 || os_error == 69 {
                        return DiskErrorKind::DiskFull;
                    }
                    // EACCES
                    if os_error == 13 {
                        return DiskErrorKind::PermissionDenied;
                    }
                }
            }
            DiskErrorKind::Other
        }
    }
}

/// Build the one-line diagnostic printed before the process aborts
pub fn fatal_diagnostic(err: &Error) -> String {
    match err.io_source().map(categorize_io_error) {
        Some(DiskErrorKind::Other) | None => format!("logging failed: {}", err),
        Some(kind) => format!("logging failed: {} ({})", kind.user_message(), err),
    }
}
