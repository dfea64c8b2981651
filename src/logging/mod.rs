//! Logging system for daylog
//!
//! Appends leveled entries as JSON lines to a date-partitioned, size-rotated file,
//! prunes stale files at startup, and echoes each entry to the console.

mod clock;
mod entry;
mod retention;
mod rolling;
mod rotation;
mod writer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{LogEntry, LogLevel, LogSession, ParseLevelError};
pub use retention::{sweep_old_files, DEFAULT_RETENTION_DAYS};
pub use rolling::{
    RollingFile, RotationPolicy, DEFAULT_MAX_AGE_DAYS, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_SIZE,
};
pub use rotation::{log_file_name, RotationManager, RotationTarget};
pub use writer::Logger;
