//! The log writer
//!
//! [`Logger`] turns each call into a [`LogEntry`], appends it to the session
//! buffer, writes it as a JSON line through the [`RotationManager`], and echoes a
//! readable line to the console. All of that happens under one lock so an entry is
//! never split across a date rollover.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::clock::{Clock, SystemClock};
use super::entry::{LogEntry, LogLevel, LogSession};
use super::rotation::RotationManager;
use crate::config::Config;
use crate::error::{fatal_diagnostic, Result};

struct LoggerState {
    rotation: RotationManager,
    session: LogSession,
    console: Box<dyn Write + Send>,
}

/// Process-local structured logger
pub struct Logger {
    state: Mutex<LoggerState>,
    clock: Arc<dyn Clock>,
}

impl Logger {
    /// Create a logger writing through `rotation`, echoing to stdout
    pub fn new(rotation: RotationManager, session: LogSession, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(LoggerState {
                rotation,
                session,
                console: Box::new(io::stdout()),
            }),
            clock,
        }
    }

    /// Build a logger from application configuration using the system clock
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::from_config_with_clock(config, Arc::new(SystemClock))
    }

    /// Build a logger from application configuration with a custom clock
    pub fn from_config_with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let rotation = RotationManager::initialize(
            config.log_dir(),
            config.logging.retention_days,
            config.logging.rotation_policy(),
            Arc::clone(&clock),
        )?;
        let session = LogSession::new(
            config.app.display_name.clone(),
            config.server.host.clone(),
            config.server.port,
        );
        Ok(Self::new(rotation, session, clock))
    }

    /// Send the human-readable echo somewhere other than stdout
    pub fn with_console(self, console: Box<dyn Write + Send>) -> Self {
        let mut state = self.state.into_inner().unwrap_or_else(PoisonError::into_inner);
        state.console = console;
        Self {
            state: Mutex::new(state),
            clock: self.clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoggerState> {
        // Entries are applied whole, so state behind a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record an entry, returning any failure to the caller
    pub fn try_emit(&self, level: LogLevel, component: &str, message: &str) -> Result<()> {
        let mut guard = self.lock();
        let state = &mut *guard;

        let now = self.clock.now();
        let (target, rolled) = state.rotation.current_target(now);
        if rolled {
            let _ = writeln!(state.console, "{}", target.path().display());
            state.session.reset();
        }

        let entry = LogEntry::new(now.fixed_offset(), level, component, message);
        let line = entry.to_json_line()?;
        state.rotation.write(&line)?;

        // Only entries that reached the file belong to the session
        let console_line = entry.console_line();
        state.session.push(entry);

        // The console is informational; its failures don't stop logging
        let _ = writeln!(state.console, "{}", console_line);
        let _ = state.console.flush();

        Ok(())
    }

    /// Record an entry, aborting the process if it cannot be written
    pub fn emit(&self, level: LogLevel, component: &str, message: &str) {
        if let Err(e) = self.try_emit(level, component, message) {
            eprintln!("{}", fatal_diagnostic(&e));
            std::process::exit(1);
        }
    }

    pub fn debug(&self, component: &str, message: &str) {
        self.emit(LogLevel::Debug, component, message);
    }

    pub fn info(&self, component: &str, message: &str) {
        self.emit(LogLevel::Info, component, message);
    }

    pub fn warn(&self, component: &str, message: &str) {
        self.emit(LogLevel::Warn, component, message);
    }

    /// Same as [`Logger::warn`]
    pub fn warning(&self, component: &str, message: &str) {
        self.warn(component, message);
    }

    pub fn error(&self, component: &str, message: &str) {
        self.emit(LogLevel::Error, component, message);
    }

    /// Record a fatal entry and exit with status 1
    pub fn fatal(&self, component: &str, message: &str) -> ! {
        self.emit(LogLevel::Fatal, component, message);
        std::process::exit(1);
    }

    /// Copy of the entries logged since the last date rollover
    pub fn session(&self) -> LogSession {
        self.lock().session.clone()
    }

    /// Number of entries logged since the last date rollover
    pub fn session_len(&self) -> usize {
        self.lock().session.len()
    }

    /// Path of the file currently being written
    pub fn current_path(&self) -> PathBuf {
        self.lock().rotation.target().path().to_path_buf()
    }

    /// Rolled backups of the current day's file, newest first
    pub fn current_backups(&self) -> Result<Vec<PathBuf>> {
        self.lock().rotation.target().backups()
    }
}
