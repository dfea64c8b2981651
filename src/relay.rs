//! Relay text lines into the logger
//!
//! Used by the `daylog` binary to log whatever is piped into it. A line like
//! `WARN db: connection slow` keeps its level and component; anything else is
//! logged at info under the `stdin` component.

use std::io::BufRead;

use crate::logging::{LogLevel, Logger};

/// Component used for lines without one
pub const DEFAULT_COMPONENT: &str = "stdin";

/// A line broken into the parts of a log call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub level: LogLevel,
    pub component: String,
    pub message: String,
}

/// Parse one input line. Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (level, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => match word.parse::<LogLevel>() {
            Ok(level) => (level, rest.trim_start()),
            Err(_) => (LogLevel::Info, line),
        },
        None => (LogLevel::Info, line),
    };

    // "component: message" where the component is a single word
    let (component, message) = match rest.split_once(": ") {
        Some((component, message)) if !component.is_empty() && !component.contains(' ') => {
            (component.to_string(), message.to_string())
        }
        _ => (DEFAULT_COMPONENT.to_string(), rest.to_string()),
    };

    Some(ParsedLine {
        level,
        component,
        message,
    })
}

/// Log every line from `reader` until end of input
///
/// Bytes that are not valid UTF-8 are replaced rather than ending the relay. A
/// fatal line ends the process once it has been logged. Returns the number of
/// entries logged.
pub fn relay<R: BufRead>(mut reader: R, logger: &Logger) -> std::io::Result<usize> {
    let mut count = 0;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let Some(parsed) = parse_line(&line) else {
            continue;
        };

        if parsed.level == LogLevel::Fatal {
            logger.fatal(&parsed.component, &parsed.message);
        }
        logger.emit(parsed.level, &parsed.component, &parsed.message);
        count += 1;
    }
    Ok(count)
}
