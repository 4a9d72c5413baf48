// Logging utilities
// Author: Gabriel Demetrios Lafis

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Metadata, Record};

use super::AppError;

/// Initialize logging with the given level, optionally mirroring to a file
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<(), AppError> {
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
        None => None,
    };

    log::set_boxed_logger(Box::new(SimpleLogger {
        level,
        file: file.map(Mutex::new),
    }))?;
    log::set_max_level(level);
    Ok(())
}

/// Simple logger writing to stdout and an optional file
struct SimpleLogger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_str = match record.level() {
            Level::Error => "\x1B[31mERROR\x1B[0m",
            Level::Warn => "\x1B[33mWARN\x1B[0m",
            Level::Info => "\x1B[32mINFO\x1B[0m",
            Level::Debug => "\x1B[34mDEBUG\x1B[0m",
            Level::Trace => "\x1B[90mTRACE\x1B[0m",
        };
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

        println!("[{}] {} {}: {}", timestamp, level_str, record.target(), record.args());

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                // the file gets the plain level name
                let _ = writeln!(
                    file,
                    "[{}] {} {}: {}",
                    timestamp,
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Named log sink handed to each dataset handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    target: String,
}

impl Logger {
    pub fn new<S: Into<String>>(target: S) -> Self {
        Logger {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn error(&self, args: fmt::Arguments) {
        log::error!(target: &self.target, "{}", args);
    }

    pub fn warn(&self, args: fmt::Arguments) {
        log::warn!(target: &self.target, "{}", args);
    }

    pub fn info(&self, args: fmt::Arguments) {
        log::info!(target: &self.target, "{}", args);
    }

    pub fn debug(&self, args: fmt::Arguments) {
        log::debug!(target: &self.target, "{}", args);
    }

    /// Log a failed operation together with its error chain
    pub fn exception(&self, operation: &str, err: &dyn std::error::Error) {
        let mut message = format!("{} failed: {}", operation, err);
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(&format!(": {}", cause));
            source = cause.source();
        }
        log::error!(target: &self.target, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_keeps_target() {
        let logger = Logger::new("deaths");
        assert_eq!(logger.target(), "deaths");
        // no global logger installed, so these are no-ops
        logger.info(format_args!("loaded {} rows", 3));
        logger.exception("query", &std::io::Error::new(std::io::ErrorKind::Other, "boom"));
    }
}
