// Console Logger
//
// Logger that writes to stderr.

use super::logger::{LogLevel, Logger};

/// Console logger. Every line is tagged with the level and an optional prefix
/// naming the component that owns the logger.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    level: LogLevel,
    prefix: Option<String>,
}

impl ConsoleLogger {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn format(&self, level: LogLevel, msg: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("[{}] {}: {}", level, prefix, msg),
            None => format!("[{}] {}", level, msg),
        }
    }
}

impl Logger for ConsoleLogger {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn log(&self, level: LogLevel, msg: &str) {
        eprintln!("{}", self.format(level, msg));
    }
}
