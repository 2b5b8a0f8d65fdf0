//! Console progress messages.
//!
//! Commands report what they do through a process-wide reporter that prints
//! prefixed lines to stderr. Library diagnostics go through `tracing`
//! instead.

use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;

/// Log level for console display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Indentation level (for nested logs)
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            message: message.into(),
            indent: 0,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Success,
            message: message.into(),
            indent: 0,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Warning,
            message: message.into(),
            indent: 0,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Error,
            message: message.into(),
            indent: 0,
        }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Line as printed on the console.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "  ",
            LogLevel::Success => "✅",
            LogLevel::Warning => "⚠️ ",
            LogLevel::Error => "❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// Global console reporter
pub static REPORTER: Lazy<Reporter> = Lazy::new(Reporter::new);

/// Prints log entries to stderr
pub struct Reporter {
    quiet: AtomicBool,
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            quiet: AtomicBool::new(false),
        }
    }

    /// Hide info and success lines. Warnings and errors still print.
    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet.load(Ordering::Relaxed)
    }

    /// Whether an entry is printed under the current settings.
    pub fn shows(&self, entry: &LogEntry) -> bool {
        !self.is_quiet() || matches!(entry.level, LogLevel::Warning | LogLevel::Error)
    }

    pub fn log(&self, entry: LogEntry) {
        if self.shows(&entry) {
            eprintln!("{}", entry.render());
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    REPORTER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    REPORTER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    REPORTER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    REPORTER.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    REPORTER.log(LogEntry::info(msg).with_indent(indent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prefixes() {
        assert_eq!(LogEntry::success("done").render(), "✅ done");
        assert_eq!(LogEntry::error("boom").render(), "❌ boom");
        assert_eq!(LogEntry::info("x").with_indent(1).render(), "      x");
    }

    #[test]
    fn test_quiet_keeps_warnings() {
        let reporter = Reporter::new();
        reporter.set_quiet(true);

        assert!(!reporter.shows(&LogEntry::info("hidden")));
        assert!(!reporter.shows(&LogEntry::success("hidden")));
        assert!(reporter.shows(&LogEntry::warning("shown")));
        assert!(reporter.shows(&LogEntry::error("shown")));
    }
}
