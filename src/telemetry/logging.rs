//! Logging
//!
//! Structured logging for session lifecycle operations. CSRF values and token
//! claims never belong in a log context.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Session log context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLogContext {
    /// Operation name.
    pub operation: Option<String>,
    /// Token namespace.
    pub namespace: Option<String>,
    /// Access token identifier.
    pub uid: Option<String>,
    /// Additional context.
    pub extra: BTreeMap<String, String>,
}

impl SessionLogContext {
    /// Create new log context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set operation.
    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Set namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set token uid.
    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Add extra context.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    fn render_extra(&self) -> String {
        self.extra
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Logger interface.
pub trait Logger: Send + Sync {
    /// Record a message at `level`.
    fn log(&self, level: LogLevel, message: &str, context: &SessionLogContext);

    /// Check if a log level is enabled.
    fn is_enabled(&self, level: LogLevel) -> bool;

    fn trace(&self, message: &str, context: &SessionLogContext) {
        self.log(LogLevel::Trace, message, context);
    }

    fn debug(&self, message: &str, context: &SessionLogContext) {
        self.log(LogLevel::Debug, message, context);
    }

    fn info(&self, message: &str, context: &SessionLogContext) {
        self.log(LogLevel::Info, message, context);
    }

    fn error(&self, message: &str, context: &SessionLogContext) {
        self.log(LogLevel::Error, message, context);
    }
}

/// Logger that forwards to the `tracing` ecosystem.
///
/// Level filtering is left to the installed subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl TracingLogger {
    /// Create new tracing logger.
    pub fn new() -> Self {
        Self
    }
}

macro_rules! emit {
    ($macro:ident, $message:expr, $context:expr) => {
        tracing::$macro!(
            operation = $context.operation.as_deref().unwrap_or(""),
            namespace = $context.namespace.as_deref().unwrap_or(""),
            uid = $context.uid.as_deref().unwrap_or(""),
            extra = %$context.render_extra(),
            "{}",
            $message
        )
    };
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str, context: &SessionLogContext) {
        match level {
            LogLevel::Trace => emit!(trace, message, context),
            LogLevel::Debug => emit!(debug, message, context),
            LogLevel::Info => emit!(info, message, context),
            LogLevel::Warn => emit!(warn, message, context),
            LogLevel::Error => emit!(error, message, context),
        }
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Trace => tracing::enabled!(tracing::Level::TRACE),
            LogLevel::Debug => tracing::enabled!(tracing::Level::DEBUG),
            LogLevel::Info => tracing::enabled!(tracing::Level::INFO),
            LogLevel::Warn => tracing::enabled!(tracing::Level::WARN),
            LogLevel::Error => tracing::enabled!(tracing::Level::ERROR),
        }
    }
}

/// Log entry for in-memory storage.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub context: SessionLogContext,
    pub timestamp: DateTime<Utc>,
}

/// In-memory logger for testing.
pub struct InMemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
    min_level: LogLevel,
}

impl InMemoryLogger {
    /// Create new in-memory logger.
    pub fn new() -> Self {
        Self::with_level(LogLevel::Trace)
    }

    /// Create in-memory logger with minimum level.
    pub fn with_level(min_level: LogLevel) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            min_level,
        }
    }

    /// Get all log entries.
    pub fn get_entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get entries by level.
    pub fn get_entries_by_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.get_entries()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for InMemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for InMemoryLogger {
    fn log(&self, level: LogLevel, message: &str, context: &SessionLogContext) {
        if !self.is_enabled(level) {
            return;
        }

        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogEntry {
                level,
                message: message.to_string(),
                context: context.clone(),
                timestamp: Utc::now(),
            });
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

/// Create in-memory logger for testing.
pub fn create_in_memory_logger() -> InMemoryLogger {
    InMemoryLogger::new()
}

/// Create tracing logger.
pub fn create_tracing_logger() -> TracingLogger {
    TracingLogger::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error > LogLevel::Warn);
        assert!(LogLevel::Warn > LogLevel::Info);
        assert!(LogLevel::Info > LogLevel::Debug);
        assert!(LogLevel::Debug > LogLevel::Trace);
    }

    #[test]
    fn test_in_memory_logger() {
        let logger = InMemoryLogger::new();
        let context = SessionLogContext::new()
            .operation("create_access")
            .namespace("web");

        logger.info("Access token created", &context);
        logger.debug("Debug info", &context);
        logger.error("Error occurred", &context);

        assert_eq!(logger.get_entries().len(), 3);
        assert_eq!(logger.get_entries_by_level(LogLevel::Error).len(), 1);

        logger.clear();
        assert!(logger.get_entries().is_empty());
    }

    #[test]
    fn test_log_context_builder() {
        let context = SessionLogContext::new()
            .operation("find_access")
            .namespace("api")
            .uid("uid-1")
            .extra("found", "true");

        assert_eq!(context.operation.as_deref(), Some("find_access"));
        assert_eq!(context.uid.as_deref(), Some("uid-1"));
        assert_eq!(context.render_extra(), "found=true");
    }

    #[test]
    fn test_min_level_filtering() {
        let logger = InMemoryLogger::with_level(LogLevel::Warn);
        let context = SessionLogContext::new();

        logger.trace("trace", &context);
        logger.debug("debug", &context);
        logger.info("info", &context);
        logger.log(LogLevel::Warn, "warn", &context);
        logger.error("error", &context);

        assert_eq!(logger.get_entries().len(), 2);
    }

    #[test]
    fn test_tracing_logger_without_subscriber() {
        let logger = TracingLogger::new();
        let context = SessionLogContext::new().operation("destroy_access");

        logger.info("no subscriber installed", &context);
        logger.log(LogLevel::Error, "still a no-op", &context);
    }
}
