//! Telemetry
//!
//! Observability components for session operations.

pub mod logging;

pub use logging::{
    create_in_memory_logger, create_tracing_logger, InMemoryLogger, LogEntry, LogLevel, Logger,
    SessionLogContext, TracingLogger,
};
