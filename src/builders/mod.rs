//! Builders
//!
//! Fluent builders for session configuration.

pub mod config;

pub use config::{sessions_config, SessionsConfigBuilder};
