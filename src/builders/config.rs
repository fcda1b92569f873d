//! Configuration Builder
//!
//! Fluent builder for session configuration.

use chrono::Utc;
use std::time::Duration;

use crate::error::{ConfigurationError, SessionError};
use crate::types::{SessionsConfig, SigningAlgorithm, DEFAULT_ACCESS_EXPIRATION};
use secrecy::SecretString;

/// Session configuration builder.
#[derive(Default)]
pub struct SessionsConfigBuilder {
    access_expiration: Option<Duration>,
    algorithm: Option<SigningAlgorithm>,
    signing_key: Option<SecretString>,
    leeway_secs: u64,
}

impl SessionsConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder pre-populated from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_SESSIONS_SIGNING_KEY` (required): HMAC signing key
    /// - `JWT_SESSIONS_ACCESS_EXPIRATION` (optional): access token lifetime in seconds
    /// - `JWT_SESSIONS_ALGORITHM` (optional): `HS256`, `HS384` or `HS512`
    /// - `JWT_SESSIONS_LEEWAY` (optional): decode leeway in seconds
    pub fn from_env() -> Result<Self, SessionError> {
        let signing_key = std::env::var("JWT_SESSIONS_SIGNING_KEY").map_err(|_| {
            ConfigurationError::MissingRequired {
                field: "JWT_SESSIONS_SIGNING_KEY".to_string(),
            }
        })?;

        let mut builder = Self::new().signing_key(signing_key);

        if let Ok(expiration) = std::env::var("JWT_SESSIONS_ACCESS_EXPIRATION") {
            let secs = parse_secs("JWT_SESSIONS_ACCESS_EXPIRATION", &expiration)?;
            builder = builder.access_expiration(Duration::from_secs(secs));
        }

        if let Ok(algorithm) = std::env::var("JWT_SESSIONS_ALGORITHM") {
            builder = builder.algorithm(algorithm.parse()?);
        }

        if let Ok(leeway) = std::env::var("JWT_SESSIONS_LEEWAY") {
            builder = builder.leeway_secs(parse_secs("JWT_SESSIONS_LEEWAY", &leeway)?);
        }

        Ok(builder)
    }

    /// Set the default access token lifetime.
    pub fn access_expiration(mut self, expiration: Duration) -> Self {
        self.access_expiration = Some(expiration);
        self
    }

    /// Set signing algorithm.
    pub fn algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Set signing key.
    pub fn signing_key(mut self, key: impl Into<String>) -> Self {
        self.signing_key = Some(SecretString::new(key.into()));
        self
    }

    /// Set decode leeway in seconds.
    pub fn leeway_secs(mut self, leeway: u64) -> Self {
        self.leeway_secs = leeway;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<SessionsConfig, SessionError> {
        use secrecy::ExposeSecret;

        let signing_key = self.signing_key.ok_or_else(|| ConfigurationError::MissingRequired {
            field: "signing_key".to_string(),
        })?;

        if signing_key.expose_secret().is_empty() {
            return Err(ConfigurationError::InvalidValue {
                field: "signing_key".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }

        let access_expiration = self.access_expiration.unwrap_or(DEFAULT_ACCESS_EXPIRATION);
        if access_expiration.is_zero() {
            return Err(ConfigurationError::InvalidValue {
                field: "access_expiration".to_string(),
                message: "must be greater than zero".to_string(),
            }
            .into());
        }

        // Must be representable as an offset from the current time.
        let in_range = chrono::Duration::from_std(access_expiration)
            .ok()
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .is_some();
        if !in_range {
            return Err(ConfigurationError::InvalidValue {
                field: "access_expiration".to_string(),
                message: format!("{}s is out of range", access_expiration.as_secs()),
            }
            .into());
        }

        Ok(SessionsConfig {
            access_expiration,
            algorithm: self.algorithm.unwrap_or_default(),
            signing_key,
            leeway_secs: self.leeway_secs,
        })
    }
}

fn parse_secs(field: &str, value: &str) -> Result<u64, ConfigurationError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigurationError::InvalidValue {
            field: field.to_string(),
            message: e.to_string(),
        })
}

/// Create a new configuration builder.
pub fn sessions_config() -> SessionsConfigBuilder {
    SessionsConfigBuilder::new()
}
