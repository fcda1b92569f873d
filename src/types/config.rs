//! Configuration Types
//!
//! Session configuration and signing algorithm selection.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::builders::SessionsConfigBuilder;
use crate::error::{ConfigurationError, SessionError};

/// Default access token lifetime (1 hour).
pub const DEFAULT_ACCESS_EXPIRATION: Duration = Duration::from_secs(3600);

/// Session configuration.
#[derive(Clone)]
pub struct SessionsConfig {
    /// Lifetime applied when the caller does not supply an expiration.
    pub access_expiration: Duration,
    /// Algorithm used to sign access tokens.
    pub algorithm: SigningAlgorithm,
    /// HMAC signing key.
    pub signing_key: SecretString,
    /// Leeway applied to `exp` when decoding.
    pub leeway_secs: u64,
}

impl SessionsConfig {
    /// Create a new configuration builder.
    pub fn builder() -> SessionsConfigBuilder {
        SessionsConfigBuilder::new()
    }

    /// Resolve the default access expiration relative to `now`.
    ///
    /// Fails when the configured lifetime does not fit in a timestamp.
    pub fn access_expiration_from(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, SessionError> {
        chrono::Duration::from_std(self.access_expiration)
            .ok()
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                ConfigurationError::InvalidValue {
                    field: "access_expiration".to_string(),
                    message: format!(
                        "{}s is out of range for an expiration timestamp",
                        self.access_expiration.as_secs()
                    ),
                }
                .into()
            })
    }

    /// Resolve the default access expiration relative to the current time.
    pub fn default_access_expiration(&self) -> Result<DateTime<Utc>, SessionError> {
        self.access_expiration_from(Utc::now())
    }
}

impl std::fmt::Debug for SessionsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionsConfig")
            .field("access_expiration", &self.access_expiration)
            .field("algorithm", &self.algorithm)
            .field("signing_key", &"[REDACTED]")
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

/// HMAC signing algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningAlgorithm {
    #[default]
    #[serde(rename = "HS256")]
    Hs256,
    #[serde(rename = "HS384")]
    Hs384,
    #[serde(rename = "HS512")]
    Hs512,
}

impl SigningAlgorithm {
    /// Get algorithm name as it appears in the token header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
        }
    }
}

impl From<SigningAlgorithm> for jsonwebtoken::Algorithm {
    fn from(algorithm: SigningAlgorithm) -> Self {
        match algorithm {
            SigningAlgorithm::Hs256 => jsonwebtoken::Algorithm::HS256,
            SigningAlgorithm::Hs384 => jsonwebtoken::Algorithm::HS384,
            SigningAlgorithm::Hs512 => jsonwebtoken::Algorithm::HS512,
        }
    }
}

impl FromStr for SigningAlgorithm {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HS256" => Ok(Self::Hs256),
            "HS384" => Ok(Self::Hs384),
            "HS512" => Ok(Self::Hs512),
            other => Err(ConfigurationError::InvalidValue {
                field: "algorithm".to_string(),
                message: format!("unsupported signing algorithm '{}'", other),
            }),
        }
    }
}

impl std::fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
