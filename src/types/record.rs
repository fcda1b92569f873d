//! Revocation Record
//!
//! The minimal tuple a revocation store keeps per access token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted revocation record, keyed by `(namespace, uid)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    /// CSRF value bound to the token.
    pub csrf: String,
    /// Token expiration.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expiration: DateTime<Utc>,
}

impl AccessRecord {
    /// Create a new record.
    pub fn new(csrf: impl Into<String>, expiration: DateTime<Utc>) -> Self {
        Self {
            csrf: csrf.into(),
            expiration,
        }
    }

    /// Check if the record has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration <= now
    }

    /// Check if the record has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
