//! Session Types
//!
//! Data structures shared by the token lifecycle and its collaborators.

pub mod claims;
pub mod config;
pub mod record;

pub use claims::{AccessClaims, EXP_CLAIM, RUID_CLAIM, UID_CLAIM};
pub use config::{SessionsConfig, SigningAlgorithm, DEFAULT_ACCESS_EXPIRATION};
pub use record::AccessRecord;
