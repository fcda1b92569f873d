//! Session Error Types
//!
//! Error hierarchy for the access token lifecycle and its collaborators.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type SessionResult<T> = Result<T, SessionError>;

/// Root error type for session management.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

impl SessionError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "SESSION_CONFIG",
            Self::Token(TokenError::Unauthorized { .. }) => "SESSION_UNAUTHORIZED",
            Self::Storage(_) => "SESSION_STORAGE",
            Self::Codec(_) => "SESSION_CODEC",
        }
    }

    /// Check if the error means the caller is not (or no longer) authenticated.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Token(TokenError::Unauthorized { .. }) | Self::Codec(CodecError::Expired)
        )
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Shorthand for the lookup failure raised when no revocation record exists.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Token(TokenError::Unauthorized {
            message: message.into(),
        })
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Token lifecycle error.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },
}

/// Revocation store error.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Read failed: {message}")]
    ReadFailed { message: String },

    #[error("Write failed: {message}")]
    WriteFailed { message: String },

    #[error("Delete failed: {message}")]
    DeleteFailed { message: String },

    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Store lock poisoned")]
    Poisoned,
}

impl StorageError {
    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Token codec error.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Encoding failed: {message}")]
    EncodingFailed { message: String },

    #[error("Decoding failed: {message}")]
    DecodingFailed { message: String },

    #[error("Token expired")]
    Expired,

    #[error("Invalid signing key: {message}")]
    InvalidKey { message: String },
}

impl From<jsonwebtoken::errors::Error> for CodecError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidKeyFormat | ErrorKind::InvalidAlgorithm => Self::InvalidKey {
                message: err.to_string(),
            },
            _ => Self::DecodingFailed {
                message: err.to_string(),
            },
        }
    }
}
