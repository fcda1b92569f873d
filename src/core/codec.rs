//! Token Codec
//!
//! Serialization and signing of access token payloads.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::{CodecError, SessionError};
use crate::types::{AccessClaims, SessionsConfig, SigningAlgorithm};

/// Token codec interface.
pub trait TokenCodec: Send + Sync {
    /// Serialize and sign a payload into a token string.
    fn encode(&self, claims: &AccessClaims) -> Result<String, SessionError>;
}

/// HMAC-signed JWT codec.
pub struct JwtCodec {
    algorithm: SigningAlgorithm,
    signing_key: SecretString,
    leeway_secs: u64,
}

impl JwtCodec {
    /// Create new JWT codec.
    pub fn new(algorithm: SigningAlgorithm, signing_key: SecretString) -> Self {
        Self {
            algorithm,
            signing_key,
            leeway_secs: 0,
        }
    }

    /// Create a codec from session configuration.
    pub fn from_config(config: &SessionsConfig) -> Self {
        Self {
            algorithm: config.algorithm,
            signing_key: config.signing_key.clone(),
            leeway_secs: config.leeway_secs,
        }
    }

    /// Set decode leeway in seconds.
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    /// Get signing algorithm.
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Verify a token's signature and expiration and return its claims.
    pub fn decode(&self, token: &str) -> Result<AccessClaims, SessionError> {
        let key = DecodingKey::from_secret(self.signing_key.expose_secret().as_bytes());

        let mut validation = Validation::new(self.algorithm.into());
        validation.leeway = self.leeway_secs;
        // `aud` is an ordinary caller claim here.
        validation.validate_aud = false;

        let data = jsonwebtoken::decode::<AccessClaims>(token, &key, &validation)
            .map_err(CodecError::from)?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec")
            .field("algorithm", &self.algorithm)
            .field("signing_key", &"[REDACTED]")
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

impl TokenCodec for JwtCodec {
    fn encode(&self, claims: &AccessClaims) -> Result<String, SessionError> {
        let key = EncodingKey::from_secret(self.signing_key.expose_secret().as_bytes());
        let header = Header::new(self.algorithm.into());

        jsonwebtoken::encode(&header, claims, &key).map_err(|e| {
            SessionError::Codec(CodecError::EncodingFailed {
                message: e.to_string(),
            })
        })
    }
}

/// Mock token codec for testing.
#[derive(Default)]
pub struct MockTokenCodec {
    issued: Mutex<HashMap<String, AccessClaims>>,
    encode_history: Mutex<Vec<AccessClaims>>,
    should_fail: Mutex<bool>,
}

impl MockTokenCodec {
    /// Create new mock codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set codec to fail all encodes.
    pub fn set_should_fail(&self, should_fail: bool) -> &Self {
        *self.should_fail.lock().unwrap_or_else(PoisonError::into_inner) = should_fail;
        self
    }

    /// Get every payload encoded so far.
    pub fn get_encode_history(&self) -> Vec<AccessClaims> {
        self.encode_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Look up the payload behind a token this codec issued.
    pub fn decode(&self, token: &str) -> Result<AccessClaims, SessionError> {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or_else(|| {
                SessionError::Codec(CodecError::DecodingFailed {
                    message: format!("unknown mock token '{}'", token),
                })
            })
    }
}

impl TokenCodec for MockTokenCodec {
    fn encode(&self, claims: &AccessClaims) -> Result<String, SessionError> {
        if *self.should_fail.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(SessionError::Codec(CodecError::EncodingFailed {
                message: "Mock codec failure".to_string(),
            }));
        }

        let mut history = self
            .encode_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        history.push(claims.clone());

        let token = format!("mock-token-{}", history.len());
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), claims.clone());
        Ok(token)
    }
}
