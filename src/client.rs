//! Session Client
//!
//! High-level client that wires configuration, revocation store, token codec
//! and identifier sources around the access token lifecycle.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::core::{CsrfGenerator, IdGenerator, JwtCodec, TokenCodec, UuidGenerator};
use crate::error::SessionError;
use crate::telemetry::{Logger, SessionLogContext, TracingLogger};
use crate::token::{
    destroy_access_token, find_access_token, AccessToken, InMemoryRevocationStore,
    RevocationStore,
};
use crate::types::SessionsConfig;

/// Session client for issuing, looking up and revoking access tokens.
pub struct SessionClient<S: RevocationStore = InMemoryRevocationStore, C: TokenCodec = JwtCodec> {
    config: SessionsConfig,
    store: Arc<S>,
    codec: Arc<C>,
    uid_generator: Arc<dyn IdGenerator>,
    csrf_generator: Arc<dyn IdGenerator>,
    logger: Arc<dyn Logger>,
}

impl SessionClient<InMemoryRevocationStore, JwtCodec> {
    /// Create a client with an in-memory store and a JWT codec built from `config`.
    pub fn new(config: SessionsConfig) -> Self {
        let codec = JwtCodec::from_config(&config);
        Self::with_components(config, InMemoryRevocationStore::new(), codec)
    }
}

impl<S: RevocationStore, C: TokenCodec> SessionClient<S, C> {
    /// Create a client with custom store and codec.
    pub fn with_components(config: SessionsConfig, store: S, codec: C) -> Self {
        Self::with_shared_components(config, Arc::new(store), Arc::new(codec))
    }

    /// Create a client around a store and codec shared with other owners.
    pub fn with_shared_components(config: SessionsConfig, store: Arc<S>, codec: Arc<C>) -> Self {
        Self {
            config,
            store,
            codec,
            uid_generator: Arc::new(UuidGenerator::new()),
            csrf_generator: Arc::new(CsrfGenerator::new()),
            logger: Arc::new(TracingLogger::new()),
        }
    }

    /// Replace the uid and CSRF sources.
    pub fn with_id_generators(
        mut self,
        uid_generator: Arc<dyn IdGenerator>,
        csrf_generator: Arc<dyn IdGenerator>,
    ) -> Self {
        self.uid_generator = uid_generator;
        self.csrf_generator = csrf_generator;
        self
    }

    /// Replace the logger.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Create an access token expiring after the configured default lifetime.
    pub async fn create_access(
        &self,
        payload: Map<String, Value>,
        namespace: &str,
    ) -> Result<AccessToken<'_, S>, SessionError> {
        let expiration = self.config.default_access_expiration()?;
        self.create_access_until(payload, namespace, expiration).await
    }

    /// Create an access token with an explicit expiration.
    pub async fn create_access_until(
        &self,
        payload: Map<String, Value>,
        namespace: &str,
        expiration: DateTime<Utc>,
    ) -> Result<AccessToken<'_, S>, SessionError> {
        let csrf = self.csrf_generator.generate();
        let context = SessionLogContext::new()
            .operation("create_access")
            .namespace(namespace);

        match AccessToken::create_with_ids(
            self.uid_generator.as_ref(),
            csrf,
            payload,
            self.store.as_ref(),
            namespace,
            expiration,
        )
        .await
        {
            Ok(token) => {
                self.logger.debug(
                    "Access token created",
                    &context
                        .uid(token.uid())
                        .extra("exp", expiration.timestamp().to_string()),
                );
                Ok(token)
            }
            Err(e) => {
                self.logger.error(
                    "Failed to persist access token",
                    &context.extra("error_code", e.error_code()),
                );
                Err(e)
            }
        }
    }

    /// Confirm a token is still live and recover its CSRF value.
    pub async fn find_access(
        &self,
        uid: &str,
        namespace: &str,
    ) -> Result<AccessToken<'_, S>, SessionError> {
        let context = SessionLogContext::new()
            .operation("find_access")
            .namespace(namespace)
            .uid(uid);

        let result = find_access_token(uid, self.store.as_ref(), namespace).await;
        match &result {
            Ok(_) => self.logger.trace("Access token found", &context),
            Err(e) if e.is_unauthorized() => self.logger.info("Access token not found", &context),
            Err(e) => self.logger.error(
                "Access token lookup failed",
                &context.extra("error_code", e.error_code()),
            ),
        }
        result
    }

    /// Revoke a token. Returns whether a record was removed.
    pub async fn destroy_access(&self, uid: &str, namespace: &str) -> Result<bool, SessionError> {
        let context = SessionLogContext::new()
            .operation("destroy_access")
            .namespace(namespace)
            .uid(uid);

        match destroy_access_token(uid, self.store.as_ref(), namespace).await {
            Ok(removed) => {
                self.logger.debug(
                    "Access token destroyed",
                    &context.extra("removed", removed.to_string()),
                );
                Ok(removed)
            }
            Err(e) => {
                self.logger.error(
                    "Access token revocation failed",
                    &context.extra("error_code", e.error_code()),
                );
                Err(e)
            }
        }
    }

    /// Serialize a token with this client's codec.
    pub fn encode(&self, token: &AccessToken<'_, S>) -> Result<String, SessionError> {
        token.token(self.codec.as_ref())
    }

    /// Get configuration.
    pub fn config(&self) -> &SessionsConfig {
        &self.config
    }

    /// Get revocation store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get token codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }
}

/// Create a session client with default components.
pub fn session_client(config: SessionsConfig) -> SessionClient {
    SessionClient::new(config)
}
