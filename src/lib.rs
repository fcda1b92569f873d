//! JWT Sessions
//!
//! Short-lived access tokens that carry a signed payload and stay revocable
//! through a minimal server-side record.
//!
//! # Features
//!
//! - Access token creation with a fresh uid, CSRF binding and expiration
//! - Payload-blind lookup: confirms a token is live and returns its CSRF value
//! - Revocation by uid and namespace
//! - Refresh token linkage through the `ruid` claim
//! - Pluggable revocation store, token codec and identifier sources
//!
//! # Example
//!
//! ```rust,ignore
//! use jwt_sessions::{sessions_config, SessionClient};
//! use serde_json::{json, Map};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = sessions_config()
//!         .signing_key("my-signing-key")
//!         .access_expiration(std::time::Duration::from_secs(900))
//!         .build()?;
//!
//!     let client = SessionClient::new(config);
//!
//!     let mut payload = Map::new();
//!     payload.insert("user_id".to_string(), json!(42));
//!
//!     let mut access = client.create_access(payload, "web").await?;
//!     access.set_refresh_uid("refresh-token-uid");
//!     let jwt = client.encode(&access)?;
//!
//!     // Later: the uid from the verified JWT confirms liveness and yields the CSRF value.
//!     let live = client.find_access(access.uid(), "web").await?;
//!     assert_eq!(live.csrf(), access.csrf());
//!
//!     client.destroy_access(access.uid(), "web").await?;
//!     println!("issued {}", jwt);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: claims, revocation records and configuration
//! - `error`: error hierarchy
//! - `core`: token codec and identifier sources
//! - `token`: access token entity and revocation storage
//! - `builders`: fluent configuration builder
//! - `telemetry`: structured logging
//! - `client`: high-level client combining all of the above

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod telemetry;
pub mod token;
pub mod types;

// Re-export main client
pub use client::{session_client, SessionClient};

// Re-export builders
pub use builders::{sessions_config, SessionsConfigBuilder};

// Re-export errors
pub use error::{
    CodecError, ConfigurationError, SessionError, SessionResult, StorageError, TokenError,
};

// Re-export types
pub use types::{
    AccessClaims, AccessRecord, SessionsConfig, SigningAlgorithm, DEFAULT_ACCESS_EXPIRATION,
    EXP_CLAIM, RUID_CLAIM, UID_CLAIM,
};

// Re-export core components
pub use crate::core::{
    CsrfGenerator, IdGenerator, JwtCodec, MockIdGenerator, MockTokenCodec, TokenCodec,
    UuidGenerator,
};

// Re-export token management
pub use token::{
    create_in_memory_revocation_store, create_mock_revocation_store, destroy_access_token,
    find_access_token, AccessToken, InMemoryRevocationStore, MockRevocationStore, PersistCall,
    RevocationStore, TokenOrigin,
};

// Re-export telemetry
pub use telemetry::{
    create_in_memory_logger, create_tracing_logger, InMemoryLogger, LogEntry, LogLevel, Logger,
    SessionLogContext, TracingLogger,
};
