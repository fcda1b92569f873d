//! Token Management
//!
//! Access token lifecycle and the revocation store it reports to.
//!
//! This module provides:
//!
//! - **Access Token**: creation, payload-blind lookup, revocation and refresh linkage
//! - **Revocation Storage**: the store interface plus in-memory and mock implementations

pub mod access;
pub mod storage;

// Access Token
pub use access::{destroy_access_token, find_access_token, AccessToken, TokenOrigin};

// Revocation Storage
pub use storage::{
    create_in_memory_revocation_store, create_mock_revocation_store, InMemoryRevocationStore,
    MockRevocationStore, PersistCall, RevocationStore,
};
