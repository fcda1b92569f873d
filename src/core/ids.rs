//! Identifier Generation
//!
//! Random sources for access token identifiers and CSRF values.

use rand::Rng;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Random identifier source (for dependency injection).
pub trait IdGenerator: Send + Sync {
    /// Produce a new unique identifier.
    fn generate(&self) -> String;
}

/// UUID v4 generator used for token identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl UuidGenerator {
    /// Create new UUID generator.
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// CSRF value generator: 32 random bytes, URL-safe base64 without padding.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsrfGenerator;

impl CsrfGenerator {
    /// Create new CSRF generator.
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for CsrfGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let bytes: [u8; 32] = rng.gen();
        base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
    }
}

/// Mock identifier generator for testing.
#[derive(Default)]
pub struct MockIdGenerator {
    queued: Mutex<VecDeque<String>>,
    history: Mutex<Vec<String>>,
    counter: AtomicU64,
}

impl MockIdGenerator {
    /// Create new mock generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next identifier to hand out.
    pub fn set_next_id(&self, id: impl Into<String>) -> &Self {
        self.queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(id.into());
        self
    }

    /// Get every identifier handed out so far.
    pub fn get_history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl IdGenerator for MockIdGenerator {
    fn generate(&self) -> String {
        let id = self
            .queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
                format!("mock-id-{}", n)
            });

        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(id.clone());
        id
    }
}
