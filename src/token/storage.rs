//! Revocation Storage
//!
//! Stores the minimal `(csrf, expiration)` record that keeps an access token
//! revocable. The store never sees token claims.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{SessionError, StorageError};
use crate::types::AccessRecord;

/// Revocation store interface.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Persist the revocation record for an access token.
    async fn persist_access(
        &self,
        uid: &str,
        csrf: &str,
        expiration: DateTime<Utc>,
        namespace: &str,
    ) -> Result<(), SessionError>;

    /// Fetch the revocation record for an access token.
    async fn fetch_access(
        &self,
        uid: &str,
        namespace: &str,
    ) -> Result<Option<AccessRecord>, SessionError>;

    /// Delete the revocation record. Returns whether a record was removed.
    async fn destroy_access(&self, uid: &str, namespace: &str) -> Result<bool, SessionError>;
}

type RecordKey = (String, String);

fn record_key(uid: &str, namespace: &str) -> RecordKey {
    (namespace.to_string(), uid.to_string())
}

/// In-memory revocation store implementation.
///
/// Records past their expiration are treated as absent and can be swept with
/// [`InMemoryRevocationStore::clear_expired`].
#[derive(Default)]
pub struct InMemoryRevocationStore {
    records: Mutex<HashMap<RecordKey, AccessRecord>>,
}

impl InMemoryRevocationStore {
    /// Create new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<RecordKey, AccessRecord>>, SessionError> {
        self.records
            .lock()
            .map_err(|_| SessionError::Storage(StorageError::Poisoned))
    }

    /// Remove every expired record. Returns the number removed.
    pub fn clear_expired(&self) -> Result<usize, SessionError> {
        let mut records = self.records()?;
        let now = Utc::now();
        let initial_count = records.len();

        records.retain(|_, record| !record.is_expired_at(now));

        Ok(initial_count - records.len())
    }

    /// Number of records held, expired or not.
    pub fn len(&self) -> Result<usize, SessionError> {
        Ok(self.records()?.len())
    }

    /// Check if the store holds no records.
    pub fn is_empty(&self) -> Result<bool, SessionError> {
        Ok(self.records()?.is_empty())
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn persist_access(
        &self,
        uid: &str,
        csrf: &str,
        expiration: DateTime<Utc>,
        namespace: &str,
    ) -> Result<(), SessionError> {
        self.records()?
            .insert(record_key(uid, namespace), AccessRecord::new(csrf, expiration));
        Ok(())
    }

    async fn fetch_access(
        &self,
        uid: &str,
        namespace: &str,
    ) -> Result<Option<AccessRecord>, SessionError> {
        let records = self.records()?;
        Ok(records
            .get(&record_key(uid, namespace))
            .filter(|record| !record.is_expired())
            .cloned())
    }

    async fn destroy_access(&self, uid: &str, namespace: &str) -> Result<bool, SessionError> {
        Ok(self.records()?.remove(&record_key(uid, namespace)).is_some())
    }
}

/// A persist call observed by [`MockRevocationStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistCall {
    pub uid: String,
    pub csrf: String,
    pub expiration: DateTime<Utc>,
    pub namespace: String,
}

/// Mock revocation store for testing.
#[derive(Default)]
pub struct MockRevocationStore {
    records: Mutex<HashMap<RecordKey, AccessRecord>>,
    persist_history: Mutex<Vec<PersistCall>>,
    fetch_history: Mutex<Vec<(String, String)>>,
    destroy_history: Mutex<Vec<(String, String)>>,
    next_error: Mutex<Option<SessionError>>,
    should_fail: Mutex<bool>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockRevocationStore {
    /// Create new mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set next error to return.
    pub fn set_next_error(&self, error: SessionError) -> &Self {
        *lock(&self.next_error) = Some(error);
        self
    }

    /// Set store to fail all operations.
    pub fn set_should_fail(&self, should_fail: bool) -> &Self {
        *lock(&self.should_fail) = should_fail;
        self
    }

    /// Pre-populate a record.
    pub fn add_record(&self, uid: &str, namespace: &str, record: AccessRecord) -> &Self {
        lock(&self.records).insert(record_key(uid, namespace), record);
        self
    }

    /// Get a stored record without touching the fetch history.
    pub fn get_record(&self, uid: &str, namespace: &str) -> Option<AccessRecord> {
        lock(&self.records).get(&record_key(uid, namespace)).cloned()
    }

    /// Get persist history.
    pub fn get_persist_history(&self) -> Vec<PersistCall> {
        lock(&self.persist_history).clone()
    }

    /// Get fetch history as `(uid, namespace)` pairs.
    pub fn get_fetch_history(&self) -> Vec<(String, String)> {
        lock(&self.fetch_history).clone()
    }

    /// Get destroy history as `(uid, namespace)` pairs.
    pub fn get_destroy_history(&self) -> Vec<(String, String)> {
        lock(&self.destroy_history).clone()
    }

    fn check_error(&self) -> Result<(), SessionError> {
        if *lock(&self.should_fail) {
            return Err(SessionError::Storage(StorageError::Unavailable {
                message: "Mock storage failure".to_string(),
            }));
        }

        if let Some(error) = lock(&self.next_error).take() {
            return Err(error);
        }

        Ok(())
    }
}

#[async_trait]
impl RevocationStore for MockRevocationStore {
    async fn persist_access(
        &self,
        uid: &str,
        csrf: &str,
        expiration: DateTime<Utc>,
        namespace: &str,
    ) -> Result<(), SessionError> {
        self.check_error()?;

        lock(&self.persist_history).push(PersistCall {
            uid: uid.to_string(),
            csrf: csrf.to_string(),
            expiration,
            namespace: namespace.to_string(),
        });
        lock(&self.records).insert(record_key(uid, namespace), AccessRecord::new(csrf, expiration));
        Ok(())
    }

    async fn fetch_access(
        &self,
        uid: &str,
        namespace: &str,
    ) -> Result<Option<AccessRecord>, SessionError> {
        self.check_error()?;

        lock(&self.fetch_history).push((uid.to_string(), namespace.to_string()));
        Ok(lock(&self.records).get(&record_key(uid, namespace)).cloned())
    }

    async fn destroy_access(&self, uid: &str, namespace: &str) -> Result<bool, SessionError> {
        self.check_error()?;

        lock(&self.destroy_history).push((uid.to_string(), namespace.to_string()));
        Ok(lock(&self.records).remove(&record_key(uid, namespace)).is_some())
    }
}

/// Create in-memory revocation store.
pub fn create_in_memory_revocation_store() -> InMemoryRevocationStore {
    InMemoryRevocationStore::new()
}

/// Create mock revocation store for testing.
pub fn create_mock_revocation_store() -> MockRevocationStore {
    MockRevocationStore::new()
}
