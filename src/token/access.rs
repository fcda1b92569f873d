//! Access Token
//!
//! Short-lived signed credential backed by a minimal revocation record.
//!
//! Creating a token persists only `(uid, csrf, expiration)` under its
//! namespace. Looking a token up answers whether it is still live and returns
//! its CSRF value, but never the claims it was issued with: entities rebuilt
//! by [`find_access_token`] carry an empty payload.
//!
//! Refresh linkage is a two-phase step. Create the token, optionally call
//! [`AccessToken::set_refresh_uid`], then serialize with
//! [`AccessToken::token`]. The entity holds no internal synchronization.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::core::{IdGenerator, TokenCodec, UuidGenerator};
use crate::error::SessionError;
use crate::token::storage::RevocationStore;
use crate::types::AccessClaims;

/// How an [`AccessToken`] came to exist in memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenOrigin {
    /// Issued by [`AccessToken::create`]; carries the full payload.
    Created,
    /// Rebuilt from a revocation record; payload is empty.
    Found,
}

/// Access token entity.
///
/// Holds a non-owning reference to the revocation store it was created in or
/// found through.
pub struct AccessToken<'s, S: RevocationStore + ?Sized> {
    uid: String,
    csrf: String,
    expiration: DateTime<Utc>,
    claims: AccessClaims,
    namespace: String,
    origin: TokenOrigin,
    store: &'s S,
}

impl<'s, S: RevocationStore + ?Sized> AccessToken<'s, S> {
    fn build(
        csrf: String,
        payload: Map<String, Value>,
        store: &'s S,
        namespace: &str,
        uid: String,
        expiration: DateTime<Utc>,
        origin: TokenOrigin,
    ) -> Self {
        let claims = AccessClaims::merge(payload, uid.clone(), expiration.timestamp());

        Self {
            uid,
            csrf,
            expiration,
            claims,
            namespace: namespace.to_string(),
            origin,
            store,
        }
    }

    /// Create a token with a fresh UUID and persist its revocation record.
    pub async fn create(
        csrf: impl Into<String>,
        payload: Map<String, Value>,
        store: &'s S,
        namespace: &str,
        expiration: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        Self::create_with_ids(&UuidGenerator, csrf, payload, store, namespace, expiration).await
    }

    /// Create a token whose uid comes from `ids`.
    pub async fn create_with_ids(
        ids: &dyn IdGenerator,
        csrf: impl Into<String>,
        payload: Map<String, Value>,
        store: &'s S,
        namespace: &str,
        expiration: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let token = Self::build(
            csrf.into(),
            payload,
            store,
            namespace,
            ids.generate(),
            expiration,
            TokenOrigin::Created,
        );

        store
            .persist_access(&token.uid, &token.csrf, token.expiration, &token.namespace)
            .await?;

        Ok(token)
    }

    /// Delete this token's revocation record.
    pub async fn destroy(&self) -> Result<bool, SessionError> {
        destroy_access_token(&self.uid, self.store, &self.namespace).await
    }

    /// Serialize and sign the in-memory payload.
    pub fn token(&self, codec: &dyn TokenCodec) -> Result<String, SessionError> {
        codec.encode(&self.claims)
    }

    /// Linked refresh token identifier.
    pub fn refresh_uid(&self) -> Option<&str> {
        self.claims.refresh_uid()
    }

    /// Link a refresh token. Only affects tokens serialized afterwards.
    pub fn set_refresh_uid(&mut self, ruid: impl Into<String>) {
        self.claims.set_refresh_uid(ruid);
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn csrf(&self) -> &str {
        &self.csrf
    }

    pub fn expiration(&self) -> DateTime<Utc> {
        self.expiration
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn origin(&self) -> TokenOrigin {
        self.origin
    }

    pub fn store(&self) -> &'s S {
        self.store
    }

    /// Full payload, including `uid`, `exp` and `ruid`.
    pub fn claims(&self) -> &AccessClaims {
        &self.claims
    }

    /// Caller-supplied claims only.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.claims.extra
    }

    /// Whether this entity was rebuilt from a revocation record.
    pub fn is_payload_blind(&self) -> bool {
        self.origin == TokenOrigin::Found
    }
}

impl<S: RevocationStore + ?Sized> std::fmt::Debug for AccessToken<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("uid", &self.uid)
            .field("csrf", &"[REDACTED]")
            .field("expiration", &self.expiration)
            .field("namespace", &self.namespace)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Look up a live access token.
///
/// Fails with `Unauthorized` when the store holds no record. The returned
/// entity exposes the CSRF value but never the original payload.
pub async fn find_access_token<'s, S: RevocationStore + ?Sized>(
    uid: &str,
    store: &'s S,
    namespace: &str,
) -> Result<AccessToken<'s, S>, SessionError> {
    let record = store
        .fetch_access(uid, namespace)
        .await?
        .ok_or_else(|| SessionError::unauthorized("Access token not found"))?;

    Ok(AccessToken::build(
        record.csrf,
        Map::new(),
        store,
        namespace,
        uid.to_string(),
        record.expiration,
        TokenOrigin::Found,
    ))
}

/// Delete the revocation record for `(uid, namespace)`.
///
/// Returns `Ok(false)` when there was nothing to delete.
pub async fn destroy_access_token<S: RevocationStore + ?Sized>(
    uid: &str,
    store: &S,
    namespace: &str,
) -> Result<bool, SessionError> {
    store.destroy_access(uid, namespace).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MockIdGenerator, MockTokenCodec};
    use crate::error::{StorageError, TokenError};
    use crate::token::storage::{InMemoryRevocationStore, MockRevocationStore};
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    fn expiration() -> DateTime<Utc> {
        Utc::now() + Duration::minutes(30)
    }

    #[tokio::test]
    async fn test_create_persists_minimal_record() {
        let store = MockRevocationStore::new();
        let ids = MockIdGenerator::new();
        ids.set_next_id("uid-123");
        let exp = expiration();

        let token = AccessToken::create_with_ids(
            &ids,
            "csrf-abc",
            payload(json!({ "user_id": 1, "role": "admin" })),
            &store,
            "web",
            exp,
        )
        .await
        .unwrap();

        assert_eq!(token.uid(), "uid-123");
        assert_eq!(token.origin(), TokenOrigin::Created);
        assert!(!token.is_payload_blind());

        let persisted = store.get_persist_history();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].uid, "uid-123");
        assert_eq!(persisted[0].csrf, "csrf-abc");
        assert_eq!(persisted[0].expiration, exp);
        assert_eq!(persisted[0].namespace, "web");
    }

    #[tokio::test]
    async fn test_create_shapes_payload() {
        let store = InMemoryRevocationStore::new();
        let exp = expiration();

        let token = AccessToken::create(
            "csrf",
            payload(json!({ "user_id": 1, "uid": "caller", "exp": 0 })),
            &store,
            "web",
            exp,
        )
        .await
        .unwrap();

        let expected = payload(json!({
            "user_id": 1,
            "uid": token.uid(),
            "exp": exp.timestamp(),
        }));
        assert_eq!(token.claims().to_map(), expected);
        assert_eq!(token.payload(), &payload(json!({ "user_id": 1 })));
        assert_ne!(token.uid(), "caller");
    }

    #[tokio::test]
    async fn test_create_propagates_store_failure() {
        let store = MockRevocationStore::new();
        store.set_next_error(SessionError::Storage(StorageError::WriteFailed {
            message: "disk full".to_string(),
        }));

        let result = AccessToken::create("csrf", Map::new(), &store, "web", expiration()).await;
        assert!(matches!(
            result,
            Err(SessionError::Storage(StorageError::WriteFailed { .. }))
        ));
        assert!(store.get_persist_history().is_empty());
    }

    #[tokio::test]
    async fn test_find_is_payload_blind() {
        let store = InMemoryRevocationStore::new();
        let exp = expiration();
        let created = AccessToken::create(
            "csrf-1",
            payload(json!({ "email": "user@example.com" })),
            &store,
            "web",
            exp,
        )
        .await
        .unwrap();

        let found = find_access_token(created.uid(), &store, "web").await.unwrap();

        assert_eq!(found.uid(), created.uid());
        assert_eq!(found.csrf(), "csrf-1");
        assert_eq!(found.expiration().timestamp(), exp.timestamp());
        assert!(found.payload().is_empty());
        assert_eq!(found.refresh_uid(), None);
        assert!(found.is_payload_blind());
    }

    #[tokio::test]
    async fn test_find_missing_is_unauthorized() {
        let store = InMemoryRevocationStore::new();

        let err = find_access_token("missing", &store, "web").await.unwrap_err();
        match err {
            SessionError::Token(TokenError::Unauthorized { message }) => {
                assert_eq!(message, "Access token not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_find_propagates_store_failure() {
        let store = MockRevocationStore::new();
        store.set_should_fail(true);

        let err = find_access_token("uid", &store, "web").await.unwrap_err();
        assert!(!err.is_unauthorized());
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_instance_destroy_forwards_fields() {
        let store = MockRevocationStore::new();
        let token = AccessToken::create("csrf", Map::new(), &store, "api", expiration())
            .await
            .unwrap();

        assert!(token.destroy().await.unwrap());
        assert!(!token.destroy().await.unwrap());

        assert_eq!(
            store.get_destroy_history(),
            vec![
                (token.uid().to_string(), "api".to_string()),
                (token.uid().to_string(), "api".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_refresh_uid_links_into_payload_only() {
        let store = MockRevocationStore::new();
        let codec = MockTokenCodec::new();
        let mut token = AccessToken::create("csrf", Map::new(), &store, "web", expiration())
            .await
            .unwrap();

        assert_eq!(token.refresh_uid(), None);
        token.set_refresh_uid("refresh-9");
        assert_eq!(token.refresh_uid(), Some("refresh-9"));

        let encoded = token.token(&codec).unwrap();
        let claims = codec.decode(&encoded).unwrap();
        assert_eq!(claims.refresh_uid(), Some("refresh-9"));

        let record = store.get_record(token.uid(), "web").unwrap();
        assert_eq!(record.csrf, "csrf");
        assert_eq!(store.get_persist_history().len(), 1);
    }

    #[tokio::test]
    async fn test_token_does_not_touch_store() {
        let store = MockRevocationStore::new();
        let codec = MockTokenCodec::new();
        let token = AccessToken::create("csrf", Map::new(), &store, "web", expiration())
            .await
            .unwrap();

        token.token(&codec).unwrap();
        token.token(&codec).unwrap();

        assert!(store.get_fetch_history().is_empty());
        assert_eq!(store.get_persist_history().len(), 1);
        assert_eq!(codec.get_encode_history().len(), 2);
    }

    #[tokio::test]
    async fn test_works_with_trait_object_store() {
        let store = InMemoryRevocationStore::new();
        let dyn_store: &dyn RevocationStore = &store;

        let token = AccessToken::create("csrf", Map::new(), dyn_store, "web", expiration())
            .await
            .unwrap();
        let found = find_access_token(token.uid(), dyn_store, "web").await.unwrap();
        assert_eq!(found.csrf(), "csrf");
    }

    #[test]
    fn test_debug_redacts_csrf() {
        let store = InMemoryRevocationStore::new();
        let token = AccessToken::build(
            "secret-csrf".to_string(),
            Map::new(),
            &store,
            "web",
            "uid".to_string(),
            expiration(),
            TokenOrigin::Created,
        );

        let debug = format!("{:?}", token);
        assert!(!debug.contains("secret-csrf"));
        assert!(debug.contains("uid"));
    }
}
