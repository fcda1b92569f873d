//! Tests for the access token lifecycle against a revocation store.

use chrono::{DateTime, Duration, Utc};
use jwt_sessions::{
    destroy_access_token, find_access_token, AccessRecord, AccessToken, InMemoryRevocationStore,
    JwtCodec, MockRevocationStore, SessionError, SigningAlgorithm, TokenError,
};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{json, Map, Value};

fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("payload must be an object"),
    }
}

fn expiration() -> DateTime<Utc> {
    Utc::now() + Duration::hours(1)
}

fn codec() -> JwtCodec {
    JwtCodec::new(SigningAlgorithm::Hs256, SecretString::new("integration-secret".to_string()))
}

fn assert_unauthorized(result: Result<impl std::fmt::Debug, SessionError>) {
    match result {
        Err(SessionError::Token(TokenError::Unauthorized { .. })) => {}
        other => panic!("expected Unauthorized, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_then_find_returns_csrf_without_payload() {
    let store = InMemoryRevocationStore::new();
    let original = payload(json!({ "user_id": 42, "roles": ["admin"] }));

    let created = AccessToken::create("csrf-value", original.clone(), &store, "web", expiration())
        .await
        .unwrap();
    let found = find_access_token(created.uid(), &store, "web").await.unwrap();

    assert_eq!(found.csrf(), "csrf-value");
    assert!(found.payload().is_empty());
    assert_ne!(found.payload(), &original);
    assert_eq!(found.claims().uid, created.uid());
}

#[tokio::test]
async fn test_find_in_other_namespace_is_unauthorized() {
    let store = InMemoryRevocationStore::new();

    let created = AccessToken::create("csrf", Map::new(), &store, "tenant-a", expiration())
        .await
        .unwrap();

    assert_unauthorized(find_access_token(created.uid(), &store, "tenant-b").await);
    assert!(find_access_token(created.uid(), &store, "tenant-a").await.is_ok());
}

#[tokio::test]
async fn test_same_uid_in_two_namespaces_is_independent() {
    let store = MockRevocationStore::new();
    let exp = expiration();

    store
        .add_record("shared", "a", AccessRecord::new("csrf-a", exp))
        .add_record("shared", "b", AccessRecord::new("csrf-b", exp));

    destroy_access_token("shared", &store, "a").await.unwrap();

    assert_unauthorized(find_access_token("shared", &store, "a").await);
    let survivor = find_access_token("shared", &store, "b").await.unwrap();
    assert_eq!(survivor.csrf(), "csrf-b");
}

#[tokio::test]
async fn test_destroy_twice_does_not_fail() {
    let store = InMemoryRevocationStore::new();

    let created = AccessToken::create("csrf", Map::new(), &store, "web", expiration())
        .await
        .unwrap();
    let uid = created.uid().to_string();

    assert!(destroy_access_token(&uid, &store, "web").await.unwrap());
    assert!(!destroy_access_token(&uid, &store, "web").await.unwrap());
}

#[tokio::test]
async fn test_find_after_destroy_is_unauthorized() {
    let store = InMemoryRevocationStore::new();

    let created = AccessToken::create("csrf", Map::new(), &store, "web", expiration())
        .await
        .unwrap();
    created.destroy().await.unwrap();

    assert_unauthorized(find_access_token(created.uid(), &store, "web").await);
}

#[tokio::test]
async fn test_found_token_can_be_destroyed() {
    let store = InMemoryRevocationStore::new();

    let created = AccessToken::create("csrf", Map::new(), &store, "web", expiration())
        .await
        .unwrap();
    let found = find_access_token(created.uid(), &store, "web").await.unwrap();

    assert!(found.destroy().await.unwrap());
    assert_unauthorized(find_access_token(created.uid(), &store, "web").await);
}

#[tokio::test]
async fn test_payload_gains_only_uid_and_exp() {
    let store = InMemoryRevocationStore::new();
    let exp = expiration();
    let original = payload(json!({
        "user_id": 7,
        "email": "user@example.com",
        "nested": { "a": [1, 2, 3] }
    }));

    let created = AccessToken::create("csrf", original.clone(), &store, "web", exp)
        .await
        .unwrap();

    let mut expected = original;
    expected.insert("uid".to_string(), json!(created.uid()));
    expected.insert("exp".to_string(), json!(exp.timestamp()));

    assert_eq!(created.claims().to_map(), expected);
}

#[tokio::test]
async fn test_refresh_link_is_signed_but_not_stored() {
    let store = MockRevocationStore::new();
    let codec = codec();
    let exp = expiration();

    let mut created = AccessToken::create(
        "csrf",
        payload(json!({ "user_id": 1 })),
        &store,
        "web",
        exp,
    )
    .await
    .unwrap();
    created.set_refresh_uid("refresh-uid-1");

    let jwt = created.token(&codec).unwrap();
    let claims = codec.decode(&jwt).unwrap();

    assert_eq!(claims.refresh_uid(), Some("refresh-uid-1"));
    assert_eq!(claims.uid, created.uid());
    assert_eq!(claims.exp, exp.timestamp());
    assert_eq!(claims.get("user_id"), Some(&json!(1)));

    let record = store.get_record(created.uid(), "web").unwrap();
    assert_eq!(record.csrf, "csrf");
    assert_eq!(record.expiration, exp);

    let persisted = store.get_persist_history();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].csrf, "csrf");
}

#[tokio::test]
async fn test_token_from_found_entity_carries_no_original_claims() {
    let store = InMemoryRevocationStore::new();
    let codec = codec();

    let created = AccessToken::create(
        "csrf",
        payload(json!({ "user_id": 1, "ruid": "refresh" })),
        &store,
        "web",
        expiration(),
    )
    .await
    .unwrap();
    let found = find_access_token(created.uid(), &store, "web").await.unwrap();

    let claims = codec.decode(&found.token(&codec).unwrap()).unwrap();
    assert!(claims.extra.is_empty());
    assert_eq!(claims.ruid, None);
}

#[tokio::test]
async fn test_non_string_caller_ruid_survives_signing() {
    let store = InMemoryRevocationStore::new();
    let codec = codec();

    for ruid in [json!(5), Value::Null] {
        let created = AccessToken::create(
            "csrf",
            payload(json!({ "user_id": 1, "ruid": ruid.clone() })),
            &store,
            "web",
            expiration(),
        )
        .await
        .unwrap();

        let mut expected = payload(json!({ "user_id": 1, "ruid": ruid.clone() }));
        expected.insert("uid".to_string(), json!(created.uid()));
        expected.insert("exp".to_string(), json!(created.expiration().timestamp()));
        assert_eq!(created.claims().to_map(), expected);

        let claims = codec.decode(&created.token(&codec).unwrap()).unwrap();
        assert_eq!(claims.ruid, Some(ruid));
        assert_eq!(claims.refresh_uid(), None);
    }
}

#[tokio::test]
async fn test_expired_record_is_not_found() {
    let store = InMemoryRevocationStore::new();

    let created = AccessToken::create(
        "csrf",
        Map::new(),
        &store,
        "web",
        Utc::now() - Duration::seconds(1),
    )
    .await
    .unwrap();

    assert_unauthorized(find_access_token(created.uid(), &store, "web").await);
    assert_eq!(store.clear_expired().unwrap(), 1);
}
