//! Access Token Claims
//!
//! Typed payload signed into an access token.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim key holding the token identifier.
pub const UID_CLAIM: &str = "uid";
/// Claim key holding the expiration in epoch seconds.
pub const EXP_CLAIM: &str = "exp";
/// Claim key linking a refresh token.
pub const RUID_CLAIM: &str = "ruid";

/// Access token payload.
///
/// `uid`, `exp` and `ruid` are owned by the token lifecycle; everything the
/// caller supplies lives in `extra` and is flattened next to them when the
/// payload is serialized. `ruid` keeps whatever JSON value it was given, so a
/// caller payload survives merging unaltered.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Access token identifier.
    pub uid: String,
    /// Expiration (seconds since the Unix epoch).
    pub exp: i64,
    /// Linked refresh token identifier. `Some(Value::Null)` is an explicit null.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub ruid: Option<Value>,
    /// Caller-supplied claims.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// A present key always yields `Some`, even when its value is `null`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl AccessClaims {
    /// Merge caller claims with the lifecycle-owned `uid` and `exp`.
    ///
    /// Caller values for `uid` and `exp` are overwritten. A caller `ruid` is
    /// kept verbatim.
    pub fn merge(mut payload: Map<String, Value>, uid: impl Into<String>, exp: i64) -> Self {
        payload.remove(UID_CLAIM);
        payload.remove(EXP_CLAIM);
        let ruid = payload.remove(RUID_CLAIM);

        Self {
            uid: uid.into(),
            exp,
            ruid,
            extra: payload,
        }
    }

    /// Linked refresh token identifier, when it is a string.
    pub fn refresh_uid(&self) -> Option<&str> {
        self.ruid.as_ref().and_then(Value::as_str)
    }

    /// Link a refresh token.
    pub fn set_refresh_uid(&mut self, ruid: impl Into<String>) {
        self.ruid = Some(Value::String(ruid.into()));
    }

    /// Get a caller-supplied claim.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Render the full payload as a JSON object.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = self.extra.clone();
        map.insert(UID_CLAIM.to_string(), Value::String(self.uid.clone()));
        map.insert(EXP_CLAIM.to_string(), Value::from(self.exp));
        if let Some(ruid) = &self.ruid {
            map.insert(RUID_CLAIM.to_string(), ruid.clone());
        }
        map
    }
}
