//! Envelope Decoder - raw feed bytes to ordered envelopes.
//!
//! The decoder only checks the outer layout: a JSON array of objects, each
//! with a non-empty `type` string and a `payload` object. Payloads stay as raw
//! JSON objects until the resolver picks their shape. Unknown top-level
//! envelope fields are ignored, and metadata (`id`, `created_at`, `actor`,
//! `org`, `repo`) never fails a feed: a value of the wrong shape reads as
//! absent.

use gravity_model::serde_util::lenient;
use gravity_model::{Actor, OrganizationLite, RepositoryLite};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// A feed record whose payload has not been resolved yet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawEnvelope {
    #[serde(default, deserialize_with = "envelope_id")]
    pub id: String,

    #[serde(rename = "type")]
    pub discriminator: String,

    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub created_at: Option<String>,

    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub actor: Option<Actor>,

    #[serde(rename = "org", default, deserialize_with = "lenient::deserialize")]
    pub organization: Option<OrganizationLite>,

    #[serde(rename = "repo", default, deserialize_with = "lenient::deserialize")]
    pub repository: Option<RepositoryLite>,

    pub payload: Map<String, Value>,
}

/// Parse a raw feed document into envelopes, preserving source order.
///
/// # Errors
///
/// `CoreError::MalformedFeed` when the bytes are not JSON, the document is not
/// an array, or any element fails the envelope layout. No partial result is
/// returned.
pub fn decode_envelopes(bytes: &[u8]) -> Result<Vec<RawEnvelope>> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|e| CoreError::malformed(None, format!("invalid JSON: {e}")))?;

    let items = match document {
        Value::Array(items) => items,
        other => {
            return Err(CoreError::malformed(
                None,
                format!("top-level document is {}, expected an array", type_name(&other)),
            ))
        }
    };

    let mut envelopes = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        check_layout(index, &item)?;
        let envelope = serde_json::from_value::<RawEnvelope>(item)
            .map_err(|e| CoreError::malformed(Some(index), e.to_string()))?;
        envelopes.push(envelope);
    }

    tracing::debug!(count = envelopes.len(), "decoded feed envelopes");
    Ok(envelopes)
}

/// Ids are strings on the wire; a numeric id is kept by its text, anything
/// else reads as empty.
fn envelope_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn check_layout(index: usize, item: &Value) -> Result<()> {
    let Some(object) = item.as_object() else {
        return Err(CoreError::malformed(
            Some(index),
            format!("element is {}, expected an object", type_name(item)),
        ));
    };

    match object.get("type") {
        None => return Err(CoreError::malformed(Some(index), "missing `type` field")),
        Some(Value::String(s)) if s.is_empty() => {
            return Err(CoreError::malformed(Some(index), "`type` must not be empty"))
        }
        Some(Value::String(_)) => {}
        Some(other) => {
            return Err(CoreError::malformed(
                Some(index),
                format!("`type` is {}, expected a string", type_name(other)),
            ))
        }
    }

    match object.get("payload") {
        Some(Value::Object(_)) => Ok(()),
        None => Err(CoreError::malformed(Some(index), "missing `payload` field")),
        Some(other) => Err(CoreError::malformed(
            Some(index),
            format!("`payload` is {}, expected an object", type_name(other)),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_malformed(bytes: &[u8], expected_index: Option<usize>, needle: &str) {
        match decode_envelopes(bytes) {
            Err(CoreError::MalformedFeed { index, reason }) => {
                assert_eq!(index, expected_index, "reason: {reason}");
                assert!(reason.contains(needle), "reason {reason:?} lacks {needle:?}");
            }
            other => panic!("Expected MalformedFeed, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_array() {
        assert!(decode_envelopes(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_preserves_order_and_metadata() {
        let bytes = br#"[
            {"id": "1", "type": "WatchEvent", "created_at": "2022-05-01T12:30:00Z",
             "actor": {"id": 10, "login": "alice"},
             "repo": {"id": 99, "name": "pingcap/tidb", "url": "https://api.github.com/repos/pingcap/tidb"},
             "payload": {"action": "started"}, "public": true},
            {"id": "2", "type": "StarEvent", "org": {"id": 5, "login": "pingcap"}, "payload": {}}
        ]"#;
        let envelopes = decode_envelopes(bytes).unwrap();
        assert_eq!(envelopes.len(), 2);
        assert_eq!(envelopes[0].id, "1");
        assert_eq!(envelopes[0].discriminator, "WatchEvent");
        assert_eq!(envelopes[0].actor.as_ref().unwrap().login, "alice");
        assert_eq!(envelopes[0].repository.as_ref().unwrap().name, "pingcap/tidb");
        assert_eq!(envelopes[1].id, "2");
        assert_eq!(envelopes[1].organization.as_ref().unwrap().login, "pingcap");
        assert!(envelopes[1].payload.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert_malformed(b"[{", None, "invalid JSON");
    }

    #[test]
    fn test_top_level_not_array() {
        assert_malformed(br#"{"type": "WatchEvent"}"#, None, "an object");
    }

    #[test]
    fn test_element_not_object() {
        assert_malformed(br#"[{"type": "WatchEvent", "payload": {}}, 3]"#, Some(1), "a number");
    }

    #[test]
    fn test_missing_type() {
        assert_malformed(br#"[{"id": "1", "payload": {}}]"#, Some(0), "missing `type`");
    }

    #[test]
    fn test_empty_type() {
        assert_malformed(br#"[{"type": "", "payload": {}}]"#, Some(0), "must not be empty");
    }

    #[test]
    fn test_non_string_type() {
        assert_malformed(br#"[{"type": 4, "payload": {}}]"#, Some(0), "a number");
    }

    #[test]
    fn test_payload_must_be_object() {
        assert_malformed(br#"[{"type": "WatchEvent"}]"#, Some(0), "missing `payload`");
        assert_malformed(
            br#"[{"type": "WatchEvent", "payload": null}]"#,
            Some(0),
            "`payload` is null",
        );
    }

    #[test]
    fn test_bad_metadata_is_tolerated() {
        let bytes = br#"[
            {"id": 22849101001, "type": "WatchEvent", "created_at": 1651408200,
             "actor": {"id": "x", "login": "a"}, "org": "pingcap", "repo": [],
             "payload": {"action": "started"}},
            {"id": null, "type": "WatchEvent", "actor": null, "payload": {}}
        ]"#;
        let envelopes = decode_envelopes(bytes).unwrap();
        assert_eq!(envelopes.len(), 2);

        let first = &envelopes[0];
        assert_eq!(first.id, "22849101001");
        assert_eq!(first.discriminator, "WatchEvent");
        assert!(first.created_at.is_none());
        assert!(first.actor.is_none());
        assert!(first.organization.is_none());
        assert!(first.repository.is_none());
        assert_eq!(first.payload["action"], "started");

        assert_eq!(envelopes[1].id, "");
        assert!(envelopes[1].actor.is_none());
    }

    #[test]
    fn test_missing_id_defaults_empty() {
        let envelopes = decode_envelopes(br#"[{"type": "WatchEvent", "payload": {}}]"#).unwrap();
        assert_eq!(envelopes[0].id, "");
    }
}
