//! Serde helpers for GitHub's timestamp formats and loosely typed metadata.

/// Optional timestamps that accept either an RFC 3339 string or a Unix epoch
/// integer. Webhook repository objects still carry the legacy integer form for
/// `created_at` / `pushed_at`. Values are always written back as RFC 3339.
pub mod gh_time {
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => {
                let secs = n
                    .as_i64()
                    .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {n}")))?;
                DateTime::from_timestamp(secs, 0)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {secs}")))
            }
            Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
                .map(|t| Some(t.with_timezone(&Utc)))
                .map_err(D::Error::custom),
            Some(other) => Err(D::Error::custom(format!(
                "expected RFC 3339 string or epoch seconds, got {other}"
            ))),
        }
    }
}

/// Optional metadata read on a best-effort basis: a value whose shape does not
/// fit `T` becomes `None` instead of failing the surrounding record.
pub mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|v| T::deserialize(v).ok()))
    }
}
