//! Field-level payload decoding.
//!
//! Each known variant pulls its fields out of the raw payload object one at a
//! time. Absent and `null` fields are normalized here: an optional field maps
//! both to `None`, a required field rejects both. Fields the variant does not
//! ask for are never looked at, so upstream additions never break decoding.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Result, ShapeError};
use crate::event::{Event, EventKind};

/// Borrowed view over a raw payload object.
#[derive(Debug, Clone, Copy)]
pub struct PayloadFields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> PayloadFields<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// Decode a field that must be present and non-null.
    pub fn required<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        match self.map.get(name) {
            None | Some(Value::Null) => Err(ShapeError::missing(name)),
            Some(value) => T::deserialize(value).map_err(|e| ShapeError::invalid(name, e)),
        }
    }

    /// Decode a field that may be absent or null.
    pub fn optional<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.map.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|e| ShapeError::invalid(name, e)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }
}

/// A known payload variant that can be decoded from a raw payload object.
pub trait Variant: Sized {
    /// Shape this variant resolves to.
    const KIND: EventKind;

    fn decode(fields: &PayloadFields<'_>) -> Result<Self>;

    fn into_event(self) -> Event;
}

/// Decode `V` from a raw payload object and lift it into [`Event`].
pub fn decode_variant<V: Variant>(payload: &Map<String, Value>) -> Result<Event> {
    V::decode(&PayloadFields::new(payload)).map(V::into_event)
}
