use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// The state held by a store: an insertion-ordered JSON object.
pub type State = Map<String, Value>;

/// Optional data passed through to reducers and listeners unmodified.
pub type Payload = Map<String, Value>;

/// Produce a structurally independent copy of `state`.
pub fn snapshot(state: &State) -> State {
    state.clone()
}

/// Compare two states by key count and per-key value equality.
///
/// Only the first level is inspected for membership; values under a key are
/// compared as whole values.
pub fn shallow_equal(a: &State, b: &State) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| other == value))
}

/// Accept a JSON value as state, rejecting anything but an object.
pub fn from_value(value: Value) -> Result<State, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::NotAnObject {
            found: kind(&other),
        }),
    }
}

/// Serialize a typed value into state.
pub fn to_state<T: Serialize + ?Sized>(value: &T) -> Result<State, StoreError> {
    from_value(serde_json::to_value(value)?)
}

/// Deserialize state into a typed value.
pub fn from_state<T: DeserializeOwned>(state: State) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(state))?)
}

/// Read one key of a state or payload as a typed value.
///
/// Returns `Ok(None)` when the key is absent.
pub fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Result<Option<T>, StoreError> {
    map.get(key)
        .map(|value| T::deserialize(value))
        .transpose()
        .map_err(StoreError::from)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
