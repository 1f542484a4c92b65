//! State values and the copies handed out by the store.
//!
//! State is a JSON object. Every read and every history entry is an
//! independent deep copy, and change detection compares two states at the
//! top level only.

mod snapshot;

pub use snapshot::{field, from_state, from_value, shallow_equal, snapshot, to_state, Payload, State};
