//! # Rebound
//!
//! An event-driven state store with reducers, change notification and
//! history.
//!
//! Callers never mutate state directly. They dispatch named events, each
//! routed to the reducers registered for it, and observers bound to
//! `@changed` hear about the result only when the state actually changed.
//!
//! ## Building blocks
//!
//! - [`Store`] - owns the state, the reducers, the listeners and the history
//! - [`Reducer`] / [`Reduction`] - turn the current state and a payload into
//!   the next state, optionally deferring asynchronous work
//! - [`UndoRedo`] / [`RollbackLog`] - the two history policies
//! - [`snapshot`] - copies, top-level equality and typed conversions
//!
//! ## Example
//!
//! ```
//! use rebound::{create, snapshot};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), rebound::StoreError> {
//! let store = create(snapshot::from_value(json!({ "key": "value" }))?);
//!
//! store.on("change", |mut state, payload| {
//!     let value = payload.and_then(|p| p.get("value")).cloned().unwrap_or_default();
//!     state.insert("key".to_string(), value);
//!     Ok(state)
//! })?;
//!
//! store.dispatch("change", Some(snapshot::from_value(json!({ "value": "new" }))?))?;
//! assert_eq!(store.get()["key"], json!("new"));
//!
//! store.undo()?;
//! assert_eq!(store.get()["key"], json!("value"));
//! # Ok(())
//! # }
//! ```

mod error;
pub mod history;
pub mod notify;
pub mod registry;
pub mod snapshot;
pub mod store;

// Re-export main types for convenience
pub use error::StoreError;
pub use history::{History, RollbackLog, UndoRedo};
pub use notify::{Listener, CHANGED, REDO, ROLLBACK, UNDO};
pub use registry::{Reducer, Reduction, Subscription};
pub use snapshot::{Payload, State};
pub use store::{create, create_with_rollback, Spawner, Store, StoreBuilder, StoreConfig, WeakStore};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_works() {
        // Basic smoke test
        let store = create(snapshot::from_value(json!({ "count": 0 })).unwrap());
        store
            .on("inc", |mut state, _| {
                state.insert("count".to_string(), json!(1));
                Ok(state)
            })
            .unwrap();
        store.dispatch("inc", None).unwrap();
        assert_eq!(store.get()["count"], json!(1));
    }
}
