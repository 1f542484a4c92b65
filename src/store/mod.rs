//! The store and its dispatch engine.
//!
//! A [`Store`] owns the current state, the reducer registry, the `@changed`
//! listeners and a history policy. Every state change goes through
//! [`Store::dispatch`]; reverting goes through `undo`/`redo` or `rollback`
//! depending on the policy the store was built with.

mod config;
mod spawner;
mod store;

pub use config::{StoreBuilder, StoreConfig};
pub use spawner::Spawner;
pub use store::{create, create_with_rollback, Store, WeakStore};
