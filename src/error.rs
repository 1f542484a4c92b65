//! Crate-level error type.

/// Error returned by store operations.
///
/// Reducer and listener failures are wrapped together with the event that
/// triggered them and handed back to the caller of `dispatch`, `undo`,
/// `redo` or `rollback`. Nothing is swallowed internally.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A typed value could not be converted to or from JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// State and payloads must be JSON objects at the top level.
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    /// Event names must be non-empty.
    #[error("event name must not be empty")]
    EmptyEventName,

    /// The name is a notification tag and cannot carry handlers.
    #[error("`{0}` is a reserved event name")]
    ReservedEvent(String),

    /// A reducer failed while handling `event`.
    #[error("reducer for `{event}` failed: {source}")]
    Reducer {
        event: String,
        #[source]
        source: anyhow::Error,
    },

    /// A `@changed` listener failed while being notified about `event`.
    #[error("change listener failed after `{event}`: {source}")]
    Listener {
        event: String,
        #[source]
        source: anyhow::Error,
    },

    /// A reducer deferred work but the store has no spawner to run it.
    #[error("reducer for `{event}` deferred work but no spawner is configured")]
    NoSpawner { event: String },

    /// The spawner refused the deferred work.
    #[error("could not schedule deferred work for `{event}`: {source}")]
    Spawn {
        event: String,
        #[source]
        source: anyhow::Error,
    },
}
