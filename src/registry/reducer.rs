use std::fmt;
use std::future::Future;

use futures::future::{FutureExt, LocalBoxFuture};

use crate::snapshot::{Payload, State};

/// The result of running one reducer.
///
/// Holds the state that replaces the current one and, optionally, deferred
/// work the store hands to its spawner without waiting for it.
pub struct Reduction {
    state: State,
    deferred: Option<LocalBoxFuture<'static, ()>>,
}

impl Reduction {
    /// A reduction that only replaces the state.
    pub fn new(state: State) -> Self {
        Self {
            state,
            deferred: None,
        }
    }

    /// A reduction that replaces the state now and schedules `task` to run
    /// later on the store's spawner.
    ///
    /// Anything the task does after it resumes, including calling
    /// `dispatch`, happens as a new top-level cycle.
    pub fn deferred<F>(state: State, task: F) -> Self
    where
        F: Future<Output = ()> + 'static,
    {
        Self {
            state,
            deferred: Some(task.boxed_local()),
        }
    }

    /// The state this reduction produces.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Whether this reduction carries deferred work.
    pub fn is_deferred(&self) -> bool {
        self.deferred.is_some()
    }

    pub(crate) fn into_parts(self) -> (State, Option<LocalBoxFuture<'static, ()>>) {
        (self.state, self.deferred)
    }
}

impl From<State> for Reduction {
    fn from(state: State) -> Self {
        Self::new(state)
    }
}

impl fmt::Debug for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reduction")
            .field("state", &self.state)
            .field("deferred", &self.is_deferred())
            .finish()
    }
}

/// A mutation bound to an event name.
///
/// A reducer receives the current state by value together with the payload
/// passed to `dispatch`, and returns the state that replaces it. Returning the
/// input unchanged is how a reducer leaves the state alone.
///
/// Closures with the signature
/// `Fn(State, Option<&Payload>) -> anyhow::Result<impl Into<Reduction>>`
/// implement this trait.
pub trait Reducer {
    fn reduce(&self, state: State, payload: Option<&Payload>) -> anyhow::Result<Reduction>;
}

impl<F, R> Reducer for F
where
    F: Fn(State, Option<&Payload>) -> anyhow::Result<R>,
    R: Into<Reduction>,
{
    fn reduce(&self, state: State, payload: Option<&Payload>) -> anyhow::Result<Reduction> {
        self(state, payload).map(Into::into)
    }
}
