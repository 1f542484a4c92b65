//! History of prior states.
//!
//! Two policies are available and chosen by type parameter on the store:
//! [`UndoRedo`] keeps past and future stacks with branch invalidation, and
//! [`RollbackLog`] keeps an event-tagged log consumed from the newest end.
//! Both can be bounded, in which case the oldest entry is evicted first.

mod rollback;
mod undo;

pub use rollback::RollbackLog;
pub use undo::UndoRedo;

use crate::snapshot::State;

/// A record of prior states, written once per dispatch that reached at least
/// one reducer.
pub trait History: Default {
    /// Create an empty history holding at most `limit` entries.
    fn with_limit(limit: Option<usize>) -> Self;

    /// Record the state captured before `event` was applied.
    fn record(&mut self, event: &str, snapshot: State);

    /// Number of entries that can currently be reverted to.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    fn clear(&mut self);
}
