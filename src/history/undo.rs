use std::collections::VecDeque;

use super::History;
use crate::snapshot::State;

/// Past and future stacks for undo and redo.
///
/// Recording a new entry clears the future stack, so history stays linear.
#[derive(Debug, Default, Clone)]
pub struct UndoRedo {
    past: VecDeque<State>,
    future: Vec<State>,
    limit: Option<usize>,
}

impl UndoRedo {
    /// Step back: `current` goes onto the future stack and the newest past
    /// state is returned. `None` when there is nothing to undo.
    pub fn undo(&mut self, current: State) -> Option<State> {
        let previous = self.past.pop_back()?;
        self.future.push(current);
        Some(previous)
    }

    /// Step forward: `current` goes back onto the past stack and the newest
    /// future state is returned. `None` when there is nothing to redo.
    pub fn redo(&mut self, current: State) -> Option<State> {
        let next = self.future.pop()?;
        self.push_past(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of states `redo` can step through.
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    fn push_past(&mut self, snapshot: State) {
        if self.limit == Some(0) {
            return;
        }
        self.past.push_back(snapshot);
        if let Some(limit) = self.limit {
            while self.past.len() > limit {
                self.past.pop_front();
                tracing::warn!(limit, "undo history full, oldest entry evicted");
            }
        }
    }
}

impl History for UndoRedo {
    fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    fn record(&mut self, _event: &str, snapshot: State) {
        self.future.clear();
        self.push_past(snapshot);
    }

    fn len(&self) -> usize {
        self.past.len()
    }

    fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}
