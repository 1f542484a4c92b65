use std::collections::VecDeque;

use super::History;
use crate::snapshot::State;

/// Append-only log of `(event, state before event)` pairs.
///
/// Rolling back consumes entries from the newest end. Once the log is
/// exhausted the store stays at the oldest retained snapshot, which is the
/// initial state unless the log was bounded and evicted it.
#[derive(Debug, Default, Clone)]
pub struct RollbackLog {
    entries: VecDeque<(String, State)>,
    limit: Option<usize>,
}

impl RollbackLog {
    /// Consume up to `depth` entries and return the snapshot of the oldest
    /// one consumed. `None` when `depth` is zero or the log is empty.
    pub fn rollback(&mut self, depth: usize) -> Option<State> {
        if depth == 0 || self.entries.is_empty() {
            return None;
        }
        let keep = self.entries.len().saturating_sub(depth);
        self.entries.drain(keep..).next().map(|(_, snapshot)| snapshot)
    }

    /// Event names of the logged entries, newest first.
    pub fn events(&self) -> Vec<String> {
        self.entries
            .iter()
            .rev()
            .map(|(event, _)| event.clone())
            .collect()
    }
}

impl History for RollbackLog {
    fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    fn record(&mut self, event: &str, snapshot: State) {
        if self.limit == Some(0) {
            return;
        }
        self.entries.push_back((event.to_string(), snapshot));
        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                self.entries.pop_front();
                tracing::warn!(limit, "rollback log full, oldest entry evicted");
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}
