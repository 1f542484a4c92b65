use std::rc::Rc;

use crate::registry::HandlerId;
use crate::snapshot::{Payload, State};

/// Event name listeners register under.
pub const CHANGED: &str = "@changed";

/// Tag passed to listeners after an undo.
pub const UNDO: &str = "@undo";

/// Tag passed to listeners after a redo.
pub const REDO: &str = "@redo";

/// Tag passed to listeners after a rollback.
pub const ROLLBACK: &str = "@rollback";

/// Whether `event` is one of the reserved names. Reserved names are never
/// matched against reducers.
pub fn is_reserved(event: &str) -> bool {
    matches!(event, CHANGED | UNDO | REDO | ROLLBACK)
}

/// An observer of state changes.
///
/// Receives its own copy of the current state, the payload of the dispatch
/// that caused the change (if any), and the event name or reserved tag.
pub trait Listener {
    fn changed(&self, state: State, payload: Option<&Payload>, event: &str) -> anyhow::Result<()>;
}

impl<F> Listener for F
where
    F: Fn(State, Option<&Payload>, &str) -> anyhow::Result<()>,
{
    fn changed(&self, state: State, payload: Option<&Payload>, event: &str) -> anyhow::Result<()> {
        self(state, payload, event)
    }
}

/// Ordered list of `@changed` listeners.
#[derive(Default)]
pub(crate) struct ChangeNotifier {
    next_id: HandlerId,
    listeners: Vec<(HandlerId, Rc<dyn Listener>)>,
}

impl ChangeNotifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&mut self, listener: Rc<dyn Listener>) -> HandlerId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: HandlerId) -> bool {
        match self.listeners.iter().position(|(entry, _)| *entry == id) {
            Some(position) => {
                self.listeners.remove(position);
                true
            }
            None => false,
        }
    }

    /// Listeners in registration order, detached from the notifier.
    pub(crate) fn listeners(&self) -> Vec<Rc<dyn Listener>> {
        self.listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}
