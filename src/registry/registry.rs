use std::collections::HashMap;
use std::rc::Rc;

use super::reducer::Reducer;

/// Identifies one registration. Never reused within a registry.
pub(crate) type HandlerId = u64;

/// Ordered reducer lists keyed by event name.
#[derive(Default)]
pub(crate) struct ReducerRegistry {
    next_id: HandlerId,
    reducers: HashMap<String, Vec<(HandlerId, Rc<dyn Reducer>)>>,
}

impl ReducerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a reducer to the list for `event`.
    pub(crate) fn register(&mut self, event: &str, reducer: Rc<dyn Reducer>) -> HandlerId {
        let id = self.next_id;
        self.next_id += 1;
        self.reducers
            .entry(event.to_string())
            .or_default()
            .push((id, reducer));
        id
    }

    /// Remove the registration `id` from `event`. Returns whether it was present.
    ///
    /// An event whose list becomes empty is dropped entirely, so it behaves
    /// exactly like an event that was never registered.
    pub(crate) fn remove(&mut self, event: &str, id: HandlerId) -> bool {
        let Some(list) = self.reducers.get_mut(event) else {
            return false;
        };
        let Some(position) = list.iter().position(|(entry, _)| *entry == id) else {
            return false;
        };
        list.remove(position);
        if list.is_empty() {
            self.reducers.remove(event);
        }
        true
    }

    /// The reducers for `event` in registration order, detached from the
    /// registry so they can register or remove reducers while running.
    pub(crate) fn lookup(&self, event: &str) -> Vec<Rc<dyn Reducer>> {
        self.reducers
            .get(event)
            .map(|list| list.iter().map(|(_, reducer)| Rc::clone(reducer)).collect())
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, event: &str) -> usize {
        self.reducers.get(event).map_or(0, Vec::len)
    }
}
