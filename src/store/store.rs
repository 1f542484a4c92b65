use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::config::{StoreBuilder, StoreConfig};
use super::spawner::Spawner;
use crate::error::StoreError;
use crate::history::{History, RollbackLog, UndoRedo};
use crate::notify::{is_reserved, ChangeNotifier, Listener, CHANGED, REDO, ROLLBACK, UNDO};
use crate::registry::{Reducer, ReducerRegistry, Reduction, Subscription};
use crate::snapshot::{self, shallow_equal, Payload, State};

struct Inner<H> {
    state: RefCell<State>,
    history: RefCell<H>,
    reducers: Rc<RefCell<ReducerRegistry>>,
    notifier: Rc<RefCell<ChangeNotifier>>,
    spawner: Option<Rc<dyn Spawner>>,
    config: StoreConfig,
}

/// An event-driven state container.
///
/// State changes only through [`dispatch`](Store::dispatch), which runs the
/// reducers registered for an event, records the prior state in the history
/// `H`, and notifies `@changed` listeners if the state changed at the top
/// level. Reads always return independent copies.
///
/// `Store` is a cheap handle: clones share the same state. It is neither
/// `Send` nor `Sync`. A multi-threaded host must keep each store on one
/// thread and talk to it through that thread.
///
/// Reducers and listeners may call back into the store (dispatch, register,
/// unsubscribe). A nested dispatch runs to completion, including its own
/// history entry and notifications, before the outer call continues.
pub struct Store<H = UndoRedo> {
    inner: Rc<Inner<H>>,
}

/// A non-owning handle to a [`Store`], for reducers and listeners that need
/// to call back into the store that holds them.
pub struct WeakStore<H = UndoRedo> {
    inner: Weak<Inner<H>>,
}

/// Create a store with undo/redo history.
pub fn create(init: State) -> Store<UndoRedo> {
    Store::new(init)
}

/// Create a store with a rollback log.
pub fn create_with_rollback(init: State) -> Store<RollbackLog> {
    Store::with_config(init, StoreConfig::default())
}

impl Store<UndoRedo> {
    /// Create a store with undo/redo history and default configuration.
    pub fn new(init: State) -> Self {
        Self::with_config(init, StoreConfig::default())
    }

    /// Start a [`StoreBuilder`] from `init`. `build` picks the history policy.
    pub fn builder(init: State) -> StoreBuilder {
        StoreBuilder::new(init)
    }
}

impl<H: History> Store<H> {
    /// Create a store with explicit configuration and no spawner.
    pub fn with_config(init: State, config: StoreConfig) -> Self {
        Self::from_parts(init, config, None)
    }

    pub(crate) fn from_parts(init: State, config: StoreConfig, spawner: Option<Rc<dyn Spawner>>) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(init),
                history: RefCell::new(H::with_limit(config.history_limit)),
                reducers: Rc::new(RefCell::new(ReducerRegistry::new())),
                notifier: Rc::new(RefCell::new(ChangeNotifier::new())),
                spawner,
                config,
            }),
        }
    }

    /// Create a store whose initial state is a serialized value.
    ///
    /// Fails if the value does not serialize to a JSON object.
    pub fn from_serialize<T: Serialize + ?Sized>(init: &T) -> Result<Self, StoreError> {
        Ok(Self::with_config(snapshot::to_state(init)?, StoreConfig::default()))
    }

    /// Get a copy of the current state.
    pub fn get(&self) -> State {
        snapshot::snapshot(&self.inner.state.borrow())
    }

    /// Run `query` over a copy of the current state.
    pub fn select<R>(&self, query: impl FnOnce(State) -> R) -> R {
        query(self.get())
    }

    /// Deserialize a copy of the current state into `T`.
    pub fn get_as<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        snapshot::from_state(self.get())
    }

    /// Register a reducer closure for `event`.
    ///
    /// Registering under `@changed` adds a change listener instead. Its
    /// returned state is discarded, but deferred work still goes to the
    /// spawner.
    pub fn on<F, R>(&self, event: &str, reducer: F) -> Result<Subscription, StoreError>
    where
        F: Fn(State, Option<&Payload>) -> anyhow::Result<R> + 'static,
        R: Into<Reduction>,
    {
        self.on_reducer(event, reducer)
    }

    /// Register any [`Reducer`] for `event`.
    ///
    /// A `@changed` reducer that defers work on a store without a spawner
    /// fails the notification with [`StoreError::Listener`], whose source is
    /// [`StoreError::NoSpawner`].
    pub fn on_reducer(&self, event: &str, reducer: impl Reducer + 'static) -> Result<Subscription, StoreError> {
        if event.is_empty() {
            return Err(StoreError::EmptyEventName);
        }
        if event == CHANGED {
            let spawner = self.inner.spawner.clone();
            return Ok(self.on_changed(move |state, payload, _event| {
                let (_, deferred) = reducer.reduce(state, payload)?.into_parts();
                if let Some(task) = deferred {
                    schedule_on(spawner.as_deref(), CHANGED, task)?;
                }
                Ok(())
            }));
        }
        if is_reserved(event) {
            return Err(StoreError::ReservedEvent(event.to_string()));
        }

        let id = self
            .inner
            .reducers
            .borrow_mut()
            .register(event, Rc::new(reducer));
        let registry = Rc::downgrade(&self.inner.reducers);
        let name = event.to_string();
        Ok(Subscription::new(event, move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().remove(&name, id);
            }
        }))
    }

    /// Register a `@changed` listener.
    ///
    /// The listener receives a copy of the state, the payload of the
    /// triggering dispatch, and the event name (or `@undo`, `@redo`,
    /// `@rollback`). Listeners fire in registration order.
    pub fn on_changed<F>(&self, listener: F) -> Subscription
    where
        F: Fn(State, Option<&Payload>, &str) -> anyhow::Result<()> + 'static,
    {
        self.on_listener(listener)
    }

    /// Register any [`Listener`] for `@changed`.
    pub fn on_listener(&self, listener: impl Listener + 'static) -> Subscription {
        let id = self.inner.notifier.borrow_mut().register(Rc::new(listener));
        let notifier = Rc::downgrade(&self.inner.notifier);
        Subscription::new(CHANGED, move || {
            if let Some(notifier) = notifier.upgrade() {
                notifier.borrow_mut().remove(id);
            }
        })
    }

    /// Route `event` through its reducers.
    ///
    /// Unregistered and reserved events are ignored: no history entry, no
    /// notification. Otherwise the current state is recorded in the history,
    /// each reducer runs in registration order on the state left by the one
    /// before it, and listeners are notified if the result differs from the
    /// prior state at the top level.
    ///
    /// A failing reducer stops the dispatch. Reducers before it have already
    /// replaced the state and the history entry stays, so undo or rollback
    /// returns to the state before this call.
    pub fn dispatch(&self, event: &str, payload: Option<Payload>) -> Result<(), StoreError> {
        let reducers = self.inner.reducers.borrow().lookup(event);
        if reducers.is_empty() {
            tracing::trace!(event, "no reducers registered, dispatch ignored");
            return Ok(());
        }

        let pre = self.get();
        self.inner
            .history
            .borrow_mut()
            .record(event, snapshot::snapshot(&pre));

        for reducer in &reducers {
            let reduction = reducer
                .reduce(self.get(), payload.as_ref())
                .map_err(|source| StoreError::Reducer {
                    event: event.to_string(),
                    source,
                })?;
            let (next, deferred) = reduction.into_parts();
            *self.inner.state.borrow_mut() = next;
            if let Some(task) = deferred {
                schedule_on(self.inner.spawner.as_deref(), event, task)?;
            }
        }

        let changed = !shallow_equal(&pre, &self.inner.state.borrow());
        tracing::debug!(event, changed, reducers = reducers.len(), "dispatch complete");
        if changed {
            self.notify(event, payload.as_ref())?;
        }
        Ok(())
    }

    /// Number of entries the history can revert through.
    pub fn history_len(&self) -> usize {
        self.inner.history.borrow().len()
    }

    /// Forget all history without touching the current state.
    pub fn clear_history(&self) {
        self.inner.history.borrow_mut().clear();
    }

    /// Whether any reducer is registered for `event`.
    pub fn has_reducers(&self, event: &str) -> bool {
        self.inner.reducers.borrow().count(event) > 0
    }

    /// Number of registered `@changed` listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.notifier.borrow().len()
    }

    /// The configuration this store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Create a [`WeakStore`] that does not keep the state alive.
    pub fn downgrade(&self) -> WeakStore<H> {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    fn replace_state(&self, state: State) {
        *self.inner.state.borrow_mut() = state;
    }

    fn notify(&self, event: &str, payload: Option<&Payload>) -> Result<(), StoreError> {
        let listeners = self.inner.notifier.borrow().listeners();
        for listener in listeners {
            listener
                .changed(self.get(), payload, event)
                .map_err(|source| StoreError::Listener {
                    event: event.to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}

impl Store<UndoRedo> {
    /// Revert to the state before the most recent dispatch.
    ///
    /// Does nothing when there is nothing to undo. Otherwise listeners are
    /// notified with the `@undo` tag.
    pub fn undo(&self) -> Result<(), StoreError> {
        let previous = self.inner.history.borrow_mut().undo(self.get());
        let Some(previous) = previous else {
            tracing::trace!("nothing to undo");
            return Ok(());
        };
        self.replace_state(previous);
        tracing::debug!(history = self.history_len(), "undo");
        self.notify(UNDO, None)
    }

    /// Re-apply the most recently undone state.
    ///
    /// Does nothing when there is nothing to redo, including after any
    /// dispatch that followed the undo. Otherwise listeners are notified with
    /// the `@redo` tag.
    pub fn redo(&self) -> Result<(), StoreError> {
        let next = self.inner.history.borrow_mut().redo(self.get());
        let Some(next) = next else {
            tracing::trace!("nothing to redo");
            return Ok(());
        };
        self.replace_state(next);
        tracing::debug!(history = self.history_len(), "redo");
        self.notify(REDO, None)
    }

    /// Whether [`undo`](Store::undo) would change anything.
    pub fn can_undo(&self) -> bool {
        self.inner.history.borrow().can_undo()
    }

    /// Whether [`redo`](Store::redo) would change anything.
    pub fn can_redo(&self) -> bool {
        self.inner.history.borrow().can_redo()
    }
}

impl Store<RollbackLog> {
    /// Revert `depth` dispatches and return a copy of the resulting state.
    ///
    /// A depth beyond the log length stops at the oldest entry. A depth of
    /// zero or an empty log leaves the state alone and notifies no one;
    /// otherwise listeners are notified with the `@rollback` tag.
    pub fn rollback(&self, depth: usize) -> Result<State, StoreError> {
        let previous = self.inner.history.borrow_mut().rollback(depth);
        let Some(previous) = previous else {
            tracing::trace!(depth, "nothing to roll back");
            return Ok(self.get());
        };
        self.replace_state(previous);
        tracing::debug!(depth, remaining = self.history_len(), "rollback");
        self.notify(ROLLBACK, None)?;
        Ok(self.get())
    }

    /// Event names in the rollback log, newest first.
    pub fn log(&self) -> Vec<String> {
        self.inner.history.borrow().events()
    }
}

impl<H> Clone for Store<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: History> fmt::Debug for Store<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.inner.state.borrow())
            .field("history", &self.history_len())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<H> WeakStore<H> {
    /// The store, if any strong handle to it is still alive.
    pub fn upgrade(&self) -> Option<Store<H>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

impl<H> Clone for WeakStore<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

fn schedule_on(
    spawner: Option<&dyn Spawner>,
    event: &str,
    task: LocalBoxFuture<'static, ()>,
) -> Result<(), StoreError> {
    let Some(spawner) = spawner else {
        return Err(StoreError::NoSpawner {
            event: event.to_string(),
        });
    };
    spawner.schedule(task).map_err(|source| StoreError::Spawn {
        event: event.to_string(),
        source,
    })?;
    tracing::trace!(event, "deferred reducer work scheduled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::from_value;
    use serde_json::{json, Value};
    use std::cell::Cell;

    fn state(value: Value) -> State {
        from_value(value).unwrap()
    }

    fn counter() -> (Rc<Cell<usize>>, impl Fn(State, Option<&Payload>, &str) -> anyhow::Result<()>) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        (count, move |_: State, _: Option<&Payload>, _: &str| {
            count_clone.set(count_clone.get() + 1);
            Ok(())
        })
    }

    fn set_key(mut state: State, payload: Option<&Payload>) -> anyhow::Result<State> {
        let value = payload
            .and_then(|p| p.get("value"))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("payload needs a value"))?;
        state.insert("key".to_string(), value);
        Ok(state)
    }

    fn value(value: &str) -> Option<Payload> {
        Some(state(json!({ "value": value })))
    }

    #[test]
    fn get_returns_initial_state() {
        let store = create(state(json!({ "key": "value" })));
        assert_eq!(store.get(), state(json!({ "key": "value" })));
    }

    #[test]
    fn get_returns_independent_copy() {
        let store = create(state(json!({ "key": "value", "list": [1] })));
        let mut copy = store.get();
        copy.insert("key".to_string(), json!("mutated"));
        copy["list"].as_array_mut().unwrap().push(json!(2));

        assert_eq!(store.get(), state(json!({ "key": "value", "list": [1] })));
    }

    #[test]
    fn select_transforms_copy() {
        let store = create(state(json!({ "key": "value" })));
        let key = store.select(|s| s["key"].as_str().map(str::to_owned));
        assert_eq!(key.as_deref(), Some("value"));
    }

    #[test]
    fn dispatch_applies_reducer() {
        let store = create(state(json!({ "key": "value" })));
        store.on("change", set_key).unwrap();

        store.dispatch("change", value("new")).unwrap();
        assert_eq!(store.get()["key"], json!("new"));
    }

    #[test]
    fn unknown_event_is_ignored() {
        let store = create(state(json!({ "key": "value" })));
        let (count, listener) = counter();
        store.on_changed(listener);

        store.dispatch("missing", Some(Payload::new())).unwrap();

        assert_eq!(store.get(), state(json!({ "key": "value" })));
        assert_eq!(count.get(), 0);
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn reserved_events_are_not_dispatch_targets() {
        let store = create(state(json!({ "key": "value" })));
        let (count, listener) = counter();
        store.on_changed(listener);

        store.dispatch(CHANGED, None).unwrap();
        store.dispatch(UNDO, None).unwrap();

        assert_eq!(count.get(), 0);
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn unchanged_state_does_not_notify() {
        let store = create(state(json!({ "key": "value" })));
        let (count, listener) = counter();
        store.on_changed(listener);
        store.on("noop", |state, _| Ok(state)).unwrap();
        store.on("same", |_, _| Ok(from_value(json!({ "key": "value" }))?)).unwrap();

        store.dispatch("noop", None).unwrap();
        store.dispatch("same", None).unwrap();

        assert_eq!(count.get(), 0);
        assert_eq!(store.history_len(), 2);
    }

    #[test]
    fn reducers_thread_state_in_order() {
        let store = create(state(json!({ "n": 1 })));
        store
            .on("step", |mut state, _| {
                let n = state["n"].as_i64().unwrap_or_default();
                state.insert("n".to_string(), json!(n + 1));
                Ok(state)
            })
            .unwrap();
        store
            .on("step", |mut state, _| {
                let n = state["n"].as_i64().unwrap_or_default();
                state.insert("n".to_string(), json!(n * 10));
                Ok(state)
            })
            .unwrap();

        store.dispatch("step", None).unwrap();
        assert_eq!(store.get()["n"], json!(20));
    }

    #[test]
    fn listener_receives_payload_and_event() {
        let store = create(state(json!({ "key": "value" })));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        store.on("change", set_key).unwrap();
        store.on_changed(move |state, payload, event| {
            let value = payload.and_then(|p| p.get("value")).cloned();
            seen_clone
                .borrow_mut()
                .push((event.to_string(), state["key"].clone(), value));
            Ok(())
        });

        store.dispatch("change", value("new")).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![("change".to_string(), json!("new"), Some(json!("new")))]
        );
    }

    #[test]
    fn on_changed_via_on_discards_result() {
        let store = create(state(json!({ "key": "value" })));
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        store.on("change", set_key).unwrap();
        store
            .on(CHANGED, move |mut state, _| {
                count_clone.set(count_clone.get() + 1);
                state.insert("key".to_string(), json!("ignored"));
                Ok(state)
            })
            .unwrap();

        store.dispatch("change", value("new")).unwrap();

        assert_eq!(count.get(), 1);
        assert_eq!(store.get()["key"], json!("new"));
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn invalid_registrations_are_rejected() {
        let store = create(State::new());
        assert!(matches!(
            store.on("", |state, _| Ok(state)),
            Err(StoreError::EmptyEventName)
        ));
        assert!(matches!(
            store.on(UNDO, |state, _| Ok(state)),
            Err(StoreError::ReservedEvent(name)) if name == "@undo"
        ));
        assert!(matches!(
            store.on(ROLLBACK, |state, _| Ok(state)),
            Err(StoreError::ReservedEvent(_))
        ));
    }

    #[test]
    fn unsubscribe_removes_only_that_reducer() {
        let store = create(state(json!({ "hits": [] })));
        let push = |tag: &'static str| {
            move |mut state: State, _: Option<&Payload>| -> anyhow::Result<State> {
                state["hits"].as_array_mut().unwrap().push(json!(tag));
                Ok(state)
            }
        };
        store.on("e", push("a")).unwrap();
        let off = store.on("e", push("b")).unwrap();

        off.unsubscribe();
        off.unsubscribe();
        store.dispatch("e", None).unwrap();

        assert_eq!(store.get()["hits"], json!(["a"]));
        assert!(!off.is_active());
    }

    #[test]
    fn removing_last_reducer_makes_event_a_noop() {
        let store = create(state(json!({ "key": "value" })));
        let off = store.on("change", set_key).unwrap();
        off.unsubscribe();

        store.dispatch("change", value("new")).unwrap();

        assert!(!store.has_reducers("change"));
        assert_eq!(store.history_len(), 0);
        assert_eq!(store.get()["key"], json!("value"));
    }

    #[test]
    fn listener_unsubscribe() {
        let store = create(state(json!({ "key": "value" })));
        let (count, listener) = counter();
        let off = store.on_changed(listener);
        store.on("change", set_key).unwrap();

        store.dispatch("change", value("a")).unwrap();
        off.unsubscribe();
        store.dispatch("change", value("b")).unwrap();

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn reducer_error_propagates_without_notifying() {
        let store = create(state(json!({ "key": "value" })));
        let (count, listener) = counter();
        store.on_changed(listener);
        store.on("change", set_key).unwrap();

        let err = store.dispatch("change", None).unwrap_err();

        assert!(matches!(err, StoreError::Reducer { ref event, .. } if event == "change"));
        assert_eq!(count.get(), 0);
        assert_eq!(store.get()["key"], json!("value"));
    }

    #[test]
    fn listener_error_propagates() {
        let store = create(state(json!({ "key": "value" })));
        store.on("change", set_key).unwrap();
        store.on_changed(|_, _, _| Err(anyhow::anyhow!("listener broke")));

        let err = store.dispatch("change", value("new")).unwrap_err();

        assert!(matches!(err, StoreError::Listener { .. }));
        assert_eq!(store.get()["key"], json!("new"));
    }

    #[test]
    fn deferred_reducer_without_spawner_fails() {
        let store = create(State::new());
        store
            .on("load", |state, _| Ok(Reduction::deferred(state, async {})))
            .unwrap();

        let err = store.dispatch("load", None).unwrap_err();
        assert!(matches!(err, StoreError::NoSpawner { .. }));
    }

    #[test]
    fn changed_reducer_defers_to_spawner() {
        let mut pool = futures::executor::LocalPool::new();
        let store = Store::builder(state(json!({ "key": "value" })))
            .spawner(pool.spawner())
            .build::<UndoRedo>();
        let ran = Rc::new(Cell::new(false));
        let ran_clone = ran.clone();
        store.on("change", set_key).unwrap();
        store
            .on(CHANGED, move |state, _| {
                let ran = ran_clone.clone();
                Ok(Reduction::deferred(state, async move { ran.set(true) }))
            })
            .unwrap();

        store.dispatch("change", value("a")).unwrap();
        assert!(!ran.get());
        pool.run_until_stalled();
        assert!(ran.get());
    }

    #[test]
    fn changed_reducer_deferring_without_spawner_fails() {
        let store = create(state(json!({ "key": "value" })));
        store.on("change", set_key).unwrap();
        store
            .on(CHANGED, |state, _| Ok(Reduction::deferred(state, async {})))
            .unwrap();

        let err = store.dispatch("change", value("a")).unwrap_err();
        let StoreError::Listener { event, source } = err else {
            panic!("expected a listener error, got {err:?}");
        };
        assert_eq!(event, "change");
        assert!(matches!(
            source.downcast_ref::<StoreError>(),
            Some(StoreError::NoSpawner { .. })
        ));
        assert_eq!(store.get()["key"], json!("a"));
    }

    #[test]
    fn on_listener_accepts_listener_types() {
        struct Recorder {
            events: Rc<RefCell<Vec<String>>>,
        }

        impl Listener for Recorder {
            fn changed(&self, _state: State, _payload: Option<&Payload>, event: &str) -> anyhow::Result<()> {
                self.events.borrow_mut().push(event.to_string());
                Ok(())
            }
        }

        let store = create(state(json!({ "key": "value" })));
        let events = Rc::new(RefCell::new(Vec::new()));
        store.on("change", set_key).unwrap();
        let subscription = store.on_listener(Recorder { events: events.clone() });

        store.dispatch("change", value("a")).unwrap();
        subscription.unsubscribe();
        store.dispatch("change", value("b")).unwrap();

        assert_eq!(*events.borrow(), vec!["change"]);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn typed_access() {
        #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
        struct Counter {
            count: u32,
        }

        let store: Store = Store::from_serialize(&Counter { count: 2 }).unwrap();
        assert_eq!(store.get_as::<Counter>().unwrap(), Counter { count: 2 });
        assert!(store.get_as::<Vec<u32>>().is_err());
        assert!(Store::<UndoRedo>::from_serialize(&"not an object").is_err());
    }

    #[test]
    fn weak_store_does_not_keep_store_alive() {
        let store = create(State::new());
        let weak = store.downgrade();
        assert!(weak.upgrade().is_some());

        drop(store);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn undo_and_redo() {
        let store = create(state(json!({ "key": "value" })));
        store.on("change", set_key).unwrap();

        store.dispatch("change", value("a")).unwrap();
        store.dispatch("change", value("b")).unwrap();

        store.undo().unwrap();
        assert_eq!(store.get()["key"], json!("a"));
        store.undo().unwrap();
        assert_eq!(store.get()["key"], json!("value"));
        store.redo().unwrap();
        assert_eq!(store.get()["key"], json!("a"));
    }

    #[test]
    fn undo_on_empty_history_is_silent() {
        let store = create(state(json!({ "key": "value" })));
        let (count, listener) = counter();
        store.on_changed(listener);

        store.undo().unwrap();
        store.redo().unwrap();

        assert_eq!(count.get(), 0);
        assert_eq!(store.get(), state(json!({ "key": "value" })));
    }

    #[test]
    fn undo_notifies_with_tag() {
        let store = create(state(json!({ "key": "value" })));
        let tags = Rc::new(RefCell::new(Vec::new()));
        let tags_clone = tags.clone();
        store.on("change", set_key).unwrap();
        store.on_changed(move |_, _, event| {
            tags_clone.borrow_mut().push(event.to_string());
            Ok(())
        });

        store.dispatch("change", value("a")).unwrap();
        store.undo().unwrap();
        store.redo().unwrap();

        assert_eq!(*tags.borrow(), vec!["change", "@undo", "@redo"]);
    }

    #[test]
    fn dispatch_after_undo_drops_future() {
        let store = create(state(json!({ "key": "value" })));
        store.on("change", set_key).unwrap();

        store.dispatch("change", value("a")).unwrap();
        store.dispatch("change", value("b")).unwrap();
        store.undo().unwrap();
        store.dispatch("change", value("c")).unwrap();

        assert!(!store.can_redo());
        store.redo().unwrap();
        assert_eq!(store.get()["key"], json!("c"));
    }

    #[test]
    fn rollback_walks_back_log() {
        let store = create_with_rollback(state(json!({ "n": 0 })));
        store
            .on("inc", |mut state, _| {
                let n = state["n"].as_i64().unwrap_or_default();
                state.insert("n".to_string(), json!(n + 1));
                Ok(state)
            })
            .unwrap();
        for _ in 0..4 {
            store.dispatch("inc", None).unwrap();
        }

        assert_eq!(store.log(), vec!["inc"; 4]);
        assert_eq!(store.rollback(1).unwrap()["n"], json!(3));
        assert_eq!(store.rollback(100).unwrap()["n"], json!(0));
        assert_eq!(store.rollback(1).unwrap()["n"], json!(0));
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn rollback_zero_is_noop() {
        let store = create_with_rollback(state(json!({ "key": "value" })));
        let (count, listener) = counter();
        store.on_changed(listener);
        store.on("change", set_key).unwrap();
        store.dispatch("change", value("a")).unwrap();

        assert_eq!(store.rollback(0).unwrap()["key"], json!("a"));
        assert_eq!(count.get(), 1);
        assert_eq!(store.history_len(), 1);
    }

    #[test]
    fn rollback_notifies_unconditionally() {
        let store = create_with_rollback(state(json!({ "key": "value" })));
        let (count, listener) = counter();
        store.on("noop", |state, _| Ok(state)).unwrap();
        store.dispatch("noop", None).unwrap();
        store.on_changed(listener);
        let tags = Rc::new(RefCell::new(Vec::new()));
        let tags_clone = tags.clone();
        store.on_changed(move |_, _, event| {
            tags_clone.borrow_mut().push(event.to_string());
            Ok(())
        });

        store.rollback(1).unwrap();
        assert_eq!(count.get(), 1);
        assert_eq!(*tags.borrow(), vec![ROLLBACK.to_string()]);
    }

    #[test]
    fn clear_history_keeps_state() {
        let store = create(state(json!({ "key": "value" })));
        store.on("change", set_key).unwrap();
        store.dispatch("change", value("a")).unwrap();

        store.clear_history();

        assert!(!store.can_undo());
        assert_eq!(store.get()["key"], json!("a"));
    }
}
