use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::spawner::Spawner;
use super::store::Store;
use crate::history::History;
use crate::snapshot::State;

/// Tunable store settings.
///
/// Deserializable so an embedding application can keep it alongside its own
/// configuration. Missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of history entries kept. `None` keeps everything; the
    /// oldest entry is evicted first once the bound is reached.
    pub history_limit: Option<usize>,
}

impl StoreConfig {
    /// Bound the history to `limit` entries.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }
}

/// Assembles a [`Store`] from an initial state, a [`StoreConfig`] and an
/// optional [`Spawner`] for deferred reducer work.
pub struct StoreBuilder {
    init: State,
    config: StoreConfig,
    spawner: Option<Rc<dyn Spawner>>,
}

impl StoreBuilder {
    /// Start from `init` with default configuration and no spawner.
    pub fn new(init: State) -> Self {
        Self {
            init,
            config: StoreConfig::default(),
            spawner: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Bound the history to `limit` entries.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = Some(limit);
        self
    }

    /// Executor that receives the deferred part of asynchronous reducers.
    pub fn spawner(mut self, spawner: impl Spawner + 'static) -> Self {
        self.spawner = Some(Rc::new(spawner));
        self
    }

    /// Build a store with history policy `H`.
    pub fn build<H: History>(self) -> Store<H> {
        Store::from_parts(self.init, self.config, self.spawner)
    }
}
