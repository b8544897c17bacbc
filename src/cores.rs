//! The registry object that owns every core, keyed by multiton key.
//!
//! A [`Cores`] holds one [`MultitonRegistry`] per role. Tests create their
//! own instance so state never leaks between them; applications that want a
//! single process-wide registry use [`Cores::global`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::CoreConfig;
use crate::core::{Controller, Model, View};
use crate::multiton::MultitonRegistry;
use crate::patterns::facade::{Facade, FacadeInitializer, NoopInitializer};

static GLOBAL_CORES: Lazy<Cores> = Lazy::new(|| {
    let config = CoreConfig::from_env().unwrap_or_else(|err| {
        log::warn!("[Cores] ignoring invalid environment configuration: {err}");
        CoreConfig::default()
    });
    Cores::with_config(config)
});

/// Lifecycle of the core behind one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreState {
    /// No facade has been requested for the key.
    #[default]
    Absent,
    /// The facade is built and its initializer hooks are running.
    Initializing,
    /// Ready for registrations and notifications.
    Active,
    /// Torn down by [`Cores::remove_core`]. Requesting the facade again builds a new core.
    Removed,
}

/// Keyed registries of Models, Views, Controllers and Facades.
pub struct Cores {
    config: CoreConfig,
    models: MultitonRegistry<Model>,
    views: MultitonRegistry<View>,
    controllers: MultitonRegistry<Controller>,
    facades: MultitonRegistry<Facade>,
    states: Mutex<HashMap<String, CoreState>>,
}

impl Default for Cores {
    fn default() -> Self {
        Self::with_config(CoreConfig::default())
    }
}

impl Cores {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry whose Models and Views use `config`.
    pub fn with_config(config: CoreConfig) -> Self {
        Self {
            config,
            models: MultitonRegistry::new(),
            views: MultitonRegistry::new(),
            controllers: MultitonRegistry::new(),
            facades: MultitonRegistry::new(),
            states: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide registry, configured from the environment on first use.
    pub fn global() -> &'static Cores {
        &GLOBAL_CORES
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// The Model for `key`, created on first request.
    pub fn model(&self, key: &str) -> Arc<Model> {
        self.models
            .get_instance(key, |key| Model::with_config(key, self.config.clone()))
    }

    /// The View for `key`, created on first request.
    pub fn view(&self, key: &str) -> Arc<View> {
        self.views
            .get_instance(key, |key| View::with_config(key, self.config.clone()))
    }

    /// The Controller for `key`, created on first request along with its View.
    pub fn controller(&self, key: &str) -> Arc<Controller> {
        self.controllers
            .get_instance(key, |key| Controller::new(key, &self.view(key)))
    }

    /// The Facade for `key`, created on first request without initializer hooks.
    pub fn facade(&self, key: &str) -> Arc<Facade> {
        self.facade_with(key, &NoopInitializer)
    }

    /// The Facade for `key`.
    ///
    /// When the core does not exist yet, it is assembled, stored, and then
    /// handed to `initializer`. An existing core is returned as is and the
    /// initializer is not called.
    pub fn facade_with(&self, key: &str, initializer: &dyn FacadeInitializer) -> Arc<Facade> {
        if let Some(facade) = self.facades.retrieve(key) {
            return facade;
        }

        self.set_state(key, CoreState::Initializing);
        let mut assembled = false;
        let facade = self.facades.get_instance(key, |key| {
            assembled = true;
            Facade::assemble(self, key)
        });

        if assembled {
            log::debug!("[Cores] initializing core `{key}`");
            initializer.initialize_model(&facade);
            initializer.initialize_controller(&facade);
            initializer.initialize_view(&facade);

            // A hook may have removed (or replaced) the core it was given.
            let still_current = self
                .facades
                .retrieve(key)
                .is_some_and(|current| Arc::ptr_eq(&current, &facade));
            if still_current {
                self.set_state(key, CoreState::Active);
                log::debug!("[Cores] core `{key}` is active");
            } else {
                log::debug!("[Cores] core `{key}` was removed during initialization");
            }
        }
        facade
    }

    /// Whether a Facade exists for `key`.
    pub fn has_core(&self, key: &str) -> bool {
        self.facades.has(key)
    }

    /// Tear down the core for `key`, dropping its Facade, Model, Controller and View.
    ///
    /// Returns `false` when no Facade existed. Actors still holding a notifier
    /// for the key fail with [`MvcError::CoreRemoved`](crate::MvcError::CoreRemoved)
    /// once the last handle to the old Facade is gone.
    pub fn remove_core(&self, key: &str) -> bool {
        let facade = self.facades.remove(key);
        self.models.remove(key);
        self.controllers.remove(key);
        self.views.remove(key);

        if facade.is_some() {
            self.set_state(key, CoreState::Removed);
            log::debug!("[Cores] removed core `{key}`");
        }
        facade.is_some()
    }

    /// Drop the Model for `key`. An existing Facade keeps its own handle.
    pub fn remove_model(&self, key: &str) -> Option<Arc<Model>> {
        self.models.remove(key)
    }

    /// Drop the View for `key`. An existing Facade or Controller keeps its own handle.
    pub fn remove_view(&self, key: &str) -> Option<Arc<View>> {
        self.views.remove(key)
    }

    /// Drop the Controller for `key`. An existing Facade keeps its own handle.
    pub fn remove_controller(&self, key: &str) -> Option<Arc<Controller>> {
        self.controllers.remove(key)
    }

    /// Current lifecycle state of the core for `key`.
    ///
    /// A removed core stays `Removed` until the key is used again or
    /// [`forget`](Self::forget) is called, so the state table holds one
    /// entry per key ever used.
    pub fn state(&self, key: &str) -> CoreState {
        self.states.lock().get(key).copied().unwrap_or_default()
    }

    /// Drop the record of a removed core, so its state reads `Absent` again.
    ///
    /// Returns `false`, leaving the record in place, unless the core is `Removed`.
    pub fn forget(&self, key: &str) -> bool {
        let mut states = self.states.lock();
        if states.get(key) != Some(&CoreState::Removed) {
            return false;
        }
        states.remove(key);
        true
    }

    /// Keys with a live Facade, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.facades.keys()
    }

    fn set_state(&self, key: &str, state: CoreState) {
        self.states.lock().insert(key.to_string(), state);
    }
}

impl fmt::Debug for Cores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cores")
            .field("config", &self.config)
            .field("facades", &self.facades)
            .finish()
    }
}
