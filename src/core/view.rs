//! The View role: observer lists, broadcast, and the mediator registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::config::{CoreConfig, DuplicatePolicy};
use crate::error::{MvcError, Result};
use crate::patterns::facade::Facade;
use crate::patterns::mediator::Mediator;
use crate::patterns::observer::{Notification, Notifier, Observer};

/// The notification bus of one core.
///
/// Observers are kept per notification name in registration order. A name's
/// entry is created by its first observer and deleted when its last observer
/// is removed. Locks are released before any observer, hook or mediator runs,
/// so handlers may freely register, remove or send from inside a broadcast.
pub struct View {
    key: String,
    config: CoreConfig,
    observer_map: RwLock<HashMap<String, Vec<Observer>>>,
    mediator_map: RwLock<HashMap<String, RegisteredMediator>>,
    notifier: Notifier,
}

/// A mediator and the names it was subscribed to when registered.
struct RegisteredMediator {
    mediator: Arc<dyn Mediator>,
    interests: Vec<String>,
}

impl View {
    /// Create a view for `key` with the default configuration.
    pub fn new(key: &str) -> Arc<Self> {
        Self::with_config(key, CoreConfig::default())
    }

    /// Create a view for `key`.
    pub fn with_config(key: &str, config: CoreConfig) -> Arc<Self> {
        let notifier = Notifier::new();
        notifier.initialize_notifier(key, Weak::new());
        Arc::new(Self {
            key: key.to_string(),
            config,
            observer_map: RwLock::new(HashMap::new()),
            mediator_map: RwLock::new(HashMap::new()),
            notifier,
        })
    }

    /// Point mediators registered from now on at `facade`.
    pub(crate) fn attach_facade(&self, facade: Weak<Facade>) {
        self.notifier.initialize_notifier(&self.key, facade);
    }

    /// The multiton key of this view.
    pub fn multiton_key(&self) -> &str {
        &self.key
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    /// Append `observer` to the list for `name`. Duplicates are kept.
    pub fn register_observer(&self, name: &str, observer: Observer) {
        self.observer_map
            .write()
            .entry(name.to_string())
            .or_default()
            .push(observer);
    }

    /// Notify every observer of `notification.name()`, in registration order.
    ///
    /// The list is copied before iterating, so changes made by observers
    /// take effect from the next broadcast. The first observer error aborts
    /// the broadcast and is returned.
    pub fn notify_observers(&self, notification: &Notification) -> Result<()> {
        let observers: Vec<Observer> = match self.observer_map.read().get(notification.name()) {
            Some(list) => list.clone(),
            None => return Ok(()),
        };

        log::trace!(
            "[View:{}] broadcasting `{}` to {} observer(s)",
            self.key,
            notification.name(),
            observers.len()
        );
        for observer in &observers {
            observer.notify_observer(notification)?;
        }
        Ok(())
    }

    /// Remove the first observer for `name` whose context is `context`.
    ///
    /// Pass the context object itself (`&*arc`). The name's entry is deleted
    /// once its list is empty.
    pub fn remove_observer<C: ?Sized>(&self, name: &str, context: &C) {
        let mut map = self.observer_map.write();
        if let Some(observers) = map.get_mut(name) {
            if let Some(index) = observers.iter().position(|o| o.compare_context(context)) {
                observers.remove(index);
            }
            if observers.is_empty() {
                map.remove(name);
            }
        }
    }

    /// Number of observers registered for `name`.
    pub fn observer_count(&self, name: &str) -> usize {
        self.observer_map.read().get(name).map_or(0, Vec::len)
    }

    /// Whether any observer list exists for `name`.
    pub fn has_observers(&self, name: &str) -> bool {
        self.observer_map.read().contains_key(name)
    }

    // -----------------------------------------------------------------------
    // Mediators
    // -----------------------------------------------------------------------

    /// Register a mediator and subscribe it to its notification interests.
    ///
    /// Returns `false` when the name is taken and the policy is
    /// [`DuplicatePolicy::Reject`]; the new mediator is then ignored.
    pub fn register_mediator(&self, mediator: Arc<dyn Mediator>) -> bool {
        let name = mediator.name().to_string();
        if self.has_mediator(&name) {
            match self.config.mediator_policy {
                DuplicatePolicy::Reject => {
                    log::warn!("[View:{}] mediator `{name}` already registered; ignoring", self.key);
                    return false;
                }
                DuplicatePolicy::Replace => {
                    log::debug!("[View:{}] replacing mediator `{name}`", self.key);
                    self.remove_mediator(&name);
                }
            }
        }

        mediator.notifier().initialize_from(&self.notifier);
        self.mediator_map.write().insert(
            name.clone(),
            RegisteredMediator {
                mediator: mediator.clone(),
                interests: Vec::new(),
            },
        );
        log::debug!("[View:{}] registered mediator `{name}`", self.key);
        mediator.on_register();

        let interests = mediator.list_notification_interests();
        for interest in &interests {
            let mediator_name = name.clone();
            let observer = Observer::from_weak(Arc::downgrade(&mediator), move |m, note| {
                m.handle_notification(note).map_err(|source| MvcError::Mediator {
                    mediator: mediator_name.clone(),
                    notification: note.name().to_string(),
                    source,
                })
            });
            self.register_observer(interest, observer);
        }

        // Removal unsubscribes these names even if the mediator's list changes later.
        if let Some(entry) = self.mediator_map.write().get_mut(&name) {
            if same_mediator(&entry.mediator, &mediator) {
                entry.interests = interests;
            }
        }
        true
    }

    /// Look up a mediator by name.
    pub fn retrieve_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.mediator_map
            .read()
            .get(name)
            .map(|entry| entry.mediator.clone())
    }

    /// Whether a mediator is registered under `name`.
    pub fn has_mediator(&self, name: &str) -> bool {
        self.mediator_map.read().contains_key(name)
    }

    /// Unsubscribe and remove a mediator, calling its `on_remove` hook.
    ///
    /// The mediator is unsubscribed from the names it listed when it was
    /// registered, not from whatever it lists now.
    pub fn remove_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        let (mediator, interests) = {
            let map = self.mediator_map.read();
            let entry = map.get(name)?;
            (entry.mediator.clone(), entry.interests.clone())
        };

        for interest in &interests {
            self.remove_observer(interest, &*mediator);
        }
        self.mediator_map.write().remove(name);
        log::debug!("[View:{}] removed mediator `{name}`", self.key);
        mediator.on_remove();
        Some(mediator)
    }

    /// Names of all registered mediators, in no particular order.
    pub fn mediator_names(&self) -> Vec<String> {
        self.mediator_map.read().keys().cloned().collect()
    }
}

fn same_mediator(a: &Arc<dyn Mediator>, b: &Arc<dyn Mediator>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let observed: Vec<String> = self.observer_map.read().keys().cloned().collect();
        f.debug_struct("View")
            .field("key", &self.key)
            .field("observed", &observed)
            .field("mediators", &self.mediator_names())
            .finish()
    }
}
