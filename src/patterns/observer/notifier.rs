//! The capability that lets proxies, mediators and commands send notifications.
//!
//! Instead of inheriting from a common base, each actor embeds a [`Notifier`]
//! and exposes it through [`HasNotifier`]. The notifier holds the core's key
//! and a weak handle to its [`Facade`], so actors never keep a core alive.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::error::{MvcError, Result};
use crate::patterns::facade::Facade;
use crate::payload::Payload;

#[derive(Clone)]
struct Binding {
    key: String,
    facade: Weak<Facade>,
}

/// Key + weak facade handle, set once the owner is registered with a core.
#[derive(Default)]
pub struct Notifier {
    binding: RwLock<Option<Binding>>,
}

impl Notifier {
    /// Create an unbound notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind this notifier to the core identified by `key`.
    pub fn initialize_notifier(&self, key: &str, facade: Weak<Facade>) {
        *self.binding.write() = Some(Binding {
            key: key.to_string(),
            facade,
        });
    }

    /// Copy another notifier's binding. Leaves `self` untouched if `source` is unbound.
    pub fn initialize_from(&self, source: &Notifier) {
        if let Some(binding) = source.binding.read().clone() {
            *self.binding.write() = Some(binding);
        }
    }

    /// Whether `initialize_notifier` has been called.
    pub fn is_initialized(&self) -> bool {
        self.binding.read().is_some()
    }

    /// The key of the core this notifier belongs to.
    pub fn multiton_key(&self) -> Option<String> {
        self.binding.read().as_ref().map(|b| b.key.clone())
    }

    /// Resolve the facade, reporting why it is unavailable.
    pub fn try_facade(&self) -> Result<Arc<Facade>> {
        let guard = self.binding.read();
        let binding = guard.as_ref().ok_or(MvcError::NotifierUninitialized)?;
        binding.facade.upgrade().ok_or_else(|| MvcError::CoreRemoved {
            key: binding.key.clone(),
        })
    }

    /// The facade of the owning core.
    ///
    /// # Panics
    ///
    /// Panics if the notifier was never initialized or its core is gone; both
    /// are wiring bugs in the host application.
    pub fn facade(&self) -> Arc<Facade> {
        match self.try_facade() {
            Ok(facade) => facade,
            Err(err) => panic!("{err}"),
        }
    }

    /// Build a notification and broadcast it through the owning core.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`facade`](Self::facade).
    pub fn send_notification(
        &self,
        name: &str,
        body: Option<Payload>,
        kind: Option<&str>,
    ) -> Result<()> {
        self.facade().send_notification(name, body, kind)
    }

    /// Send a notification with only a name.
    pub fn send(&self, name: &str) -> Result<()> {
        self.send_notification(name, None, None)
    }

    /// Send a notification carrying `body`.
    pub fn send_with_body<T: Any + Send + Sync>(&self, name: &str, body: T) -> Result<()> {
        self.send_notification(name, Some(Payload::new(body)), None)
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("key", &self.multiton_key())
            .finish()
    }
}

/// Implemented by every actor that embeds a [`Notifier`].
///
/// Only [`notifier`](Self::notifier) is required; the rest forwards to it.
pub trait HasNotifier {
    /// The embedded notifier.
    fn notifier(&self) -> &Notifier;

    /// Bind this actor to a core.
    fn initialize_notifier(&self, key: &str, facade: Weak<Facade>) {
        self.notifier().initialize_notifier(key, facade);
    }

    /// The key of the core this actor belongs to.
    fn multiton_key(&self) -> Option<String> {
        self.notifier().multiton_key()
    }

    /// The facade of the owning core. Panics if unbound.
    fn facade(&self) -> Arc<Facade> {
        self.notifier().facade()
    }

    /// Broadcast a notification through the owning core. Panics if unbound.
    fn send_notification(&self, name: &str, body: Option<Payload>, kind: Option<&str>) -> Result<()> {
        self.notifier().send_notification(name, body, kind)
    }
}
