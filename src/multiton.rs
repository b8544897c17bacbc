//! Keyed singleton store with lazy, factory-driven construction.
//!
//! One [`MultitonRegistry`] exists per component kind (model, view,
//! controller, facade) inside a [`Cores`](crate::Cores). Each key maps to at
//! most one live instance.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Mapping from key to a lazily constructed, shared `T`.
///
/// The internal lock is only held for lookups and inserts, never while the
/// factory runs, so a factory may itself consult other registries (or this
/// one, for a different key).
pub struct MultitonRegistry<T: ?Sized> {
    instances: Mutex<HashMap<String, Arc<T>>>,
}

impl<T: ?Sized> Default for MultitonRegistry<T> {
    fn default() -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: ?Sized> MultitonRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the instance for `key`, constructing it with `factory` if absent.
    ///
    /// The factory runs at most once per key while the entry lives. If the
    /// factory re-entrantly created an entry for the same key, that entry wins
    /// and the factory's result is discarded.
    pub fn get_instance<F>(&self, key: &str, factory: F) -> Arc<T>
    where
        F: FnOnce(&str) -> Arc<T>,
    {
        if let Some(existing) = self.instances.lock().get(key) {
            return existing.clone();
        }

        let created = factory(key);

        let mut instances = self.instances.lock();
        match instances.get(key) {
            Some(existing) => {
                log::warn!(
                    "[MultitonRegistry] instance for key `{key}` appeared during construction; keeping the first"
                );
                existing.clone()
            }
            None => {
                instances.insert(key.to_string(), created.clone());
                created
            }
        }
    }

    /// Look up the instance for `key` without constructing one.
    pub fn retrieve(&self, key: &str) -> Option<Arc<T>> {
        self.instances.lock().get(key).cloned()
    }

    /// Whether an instance exists for `key`.
    pub fn has(&self, key: &str) -> bool {
        self.instances.lock().contains_key(key)
    }

    /// Forget the instance for `key`, returning it if present.
    ///
    /// The instance is dropped once the last outside handle goes away.
    pub fn remove(&self, key: &str) -> Option<Arc<T>> {
        self.instances.lock().remove(key)
    }

    /// All keys with a live instance, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.instances.lock().keys().cloned().collect()
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.instances.lock().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.instances.lock().is_empty()
    }
}

impl<T: ?Sized> fmt::Debug for MultitonRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultitonRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
