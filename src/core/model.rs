//! The Model role: a core's proxy registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::config::{CoreConfig, DuplicatePolicy};
use crate::patterns::facade::Facade;
use crate::patterns::observer::Notifier;
use crate::patterns::proxy::Proxy;

/// Registry of the proxies of one core, keyed by proxy name.
///
/// Registered proxies get their notifier bound to this core so they can send
/// notifications. Obtain instances through [`Cores::model`](crate::Cores::model)
/// rather than constructing them directly.
pub struct Model {
    key: String,
    config: CoreConfig,
    proxy_map: RwLock<HashMap<String, Arc<dyn Proxy>>>,
    notifier: Notifier,
}

impl Model {
    /// Create a model for `key` with the default configuration.
    pub fn new(key: &str) -> Arc<Self> {
        Self::with_config(key, CoreConfig::default())
    }

    /// Create a model for `key`.
    pub fn with_config(key: &str, config: CoreConfig) -> Arc<Self> {
        let notifier = Notifier::new();
        notifier.initialize_notifier(key, Weak::new());
        Arc::new(Self {
            key: key.to_string(),
            config,
            proxy_map: RwLock::new(HashMap::new()),
            notifier,
        })
    }

    /// Point proxies registered from now on at `facade`.
    pub(crate) fn attach_facade(&self, facade: Weak<Facade>) {
        self.notifier.initialize_notifier(&self.key, facade);
    }

    /// The multiton key of this model.
    pub fn multiton_key(&self) -> &str {
        &self.key
    }

    /// Register a proxy under its name.
    ///
    /// Returns `false` when the name is taken and the policy is
    /// [`DuplicatePolicy::Reject`]; the new proxy is then ignored.
    pub fn register_proxy(&self, proxy: Arc<dyn Proxy>) -> bool {
        let name = proxy.name().to_string();
        if self.has_proxy(&name) {
            match self.config.proxy_policy {
                DuplicatePolicy::Reject => {
                    log::warn!("[Model:{}] proxy `{name}` already registered; ignoring", self.key);
                    return false;
                }
                DuplicatePolicy::Replace => {
                    log::debug!("[Model:{}] replacing proxy `{name}`", self.key);
                    self.remove_proxy(&name);
                }
            }
        }

        proxy.notifier().initialize_from(&self.notifier);
        self.proxy_map.write().insert(name.clone(), proxy.clone());
        log::debug!("[Model:{}] registered proxy `{name}`", self.key);
        proxy.on_register();
        true
    }

    /// Look up a proxy by name.
    pub fn retrieve_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.proxy_map.read().get(name).cloned()
    }

    /// Whether a proxy is registered under `name`.
    pub fn has_proxy(&self, name: &str) -> bool {
        self.proxy_map.read().contains_key(name)
    }

    /// Remove a proxy, calling its `on_remove` hook. `None` if it was absent.
    pub fn remove_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        let removed = self.proxy_map.write().remove(name)?;
        log::debug!("[Model:{}] removed proxy `{name}`", self.key);
        removed.on_remove();
        Some(removed)
    }

    /// Names of all registered proxies, in no particular order.
    pub fn proxy_names(&self) -> Vec<String> {
        self.proxy_map.read().keys().cloned().collect()
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("key", &self.key)
            .field("proxies", &self.proxy_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::observer::HasNotifier;
    use crate::patterns::proxy::{downcast_proxy, BaseProxy};
    use crate::payload::Payload;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Proxy counting its lifecycle hook calls.
    #[derive(Default)]
    struct ModelTestProxy {
        notifier: Notifier,
        registered: AtomicUsize,
        removed: AtomicUsize,
    }

    impl ModelTestProxy {
        const NAME: &'static str = "ModelTestProxy";
    }

    impl HasNotifier for ModelTestProxy {
        fn notifier(&self) -> &Notifier {
            &self.notifier
        }
    }

    impl Proxy for ModelTestProxy {
        fn name(&self) -> &str {
            Self::NAME
        }

        fn on_register(&self) {
            self.registered.fetch_add(1, Ordering::SeqCst);
        }

        fn on_remove(&self) {
            self.removed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_register_and_retrieve_proxy() {
        let model = Model::new("ModelTestKey1");
        model.register_proxy(Arc::new(BaseProxy::with_data(
            "colors",
            Payload::new(vec!["red", "green", "blue"]),
        )));

        let proxy = model.retrieve_proxy("colors").unwrap();
        let data = proxy.data().unwrap();
        assert_eq!(data.downcast_ref::<Vec<&str>>().unwrap(), &vec!["red", "green", "blue"]);
    }

    #[test]
    fn test_register_and_remove_proxy() {
        let model = Model::new("ModelTestKey2");
        model.register_proxy(Arc::new(BaseProxy::with_data(
            "sizes",
            Payload::new(vec![7, 13, 21]),
        )));

        let removed = model.remove_proxy("sizes").unwrap();
        assert_eq!(removed.name(), "sizes");
        assert!(model.retrieve_proxy("sizes").is_none());
    }

    #[test]
    fn test_has_proxy() {
        let model = Model::new("ModelTestKey3");
        model.register_proxy(Arc::new(BaseProxy::new("aces")));
        assert!(model.has_proxy("aces"));

        model.remove_proxy("aces");
        assert!(!model.has_proxy("aces"));
    }

    #[test]
    fn test_on_register_and_on_remove() {
        let model = Model::new("ModelTestKey4");
        let proxy = Arc::new(ModelTestProxy::default());
        model.register_proxy(proxy.clone());
        assert_eq!(proxy.registered.load(Ordering::SeqCst), 1);

        model.remove_proxy(ModelTestProxy::NAME);
        assert_eq!(proxy.removed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_proxy_twice_is_idempotent() {
        let model = Model::new("ModelTestKey5");
        let proxy = Arc::new(ModelTestProxy::default());
        model.register_proxy(proxy.clone());

        assert!(model.remove_proxy(ModelTestProxy::NAME).is_some());
        assert!(model.remove_proxy(ModelTestProxy::NAME).is_none());
        assert_eq!(proxy.removed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_rejected_by_default() {
        let model = Model::new("ModelTestKey6");
        let first = Arc::new(ModelTestProxy::default());
        let second = Arc::new(ModelTestProxy::default());

        assert!(model.register_proxy(first.clone()));
        assert!(!model.register_proxy(second.clone()));

        let stored = downcast_proxy::<ModelTestProxy>(&model.retrieve_proxy(ModelTestProxy::NAME).unwrap()).unwrap();
        assert!(Arc::ptr_eq(&stored, &first));
        assert_eq!(second.registered.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_duplicate_replaced_when_configured() {
        let config = CoreConfig::default().with_proxy_policy(DuplicatePolicy::Replace);
        let model = Model::with_config("ModelTestKey7", config);
        let first = Arc::new(ModelTestProxy::default());
        let second = Arc::new(ModelTestProxy::default());

        model.register_proxy(first.clone());
        assert!(model.register_proxy(second.clone()));

        assert_eq!(first.removed.load(Ordering::SeqCst), 1);
        let stored = downcast_proxy::<ModelTestProxy>(&model.retrieve_proxy(ModelTestProxy::NAME).unwrap()).unwrap();
        assert!(Arc::ptr_eq(&stored, &second));
    }

    #[test]
    fn test_registered_proxy_is_bound_to_key() {
        let model = Model::new("ModelTestKey8");
        let proxy = Arc::new(BaseProxy::new("bound"));
        assert!(proxy.multiton_key().is_none());

        model.register_proxy(proxy.clone());
        assert_eq!(proxy.multiton_key().as_deref(), Some("ModelTestKey8"));
    }
}
