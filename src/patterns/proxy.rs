//! Named data holders registered with the [`Model`](crate::Model).

use std::sync::Arc;

use parking_lot::RwLock;

use crate::patterns::observer::{HasNotifier, Notifier};
use crate::payload::{AsAny, Payload};

/// A named holder of application data.
///
/// Proxies are shared (`Arc<dyn Proxy>`), so every method takes `&self`;
/// implementors that mutate state use interior mutability.
pub trait Proxy: HasNotifier + AsAny {
    /// Unique name within a core.
    fn name(&self) -> &str;

    /// The data object, if this proxy exposes one generically.
    fn data(&self) -> Option<Payload> {
        None
    }

    /// Replace the data object.
    fn set_data(&self, _data: Option<Payload>) {}

    /// Called by the Model right after the proxy is stored.
    fn on_register(&self) {}

    /// Called by the Model right after the proxy is removed.
    fn on_remove(&self) {}
}

/// Recover the concrete type of a registered proxy.
pub fn downcast_proxy<P: Proxy>(proxy: &Arc<dyn Proxy>) -> Option<Arc<P>> {
    proxy.clone().into_any_arc().downcast::<P>().ok()
}

/// Ready-made proxy holding a name and a type-erased data object.
#[derive(Debug)]
pub struct BaseProxy {
    name: String,
    data: RwLock<Option<Payload>>,
    notifier: Notifier,
}

impl BaseProxy {
    /// Name used when none is given.
    pub const NAME: &'static str = "Proxy";

    /// Create a proxy with no data.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: RwLock::new(None),
            notifier: Notifier::new(),
        }
    }

    /// Create a proxy holding `data`.
    pub fn with_data(name: impl Into<String>, data: Payload) -> Self {
        let proxy = Self::new(name);
        *proxy.data.write() = Some(data);
        proxy
    }
}

impl Default for BaseProxy {
    fn default() -> Self {
        Self::new(Self::NAME)
    }
}

impl HasNotifier for BaseProxy {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Proxy for BaseProxy {
    fn name(&self) -> &str {
        &self.name
    }

    fn data(&self) -> Option<Payload> {
        self.data.read().clone()
    }

    fn set_data(&self, data: Option<Payload>) {
        *self.data.write() = data;
    }
}
