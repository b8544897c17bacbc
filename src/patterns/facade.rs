//! The Facade role: one entry point per core over its Model, View and Controller.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::core::{Controller, Model, View};
use crate::cores::Cores;
use crate::error::Result;
use crate::patterns::command::{Command, CommandFactory};
use crate::patterns::mediator::Mediator;
use crate::patterns::observer::Notification;
use crate::patterns::proxy::Proxy;
use crate::payload::Payload;

/// Application hooks run once, right after a core's facade is assembled.
///
/// Hooks are called in Model, Controller, View order with the core already
/// reachable through [`Cores::facade`], so they may register proxies,
/// commands and mediators and send notifications. All methods default to
/// no-ops.
pub trait FacadeInitializer: Send + Sync {
    /// Register the core's proxies.
    fn initialize_model(&self, _facade: &Arc<Facade>) {}

    /// Register the core's commands.
    fn initialize_controller(&self, _facade: &Arc<Facade>) {}

    /// Register the core's mediators.
    fn initialize_view(&self, _facade: &Arc<Facade>) {}
}

/// Initializer that registers nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInitializer;

impl FacadeInitializer for NoopInitializer {}

/// The coordinator of one core.
///
/// Owns its Model, View and Controller; they only point back at it weakly
/// through their notifiers. Every registration and notification call of the
/// application goes through here.
pub struct Facade {
    key: String,
    model: Arc<Model>,
    controller: Arc<Controller>,
    view: Arc<View>,
}

impl Facade {
    /// Fetch (or build) the three roles for `key` from `cores` and bind them
    /// to a new facade.
    pub(crate) fn assemble(cores: &Cores, key: &str) -> Arc<Self> {
        let model = cores.model(key);
        let controller = cores.controller(key);
        let view = cores.view(key);

        Arc::new_cyclic(|this| {
            model.attach_facade(this.clone());
            controller.attach_facade(this.clone());
            view.attach_facade(this.clone());
            Self {
                key: key.to_string(),
                model,
                controller,
                view,
            }
        })
    }

    /// The multiton key of this core.
    pub fn multiton_key(&self) -> &str {
        &self.key
    }

    /// The core's Model.
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// The core's View.
    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    /// The core's Controller.
    pub fn controller(&self) -> &Arc<Controller> {
        &self.controller
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Map `name` to a command factory. See [`Controller::register_command`].
    pub fn register_command<F>(&self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Command> + Send + Sync + 'static,
    {
        self.controller.register_command(name, factory);
    }

    /// Map `name` to an already shared command factory.
    pub fn register_command_factory(&self, name: &str, factory: CommandFactory) {
        self.controller.register_command_factory(name, factory);
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.controller.has_command(name)
    }

    pub fn remove_command(&self, name: &str) {
        self.controller.remove_command(name);
    }

    // -----------------------------------------------------------------------
    // Proxies
    // -----------------------------------------------------------------------

    /// Register a proxy. `false` if the name was taken and the duplicate was rejected.
    pub fn register_proxy(&self, proxy: Arc<dyn Proxy>) -> bool {
        self.model.register_proxy(proxy)
    }

    pub fn retrieve_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.model.retrieve_proxy(name)
    }

    pub fn has_proxy(&self, name: &str) -> bool {
        self.model.has_proxy(name)
    }

    pub fn remove_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.model.remove_proxy(name)
    }

    // -----------------------------------------------------------------------
    // Mediators
    // -----------------------------------------------------------------------

    /// Register a mediator. `false` if the name was taken and the duplicate was rejected.
    pub fn register_mediator(&self, mediator: Arc<dyn Mediator>) -> bool {
        self.view.register_mediator(mediator)
    }

    pub fn retrieve_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.view.retrieve_mediator(name)
    }

    pub fn has_mediator(&self, name: &str) -> bool {
        self.view.has_mediator(name)
    }

    pub fn remove_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.view.remove_mediator(name)
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    /// Broadcast an existing notification to the core's observers.
    pub fn notify_observers(&self, notification: &Notification) -> Result<()> {
        self.view.notify_observers(notification)
    }

    /// Build a notification and broadcast it.
    ///
    /// Commands and mediators interested in `name` run synchronously, in the
    /// order they were registered. The first error stops the broadcast.
    pub fn send_notification(
        &self,
        name: &str,
        body: Option<Payload>,
        kind: Option<&str>,
    ) -> Result<()> {
        let notification = Notification::with_parts(name, body, kind.map(str::to_string));
        self.notify_observers(&notification)
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

impl fmt::Debug for Facade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facade")
            .field("key", &self.key)
            .field("model", &self.model)
            .field("controller", &self.controller)
            .field("view", &self.view)
            .finish()
    }
}
