//! View adapters registered with the [`View`](crate::View).

use std::sync::Arc;

use parking_lot::RwLock;

use crate::patterns::observer::{HasNotifier, Notification, Notifier};
use crate::payload::{AsAny, Payload};

/// A named adapter between a view component and the rest of the core.
///
/// On registration the View subscribes the mediator to every name returned
/// by [`list_notification_interests`](Self::list_notification_interests) and
/// routes matching notifications to
/// [`handle_notification`](Self::handle_notification).
pub trait Mediator: HasNotifier + AsAny {
    /// Unique name within a core.
    fn name(&self) -> &str;

    /// The application-owned view component.
    fn view_component(&self) -> Option<Payload> {
        None
    }

    /// Replace the view component.
    fn set_view_component(&self, _view: Option<Payload>) {}

    /// Notification names this mediator wants to receive.
    fn list_notification_interests(&self) -> Vec<String> {
        Vec::new()
    }

    /// Handle one of the notifications listed as an interest.
    fn handle_notification(&self, _notification: &Notification) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called by the View right after the mediator is stored.
    fn on_register(&self) {}

    /// Called by the View right after the mediator is removed.
    fn on_remove(&self) {}
}

/// Recover the concrete type of a registered mediator.
pub fn downcast_mediator<M: Mediator>(mediator: &Arc<dyn Mediator>) -> Option<Arc<M>> {
    mediator.clone().into_any_arc().downcast::<M>().ok()
}

/// Ready-made mediator holding a name and a view component, with no interests.
#[derive(Debug)]
pub struct BaseMediator {
    name: String,
    view: RwLock<Option<Payload>>,
    notifier: Notifier,
}

impl BaseMediator {
    /// Name used when none is given.
    pub const NAME: &'static str = "Mediator";

    /// Create a mediator without a view component.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            view: RwLock::new(None),
            notifier: Notifier::new(),
        }
    }

    /// Create a mediator wrapping `view`.
    pub fn with_view(name: impl Into<String>, view: Payload) -> Self {
        let mediator = Self::new(name);
        *mediator.view.write() = Some(view);
        mediator
    }
}

impl Default for BaseMediator {
    fn default() -> Self {
        Self::new(Self::NAME)
    }
}

impl HasNotifier for BaseMediator {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Mediator for BaseMediator {
    fn name(&self) -> &str {
        &self.name
    }

    fn view_component(&self) -> Option<Payload> {
        self.view.read().clone()
    }

    fn set_view_component(&self, view: Option<Payload>) {
        *self.view.write() = view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_accessor() {
        assert_eq!(BaseMediator::new("TestMediator").name(), "TestMediator");
        assert_eq!(BaseMediator::default().name(), BaseMediator::NAME);
    }

    #[test]
    fn test_view_accessor() {
        let view = Arc::new(String::from("view component"));
        let mediator = BaseMediator::with_view("TestMediator", Payload::from_arc(view.clone()));

        let stored = mediator.view_component().unwrap().downcast_arc::<String>().unwrap();
        assert!(Arc::ptr_eq(&stored, &view));

        mediator.set_view_component(None);
        assert!(mediator.view_component().is_none());
    }

    #[test]
    fn test_defaults() {
        let mediator = BaseMediator::new("Quiet");
        assert!(mediator.list_notification_interests().is_empty());
        assert!(mediator
            .handle_notification(&Notification::new("Anything"))
            .is_ok());
    }

    #[test]
    fn test_downcast_mediator() {
        let mediator: Arc<dyn Mediator> = Arc::new(BaseMediator::new("concrete"));
        assert!(downcast_mediator::<BaseMediator>(&mediator).is_some());
    }
}
