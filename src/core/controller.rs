//! The Controller role: notification-name to command-factory dispatch.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::core::view::View;
use crate::error::{MvcError, Result};
use crate::patterns::command::{Command, CommandFactory};
use crate::patterns::facade::Facade;
use crate::patterns::observer::{Notification, Notifier, Observer};

/// Maps notification names to command factories for one core.
///
/// The controller observes its [`View`] for every mapped name, so commands
/// run through the same broadcast path as mediators and in the same relative
/// order as their registration. It holds the view weakly.
pub struct Controller {
    key: String,
    view: Weak<View>,
    command_map: RwLock<HashMap<String, CommandFactory>>,
    notifier: Notifier,
    this: Weak<Controller>,
}

impl Controller {
    /// Create a controller for `key` dispatching through `view`.
    pub fn new(key: &str, view: &Arc<View>) -> Arc<Self> {
        let notifier = Notifier::new();
        notifier.initialize_notifier(key, Weak::new());
        Arc::new_cyclic(|this| Self {
            key: key.to_string(),
            view: Arc::downgrade(view),
            command_map: RwLock::new(HashMap::new()),
            notifier,
            this: this.clone(),
        })
    }

    /// Point commands executed from now on at `facade`.
    pub(crate) fn attach_facade(&self, facade: Weak<Facade>) {
        self.notifier.initialize_notifier(&self.key, facade);
    }

    /// The multiton key of this controller.
    pub fn multiton_key(&self) -> &str {
        &self.key
    }

    /// Map `name` to `factory`.
    ///
    /// The first registration for a name also subscribes the controller to it;
    /// later registrations only replace the factory.
    pub fn register_command<F>(&self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Command> + Send + Sync + 'static,
    {
        self.register_command_factory(name, Arc::new(factory));
    }

    /// Map `name` to an already shared factory.
    pub fn register_command_factory(&self, name: &str, factory: CommandFactory) {
        let previous = self.command_map.write().insert(name.to_string(), factory);
        if previous.is_some() {
            log::debug!("[Controller:{}] replaced command for `{name}`", self.key);
            return;
        }

        match self.view.upgrade() {
            Some(view) => {
                let observer = Observer::from_weak(
                    self.this.clone(),
                    |controller: &Controller, note: &Notification| controller.execute_command(note),
                );
                view.register_observer(name, observer);
            }
            None => log::warn!(
                "[Controller:{}] view is gone; `{name}` will not be dispatched",
                self.key
            ),
        }
        log::debug!("[Controller:{}] registered command for `{name}`", self.key);
    }

    /// Build and run the command mapped to `notification.name()`, if any.
    pub fn execute_command(&self, notification: &Notification) -> Result<()> {
        let factory = match self.command_map.read().get(notification.name()) {
            Some(factory) => factory.clone(),
            None => return Ok(()),
        };

        log::trace!(
            "[Controller:{}] executing command for `{}`",
            self.key,
            notification.name()
        );
        let command = factory();
        command.notifier().initialize_from(&self.notifier);
        command
            .execute(notification)
            .map_err(|source| MvcError::Command {
                notification: notification.name().to_string(),
                source,
            })
    }

    /// Whether a command is mapped to `name`.
    pub fn has_command(&self, name: &str) -> bool {
        self.command_map.read().contains_key(name)
    }

    /// Drop the mapping for `name` and unsubscribe the controller from it.
    pub fn remove_command(&self, name: &str) {
        if self.command_map.write().remove(name).is_none() {
            return;
        }
        if let Some(view) = self.view.upgrade() {
            view.remove_observer(name, self);
        }
        log::debug!("[Controller:{}] removed command for `{name}`", self.key);
    }

    /// Names with a mapped command, in no particular order.
    pub fn command_names(&self) -> Vec<String> {
        self.command_map.read().keys().cloned().collect()
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("key", &self.key)
            .field("commands", &self.command_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::command::SimpleCommand;
    use crate::patterns::observer::HasNotifier;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Value object passed as the body of controller test notifications.
    #[derive(Default)]
    struct ControllerTestVO {
        input: i32,
        result: Mutex<i32>,
        names: Mutex<Vec<String>>,
    }

    fn vo(input: i32) -> Arc<ControllerTestVO> {
        Arc::new(ControllerTestVO {
            input,
            ..Default::default()
        })
    }

    /// Doubles the input into the result.
    #[derive(Default)]
    struct ControllerTestCommand {
        notifier: Notifier,
    }

    impl HasNotifier for ControllerTestCommand {
        fn notifier(&self) -> &Notifier {
            &self.notifier
        }
    }

    impl Command for ControllerTestCommand {
        fn execute(&self, notification: &Notification) -> anyhow::Result<()> {
            let vo = notification
                .body::<Arc<ControllerTestVO>>()
                .ok_or_else(|| anyhow::anyhow!("missing ControllerTestVO"))?;
            *vo.result.lock() = 2 * vo.input;
            vo.names.lock().push(notification.name().to_string());
            Ok(())
        }
    }

    /// Adds the doubled input to the result, so repeated runs accumulate.
    #[derive(Default)]
    struct ControllerTestCommand2 {
        notifier: Notifier,
    }

    impl HasNotifier for ControllerTestCommand2 {
        fn notifier(&self) -> &Notifier {
            &self.notifier
        }
    }

    impl Command for ControllerTestCommand2 {
        fn execute(&self, notification: &Notification) -> anyhow::Result<()> {
            let vo = notification
                .body::<Arc<ControllerTestVO>>()
                .ok_or_else(|| anyhow::anyhow!("missing ControllerTestVO"))?;
            *vo.result.lock() += 2 * vo.input;
            Ok(())
        }
    }

    fn controller(key: &str) -> (Arc<View>, Arc<Controller>) {
        let view = View::new(key);
        let controller = Controller::new(key, &view);
        (view, controller)
    }

    #[test]
    fn test_register_and_execute_command() {
        let (_view, controller) = controller("ControllerTestKey1");
        controller.register_command("ControllerTest", || Box::new(ControllerTestCommand::default()));

        let vo = vo(12);
        controller
            .execute_command(&Notification::new("ControllerTest").with_body(vo.clone()))
            .unwrap();
        assert_eq!(*vo.result.lock(), 24);
    }

    #[test]
    fn test_send_through_view_constructs_one_command() {
        let (view, controller) = controller("ControllerTestKey2");
        let built = Arc::new(AtomicUsize::new(0));
        let counter = built.clone();
        controller.register_command("N", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(ControllerTestCommand::default())
        });

        let vo = vo(3);
        view.notify_observers(&Notification::new("N").with_body(vo.clone()))
            .unwrap();

        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert_eq!(*vo.names.lock(), vec!["N".to_string()]);
    }

    #[test]
    fn test_fresh_command_per_dispatch() {
        let (view, controller) = controller("ControllerTestKey3");
        let built = Arc::new(AtomicUsize::new(0));
        let counter = built.clone();
        controller.register_command("N", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(ControllerTestCommand2::default())
        });

        let vo = vo(12);
        let note = Notification::new("N").with_body(vo.clone());
        view.notify_observers(&note).unwrap();
        view.notify_observers(&note).unwrap();

        assert_eq!(built.load(Ordering::SeqCst), 2);
        assert_eq!(*vo.result.lock(), 48);
    }

    #[test]
    fn test_has_and_remove_command() {
        let (view, controller) = controller("ControllerTestKey4");
        controller.register_command("hasCommandTest", || Box::new(ControllerTestCommand::default()));
        assert!(controller.has_command("hasCommandTest"));
        assert_eq!(view.observer_count("hasCommandTest"), 1);

        controller.remove_command("hasCommandTest");
        assert!(!controller.has_command("hasCommandTest"));
        assert!(!view.has_observers("hasCommandTest"));
    }

    #[test]
    fn test_removed_command_is_not_executed() {
        let (view, controller) = controller("ControllerTestKey5");
        controller.register_command("N", || Box::new(ControllerTestCommand::default()));
        controller.register_command("Other", || Box::new(ControllerTestCommand::default()));
        controller.remove_command("N");

        let vo = vo(1);
        view.notify_observers(&Notification::new("N").with_body(vo.clone()))
            .unwrap();
        assert!(vo.names.lock().is_empty());

        view.notify_observers(&Notification::new("Other").with_body(vo.clone()))
            .unwrap();
        assert_eq!(*vo.names.lock(), vec!["Other".to_string()]);
    }

    #[test]
    fn test_reregister_replaces_without_second_observer() {
        let (view, controller) = controller("ControllerTestKey6");
        controller.register_command("N", || Box::new(ControllerTestCommand::default()));
        controller.register_command("N", || Box::new(ControllerTestCommand2::default()));
        assert_eq!(view.observer_count("N"), 1);

        let vo = vo(5);
        view.notify_observers(&Notification::new("N").with_body(vo.clone()))
            .unwrap();
        // Only the replacement ran: it accumulates, the original would have recorded the name.
        assert_eq!(*vo.result.lock(), 10);
        assert!(vo.names.lock().is_empty());
    }

    #[test]
    fn test_reregister_after_remove() {
        let (view, controller) = controller("ControllerTestKey7");
        controller.register_command("N", || Box::new(ControllerTestCommand2::default()));
        controller.remove_command("N");
        controller.register_command("N", || Box::new(ControllerTestCommand2::default()));

        let vo = vo(12);
        view.notify_observers(&Notification::new("N").with_body(vo.clone()))
            .unwrap();
        assert_eq!(*vo.result.lock(), 24);
    }

    #[test]
    fn test_command_error_wrapped() {
        let (view, controller) = controller("ControllerTestKey8");
        controller.register_command_factory("N", SimpleCommand::factory(|_, _| anyhow::bail!("nope")));

        let err = view.notify_observers(&Notification::new("N")).unwrap_err();
        match err {
            MvcError::Command { notification, source } => {
                assert_eq!(notification, "N");
                assert_eq!(source.to_string(), "nope");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_command_bound_to_controller_key() {
        let (view, controller) = controller("ControllerTestKey9");
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        controller.register_command_factory(
            "N",
            SimpleCommand::factory(move |command, _| {
                *sink.lock() = command.multiton_key();
                Ok(())
            }),
        );

        view.notify_observers(&Notification::new("N")).unwrap();
        assert_eq!(seen.lock().as_deref(), Some("ControllerTestKey9"));
    }
}
