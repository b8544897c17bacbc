//! The command contract and a closure-backed implementation.

use std::fmt;
use std::sync::Arc;

use crate::patterns::observer::{HasNotifier, Notification, Notifier};

/// A unit of work run in response to a notification.
///
/// The Controller builds a fresh instance for every dispatch and binds its
/// notifier before calling [`execute`](Self::execute), so commands may send
/// further notifications but should not expect state to survive between runs.
pub trait Command: HasNotifier {
    /// Run the command. Errors propagate to whoever sent the notification.
    fn execute(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Produces a fresh command per dispatch.
pub type CommandFactory = Arc<dyn Fn() -> Box<dyn Command> + Send + Sync>;

type CommandFn = Arc<dyn Fn(&SimpleCommand, &Notification) -> anyhow::Result<()> + Send + Sync>;

/// A command whose body is a closure.
///
/// The closure receives the command itself, giving it access to the notifier
/// (and through it the facade) of the core that dispatched it.
#[derive(Default)]
pub struct SimpleCommand {
    notifier: Notifier,
    handler: Option<CommandFn>,
}

impl SimpleCommand {
    /// A command that does nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// A command running `handler` on execute.
    pub fn from_fn<F>(handler: F) -> Self
    where
        F: Fn(&SimpleCommand, &Notification) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            notifier: Notifier::new(),
            handler: Some(Arc::new(handler)),
        }
    }

    /// A factory that builds a new `SimpleCommand` around `handler` on every call.
    pub fn factory<F>(handler: F) -> CommandFactory
    where
        F: Fn(&SimpleCommand, &Notification) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let handler: CommandFn = Arc::new(handler);
        Arc::new(move || {
            Box::new(SimpleCommand {
                notifier: Notifier::new(),
                handler: Some(handler.clone()),
            }) as Box<dyn Command>
        })
    }
}

impl HasNotifier for SimpleCommand {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Command for SimpleCommand {
    fn execute(&self, notification: &Notification) -> anyhow::Result<()> {
        match &self.handler {
            Some(handler) => handler(self, notification),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for SimpleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleCommand")
            .field("notifier", &self.notifier)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Value object a test command doubles in place.
    struct SimpleCommandTestVO {
        input: i32,
        result: Mutex<i32>,
    }

    #[test]
    fn test_simple_command_execute() {
        let vo = Arc::new(SimpleCommandTestVO {
            input: 5,
            result: Mutex::new(0),
        });
        let note = Notification::new("SimpleCommandTestNote").with_body(vo.clone());

        let command = SimpleCommand::from_fn(|_, note| {
            let vo = note
                .body::<Arc<SimpleCommandTestVO>>()
                .ok_or_else(|| anyhow::anyhow!("missing body"))?;
            *vo.result.lock() = vo.input * 2;
            Ok(())
        });
        command.execute(&note).unwrap();

        assert_eq!(*vo.result.lock(), 10);
    }

    #[test]
    fn test_noop_command() {
        assert!(SimpleCommand::new()
            .execute(&Notification::new("Anything"))
            .is_ok());
    }

    #[test]
    fn test_factory_builds_fresh_instances() {
        let factory = SimpleCommand::factory(|_, _| Ok(()));
        let a = factory();
        let b = factory();
        let a_ptr = &*a as *const dyn Command as *const ();
        let b_ptr = &*b as *const dyn Command as *const ();
        assert_ne!(a_ptr, b_ptr);
    }

    #[test]
    fn test_handler_error_propagates() {
        let command = SimpleCommand::from_fn(|_, _| anyhow::bail!("refused"));
        let err = command.execute(&Notification::new("Failing")).unwrap_err();
        assert_eq!(err.to_string(), "refused");
    }
}
