//! A command that runs an ordered list of sub-commands.

use std::fmt;
use std::sync::Arc;

use anyhow::Context;

use crate::patterns::observer::{HasNotifier, Notification, Notifier};

use super::simple_command::{Command, CommandFactory};

/// Composite command executing its sub-commands first-in, first-out.
///
/// Sub-commands are added by the initialization closure passed to
/// [`new`](Self::new), before the macro can be executed. Each sub-command is
/// built fresh, bound to the macro's core, and given the same notification.
/// The first failing sub-command stops the sequence.
pub struct MacroCommand {
    sub_commands: Vec<CommandFactory>,
    notifier: Notifier,
}

impl MacroCommand {
    /// Build a macro command, letting `initialize` register its sub-commands.
    pub fn new(initialize: impl FnOnce(&mut MacroCommand)) -> Self {
        let mut command = Self {
            sub_commands: Vec::new(),
            notifier: Notifier::new(),
        };
        initialize(&mut command);
        command
    }

    /// Append a sub-command factory.
    pub fn add_sub_command<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn Command> + Send + Sync + 'static,
    {
        self.sub_commands.push(Arc::new(factory));
    }

    /// Append an already shared factory.
    pub fn add_sub_command_factory(&mut self, factory: CommandFactory) {
        self.sub_commands.push(factory);
    }

    /// Number of registered sub-commands.
    pub fn sub_command_count(&self) -> usize {
        self.sub_commands.len()
    }
}

impl HasNotifier for MacroCommand {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Command for MacroCommand {
    fn execute(&self, notification: &Notification) -> anyhow::Result<()> {
        for (index, factory) in self.sub_commands.iter().enumerate() {
            let command = factory();
            command.notifier().initialize_from(&self.notifier);
            command.execute(notification).with_context(|| {
                format!(
                    "sub-command {} of {} failed for `{}`",
                    index + 1,
                    self.sub_commands.len(),
                    notification.name()
                )
            })?;
        }
        Ok(())
    }
}

impl fmt::Debug for MacroCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacroCommand")
            .field("sub_commands", &self.sub_commands.len())
            .field("notifier", &self.notifier)
            .finish()
    }
}
