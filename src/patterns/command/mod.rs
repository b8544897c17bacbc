//! Commands: single units of work and ordered composites.

pub mod macro_command;
pub mod simple_command;

pub use macro_command::MacroCommand;
pub use simple_command::{Command, CommandFactory, SimpleCommand};
