//! The actors application code implements or uses: notifications and
//! observers, commands, proxies, mediators, and the facade.

pub mod command;
pub mod facade;
pub mod mediator;
pub mod observer;
pub mod proxy;

pub use command::{Command, CommandFactory, MacroCommand, SimpleCommand};
pub use facade::{Facade, FacadeInitializer, NoopInitializer};
pub use mediator::{downcast_mediator, BaseMediator, Mediator};
pub use observer::{HasNotifier, Notification, Notifier, Observer};
pub use proxy::{downcast_proxy, BaseProxy, Proxy};
