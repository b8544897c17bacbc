//! # PureMVC MultiCore for Rust
//!
//! A model-view-controller framework where each independent *core* is
//! identified by a string key and consists of a [`Model`] (proxies), a
//! [`View`] (observers and mediators), a [`Controller`] (commands) and a
//! [`Facade`] tying them together.
//!
//! Cores live in a [`Cores`] registry. Application actors embed a
//! [`Notifier`] to reach their core and talk to each other only through
//! [`Notification`]s broadcast by the View. Dispatch is synchronous and
//! re-entrant: a command or mediator may send further notifications while
//! handling one.
//!
//! ```
//! use std::sync::Arc;
//! use puremvc::{BaseProxy, Cores, HasNotifier, Payload, SimpleCommand};
//!
//! let cores = Cores::new();
//! let facade = cores.facade("app");
//!
//! facade.register_proxy(Arc::new(BaseProxy::with_data("greeting", Payload::new("hello"))));
//! facade.register_command_factory(
//!     "Greet",
//!     SimpleCommand::factory(|command, _note| {
//!         let proxy = command.facade().retrieve_proxy("greeting").expect("registered above");
//!         assert!(proxy.data().is_some());
//!         Ok(())
//!     }),
//! );
//! facade.send("Greet").unwrap();
//! ```

pub mod config;
pub mod core;
pub mod cores;
pub mod error;
pub mod multiton;
pub mod patterns;
pub mod payload;

pub use config::{CoreConfig, DuplicatePolicy};
pub use core::{Controller, Model, View};
pub use cores::{CoreState, Cores};
pub use error::{MvcError, Result};
pub use multiton::MultitonRegistry;
pub use patterns::command::{Command, CommandFactory, MacroCommand, SimpleCommand};
pub use patterns::facade::{Facade, FacadeInitializer, NoopInitializer};
pub use patterns::mediator::{downcast_mediator, BaseMediator, Mediator};
pub use patterns::observer::{HasNotifier, Notification, Notifier, Observer};
pub use patterns::proxy::{downcast_proxy, BaseProxy, Proxy};
pub use payload::{AsAny, Payload};
