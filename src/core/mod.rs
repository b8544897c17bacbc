//! The three roles every core is made of.
//!
//! A [`Model`] keeps proxies, a [`View`] keeps observers and mediators, and a
//! [`Controller`] maps notification names to commands. They are usually
//! reached through a [`Facade`](crate::Facade) rather than directly.

pub mod controller;
pub mod model;
pub mod view;

pub use controller::Controller;
pub use model::Model;
pub use view::View;
