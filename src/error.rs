//! Error types for the multicore framework.
//!
//! Absent lookups are never errors: registries answer them with `Option` or
//! `bool`. The variants below cover wiring mistakes, failures raised by
//! application handlers, and configuration loading.

use thiserror::Error;

/// Errors produced by the cores, their notifiers and their configuration.
#[derive(Debug, Error)]
pub enum MvcError {
    /// A notifier was asked for its facade before `initialize_notifier` ran.
    #[error("notifier used before initialize_notifier was called")]
    NotifierUninitialized,

    /// The facade a notifier is bound to no longer exists.
    #[error("core `{key}` has been removed")]
    CoreRemoved { key: String },

    /// A command's `execute` returned an error.
    #[error("command for notification `{notification}` failed: {source}")]
    Command {
        notification: String,
        #[source]
        source: anyhow::Error,
    },

    /// A mediator's `handle_notification` returned an error.
    #[error("mediator `{mediator}` failed handling `{notification}`: {source}")]
    Mediator {
        mediator: String,
        notification: String,
        #[source]
        source: anyhow::Error,
    },

    /// A plain observer callback returned an error.
    #[error("observer of `{notification}` failed: {source}")]
    Observer {
        notification: String,
        #[source]
        source: anyhow::Error,
    },

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration JSON could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used across the crate.
pub type Result<T, E = MvcError> = std::result::Result<T, E>;
