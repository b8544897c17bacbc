//! Core configuration.
//!
//! Controls what the Model and View do when a proxy or mediator is registered
//! under a name that is already taken.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MvcError, Result};

/// Environment variable consulted by [`CoreConfig::from_env`] for proxies.
pub const PROXY_POLICY_ENV: &str = "PUREMVC_PROXY_POLICY";

/// Environment variable consulted by [`CoreConfig::from_env`] for mediators.
pub const MEDIATOR_POLICY_ENV: &str = "PUREMVC_MEDIATOR_POLICY";

/// What to do when a name is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the existing entry; the new registration is a no-op.
    #[default]
    Reject,
    /// Remove the existing entry (running its `on_remove`) and register the new one.
    Replace,
}

impl FromStr for DuplicatePolicy {
    type Err = MvcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "replace" => Ok(Self::Replace),
            other => Err(MvcError::Config(format!(
                "unknown duplicate policy `{other}` (expected `reject` or `replace`)"
            ))),
        }
    }
}

/// Configuration shared by every core built from one [`Cores`](crate::Cores).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Policy applied by `Model::register_proxy`.
    #[serde(default)]
    pub proxy_policy: DuplicatePolicy,
    /// Policy applied by `View::register_mediator`.
    #[serde(default)]
    pub mediator_policy: DuplicatePolicy,
}

impl CoreConfig {
    /// Create a config with the default (reject) policies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a config from `PUREMVC_PROXY_POLICY` / `PUREMVC_MEDIATOR_POLICY`.
    ///
    /// Unset variables keep their defaults; unrecognised values are an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(value) = lookup(PROXY_POLICY_ENV) {
            config.proxy_policy = value.parse()?;
        }
        if let Some(value) = lookup(MEDIATOR_POLICY_ENV) {
            config.mediator_policy = value.parse()?;
        }
        Ok(config)
    }

    /// Set the proxy policy (builder pattern).
    pub fn with_proxy_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.proxy_policy = policy;
        self
    }

    /// Set the mediator policy (builder pattern).
    pub fn with_mediator_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.mediator_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reject() {
        let config = CoreConfig::default();
        assert_eq!(config.proxy_policy, DuplicatePolicy::Reject);
        assert_eq!(config.mediator_policy, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_from_json_partial() {
        let config = CoreConfig::from_json(r#"{"mediator_policy": "replace"}"#).unwrap();
        assert_eq!(config.proxy_policy, DuplicatePolicy::Reject);
        assert_eq!(config.mediator_policy, DuplicatePolicy::Replace);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = CoreConfig::from_json(r#"{"proxy_policy": "sometimes"}"#).unwrap_err();
        assert!(matches!(err, MvcError::Json(_)));
    }

    #[test]
    fn test_from_lookup() {
        let config = CoreConfig::from_lookup(|var| match var {
            PROXY_POLICY_ENV => Some("Replace".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.proxy_policy, DuplicatePolicy::Replace);
        assert_eq!(config.mediator_policy, DuplicatePolicy::Reject);

        let err = CoreConfig::from_lookup(|_| Some("nope".to_string())).unwrap_err();
        assert!(matches!(err, MvcError::Config(_)));
    }

    #[test]
    fn test_from_env_reads_mediator_policy() {
        // Only this test sets the variable, and to a valid value, so a concurrent
        // `Cores::global` initialization still succeeds.
        std::env::set_var(MEDIATOR_POLICY_ENV, "REPLACE");
        let config = CoreConfig::from_env();
        std::env::remove_var(MEDIATOR_POLICY_ENV);

        assert_eq!(config.unwrap().mediator_policy, DuplicatePolicy::Replace);
    }
}
