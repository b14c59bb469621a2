//! Configuration types
//!
//! A [`Config`] is the validated content of a rules file. Sources hand out a
//! fresh one on every load; nothing mutates a loaded config.

use crate::error::Result;
use crate::http::DEFAULT_TIMEOUT_MS;
use crate::rules::AuthRule;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Rules plus process-wide settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Authentication rules, in declaration order
    #[serde(default)]
    pub auth_rules: Vec<AuthRule>,

    /// Settings applied to every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_settings: Option<GlobalSettings>,
}

impl Config {
    /// Create a config from rules alone
    pub fn new(auth_rules: Vec<AuthRule>) -> Self {
        Self {
            auth_rules,
            global_settings: None,
        }
    }

    /// Attach global settings
    #[must_use]
    pub fn with_settings(mut self, settings: GlobalSettings) -> Self {
        self.global_settings = Some(settings);
        self
    }

    /// Global settings, or the defaults when the file has none
    pub fn settings(&self) -> GlobalSettings {
        self.global_settings.clone().unwrap_or_default()
    }
}

// ============================================================================
// Global Settings
// ============================================================================

/// Process-wide request settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Timeout in milliseconds when the caller gives none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_timeout: Option<u64>,

    /// Retries after a connection failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// User-Agent set on every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Show secrets in `test-auth` output
    #[serde(default)]
    pub verbose_test_auth: bool,
}

impl GlobalSettings {
    /// Resolve the effective timeout: per-call, then configured, then 30s
    pub fn effective_timeout(&self, per_call_ms: Option<u64>) -> Duration {
        Duration::from_millis(
            per_call_ms
                .or(self.default_timeout)
                .unwrap_or(DEFAULT_TIMEOUT_MS),
        )
    }

    /// Configured retry budget (0 when unset)
    pub fn retries(&self) -> u32 {
        self.max_retries.unwrap_or(0)
    }
}

// ============================================================================
// Config Sources
// ============================================================================

/// Somewhere a [`Config`] can be loaded from
pub trait ConfigSource: Send + Sync {
    /// Load and validate the configuration
    fn load(&self) -> Result<Config>;

    /// Where the configuration lives, if it has a location
    fn location(&self) -> Option<PathBuf>;
}

/// In-memory config source
#[derive(Debug, Clone, Default)]
pub struct StaticConfigSource {
    config: Config,
}

impl StaticConfigSource {
    /// Wrap a config
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigSource for StaticConfigSource {
    fn load(&self) -> Result<Config> {
        Ok(self.config.clone())
    }

    fn location(&self) -> Option<PathBuf> {
        None
    }
}
