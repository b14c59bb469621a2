//! Rules file parser
//!
//! Reads a rules file, substitutes `${VAR}` references, parses YAML or JSON,
//! and validates the result.

use crate::auth::AuthMethod;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::template::{extract_env_refs, has_env_refs, substitute_env};
use std::fs;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Syntax of a rules file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// YAML (also accepts JSON, which is a subset)
    #[default]
    Yaml,
    /// Strict JSON
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension; anything but `.json` is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Load a config from a file path
pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config(format!("Config file not found: {}", path.display()))
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_config_from_str(&content, ConfigFormat::from_path(path))
}

/// Load a config from text, substituting `${VAR}` from the environment first
pub fn load_config_from_str(text: &str, format: ConfigFormat) -> Result<Config> {
    // Names only; values are secrets
    if has_env_refs(text) {
        debug!(vars = ?extract_env_refs(text), "Substituting environment references");
    }
    let text = substitute_env(text)?;
    parse_config(&text, format)
}

/// Parse and validate already-substituted text
pub fn parse_config(text: &str, format: ConfigFormat) -> Result<Config> {
    let config: Config = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(text)?,
        ConfigFormat::Json => serde_json::from_str(text)?,
    };

    validate_config(&config)?;
    Ok(config)
}

/// Validate a parsed config.
///
/// Regex syntax is not checked here; a bad regex only disables its own rule.
pub fn validate_config(config: &Config) -> Result<()> {
    for (index, rule) in config.auth_rules.iter().enumerate() {
        let at = |message: &str| Error::config(format!("auth_rules[{index}]: {message}"));

        if rule.url_pattern.is_empty() {
            return Err(at("url_pattern cannot be empty"));
        }

        match &rule.auth {
            AuthMethod::ApiKey { key, .. } if key.is_empty() => {
                return Err(at("api_key requires a non-empty key"));
            }
            AuthMethod::Function { provider } if provider.is_empty() => {
                return Err(at("function requires a provider name"));
            }
            AuthMethod::OAuth2(oauth) => {
                if Url::parse(&oauth.token_url).is_err() {
                    return Err(at(&format!(
                        "oauth2 token_url is not an absolute URL: {}",
                        oauth.token_url
                    )));
                }
                if oauth.client_id.is_empty() {
                    return Err(at("oauth2 requires a non-empty client_id"));
                }
            }
            _ => {}
        }
    }

    Ok(())
}
