//! Rules file discovery
//!
//! Search order:
//! 1. an explicit path (`--config`)
//! 2. `$AUTH_FETCH_CONFIG`
//! 3. `auth-rules.{yaml,yml,json}` in the working directory
//! 4. `auth-rules.{yaml,yml,json}` under `<config dir>/auth-fetch/`

use super::parser::load_config;
use crate::config::{Config, ConfigSource};
use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing::debug;

/// Environment variable naming the rules file
pub const CONFIG_ENV_VAR: &str = "AUTH_FETCH_CONFIG";

/// File names probed in each search directory
pub const CONFIG_FILE_NAMES: [&str; 3] = ["auth-rules.yaml", "auth-rules.yml", "auth-rules.json"];

/// Subdirectory of the user config dir
const APP_DIR: &str = "auth-fetch";

/// Loads the rules file from disk on every call
#[derive(Debug, Clone, Default)]
pub struct FileConfigSource {
    explicit: Option<PathBuf>,
    env_path: Option<PathBuf>,
    search_dirs: Vec<PathBuf>,
}

impl FileConfigSource {
    /// Standard discovery, optionally pinned to an explicit path
    pub fn new(explicit: Option<PathBuf>) -> Self {
        let env_path = std::env::var_os(CONFIG_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let mut search_dirs = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            search_dirs.push(cwd);
        }
        if let Some(dir) = dirs::config_dir() {
            search_dirs.push(dir.join(APP_DIR));
        }

        Self {
            explicit,
            env_path,
            search_dirs,
        }
    }

    /// Always load from this path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            explicit: Some(path.into()),
            ..Default::default()
        }
    }

    /// Search only the given directories (no explicit path, no env var)
    pub fn with_search_dirs(dirs: Vec<PathBuf>) -> Self {
        Self {
            search_dirs: dirs,
            ..Default::default()
        }
    }

    /// Resolve the rules file path without reading it.
    ///
    /// An explicit or env path is returned even if it does not exist, so the
    /// load error names it.
    pub fn resolve(&self) -> Option<PathBuf> {
        if let Some(ref path) = self.explicit {
            return Some(path.clone());
        }
        if let Some(ref path) = self.env_path {
            return Some(path.clone());
        }
        self.search_dirs
            .iter()
            .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
            .find(|candidate| candidate.is_file())
    }

    fn searched(&self) -> String {
        self.search_dirs
            .iter()
            .map(|dir| dir.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> Result<Config> {
        let path = self.resolve().ok_or_else(|| {
            Error::config(format!(
                "No config file found. Set {CONFIG_ENV_VAR}, pass --config, or create one of {} in: {}",
                CONFIG_FILE_NAMES.join(", "),
                self.searched()
            ))
        })?;

        debug!(path = %path.display(), "Loading auth rules");
        load_config(&path)
    }

    fn location(&self) -> Option<PathBuf> {
        self.resolve()
    }
}
