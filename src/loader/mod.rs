//! Rules file loader module
//!
//! Find, read and validate auth rules files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `FileConfigSource` - discovery of the rules file, reloaded on every call
//! - `load_config` / `load_config_from_str` - `${VAR}` substitution, YAML/JSON parsing
//! - `validate_config` - structural checks on rules

mod discovery;
mod parser;

pub use discovery::{FileConfigSource, CONFIG_ENV_VAR, CONFIG_FILE_NAMES};
pub use parser::{load_config, load_config_from_str, parse_config, validate_config, ConfigFormat};
