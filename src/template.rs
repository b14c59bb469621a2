//! Environment interpolation for rules files
//!
//! Replaces `${VAR}` references with values from the process environment
//! before the text is parsed, so secrets can stay out of the file itself.
//! There is no escape syntax and no default-value form.

use crate::error::{Error, Result};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Regex for matching environment references: ${NAME}
static ENV_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Substitute `${VAR}` from the process environment
pub fn substitute_env(text: &str) -> Result<String> {
    substitute_with(text, |name| std::env::var(name).ok())
}

/// Substitute `${VAR}` using a custom lookup.
///
/// Fails on the first reference the lookup cannot resolve.
pub fn substitute_with<F>(text: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(missing) = ENV_REGEX
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .find(|name| lookup(name).is_none())
    {
        return Err(Error::MissingEnvVar { name: missing });
    }

    let result = ENV_REGEX.replace_all(text, |cap: &Captures<'_>| {
        lookup(&cap[1]).unwrap_or_default()
    });
    Ok(result.into_owned())
}

/// Check if a string contains environment references
pub fn has_env_refs(s: &str) -> bool {
    ENV_REGEX.is_match(s)
}

/// Extract all referenced variable names, in order of appearance
pub fn extract_env_refs(text: &str) -> Vec<String> {
    ENV_REGEX
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}
