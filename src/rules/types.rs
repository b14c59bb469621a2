//! Rule types

use crate::auth::AuthMethod;
use serde::{Deserialize, Serialize};

/// Binds a URL pattern to the credential applied to matching requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRule {
    /// Pattern matched against the request's `host[:port]`
    pub url_pattern: String,
    /// Credential to apply
    pub auth: AuthMethod,
    /// Free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Disabled rules never match
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl AuthRule {
    /// Create an enabled rule
    pub fn new(url_pattern: impl Into<String>, auth: AuthMethod) -> Self {
        Self {
            url_pattern: url_pattern.into(),
            auth,
            description: None,
            enabled: true,
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the rule as disabled
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// How the pattern is interpreted
    pub fn pattern_kind(&self) -> PatternKind {
        PatternKind::classify(&self.url_pattern)
    }

    /// Copy of the rule with secrets masked
    pub fn masked(&self) -> AuthRule {
        AuthRule {
            auth: self.auth.masked(),
            ..self.clone()
        }
    }
}

/// Pattern tiers, in match precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternKind {
    /// `/.../` regular expression
    Regex,
    /// Literal `host[:port]`
    Exact,
    /// Shell-style glob with `*`
    Glob,
}

impl PatternKind {
    /// Classify a pattern: leading `/` is a regex, any `*` a glob, else a literal
    pub fn classify(pattern: &str) -> Self {
        if pattern.starts_with('/') {
            PatternKind::Regex
        } else if pattern.contains('*') {
            PatternKind::Glob
        } else {
            PatternKind::Exact
        }
    }
}
