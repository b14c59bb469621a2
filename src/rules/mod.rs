//! Rule matching module
//!
//! Maps a request URL to at most one [`AuthRule`].
//!
//! # Pattern kinds
//!
//! - `/^api\.example\.com$/` - regex (tried first)
//! - `api.example.com:8443` - exact `host[:port]`
//! - `*.example.com`, `*` - glob (tried last; bare `*` is a catch-all)

mod matcher;
mod types;

pub use matcher::{find_matching_rule, RuleMatcher};
pub use types::{AuthRule, PatternKind};

#[cfg(test)]
mod tests;
