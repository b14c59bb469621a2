// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # auth-fetch
//!
//! Authenticated HTTP fetching driven by a rules file. Each rule maps a
//! domain pattern to a credential; a request picks up the credential of the
//! most specific matching rule and goes out with it attached.
//!
//! ## Features
//!
//! - **Domain Rules**: Regex, exact and glob patterns with fixed precedence
//! - **Auth Kinds**: Bearer, API key (header or query), Basic, Cookie, OAuth2, named providers
//! - **OAuth2 Token Cache**: Client-credentials and refresh-token grants, shared across calls
//! - **Env Substitution**: `${VAR}` references resolved at load
//! - **Hot Reload**: The rules file is re-read on every call
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use auth_fetch::{Dispatcher, FetchRequest, FileConfigSource};
//!
//! #[tokio::main]
//! async fn main() {
//!     let dispatcher = Dispatcher::new(FileConfigSource::new(None));
//!
//!     let body = dispatcher
//!         .fetch_url(&FetchRequest::get("https://api.github.com/user"))
//!         .await;
//!     println!("{body}");
//!
//!     let report = dispatcher.test_auth("https://api.github.com/user");
//!     println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          Dispatcher                           │
//! │   fetch_url(request) → body | error     test_auth(url) → rule │
//! └───────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌───────────┬──────────────┬────┴────────┬──────────────────────┐
//! │  Loader   │    Rules     │    Auth     │        HTTP          │
//! ├───────────┼──────────────┼─────────────┼──────────────────────┤
//! │ Discovery │ Regex        │ Bearer      │ Transport trait      │
//! │ YAML/JSON │ Exact        │ API Key     │ Timeout              │
//! │ ${VAR}    │ Glob         │ OAuth2      │ Connect retries      │
//! │ Validate  │ Precedence   │ Providers   │                      │
//! └───────────┴──────────────┴─────────────┴──────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// URL domain extraction
pub mod domain;

/// HTTP request model and transport
pub mod http;

/// Credential kinds, OAuth2 tokens and masking
pub mod auth;

/// Auth rules and pattern matching
pub mod rules;

/// Config model and sources
pub mod config;

/// Rules file discovery and parsing
pub mod loader;

/// `${VAR}` substitution
pub mod template;

/// `fetch_url` and `test_auth`
pub mod dispatch;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

pub use auth::{AuthMethod, Credential, CredentialProvider, Location, OAuth2Auth};
pub use config::{Config, ConfigSource, GlobalSettings, StaticConfigSource};
pub use dispatch::{Dispatcher, DispatcherBuilder, FetchRequest, TestAuthReport};
pub use domain::extract_domain;
pub use loader::{load_config, FileConfigSource};
pub use rules::{find_matching_rule, AuthRule};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
