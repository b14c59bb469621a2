//! Dispatch module
//!
//! The two operations exposed to callers.
//!
//! # Overview
//!
//! The dispatch module provides:
//! - `Dispatcher::fetch_url` - resolve rule, apply auth, perform request, return body or error text
//! - `Dispatcher::test_auth` - report the rule a URL resolves to, secrets masked
//! - `DispatcherBuilder` - transport, token cache and credential provider wiring

mod dispatcher;
mod types;

pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use types::{FetchRequest, TestAuthReport};
