//! CLI module
//!
//! Command-line front end over the dispatcher.
//!
//! # Commands
//!
//! - `fetch` - Fetch a URL with its rule's credentials and print the body
//! - `test-auth` - Print the rule a URL resolves to as JSON

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
