//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fetch URLs with credentials picked from a rules file
#[derive(Parser, Debug)]
#[command(name = "auth-fetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Rules file (YAML or JSON); discovered when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a URL and print the response body
    Fetch {
        /// Absolute URL to fetch
        url: String,

        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Request header, "Name: value" (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Request body
        #[arg(short, long)]
        data: Option<String>,

        /// Timeout in milliseconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Show which auth rule applies to a URL
    TestAuth {
        /// URL to resolve
        url: String,
    },
}

/// Split a "Name: value" header argument
fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected \"Name: value\", got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
