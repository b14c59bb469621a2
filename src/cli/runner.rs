//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::dispatch::{Dispatcher, FetchRequest};
use crate::error::{Error, Result, ResultExt};
use crate::loader::FileConfigSource;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
    dispatcher: Dispatcher,
}

impl Runner {
    /// Create a runner over the discovered (or `--config`) rules file
    pub fn new(cli: Cli) -> Self {
        let dispatcher = Dispatcher::new(FileConfigSource::new(cli.config.clone()));
        Self { cli, dispatcher }
    }

    /// Create a runner with a prepared dispatcher
    pub fn with_dispatcher(cli: Cli, dispatcher: Dispatcher) -> Self {
        Self { cli, dispatcher }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let output = self.execute().await?;
        println!("{output}");
        Ok(())
    }

    /// Run the command and return what would be printed
    pub async fn execute(&self) -> Result<String> {
        match &self.cli.command {
            Commands::Fetch {
                url,
                method,
                headers,
                data,
                timeout,
            } => {
                let mut request = FetchRequest::get(url.as_str()).method(method.as_str());
                for (name, value) in headers {
                    request = request.header(name.as_str(), value.as_str());
                }
                request.body.clone_from(data);
                request.timeout = *timeout;

                debug!(url = %url, method = %method, "Fetching");
                Ok(self.dispatcher.fetch_url(&request).await)
            }
            Commands::TestAuth { url } => self.test_auth(url).await,
        }
    }

    async fn test_auth(&self, url: &str) -> Result<String> {
        let dispatcher = self.dispatcher.clone();
        let url = url.to_string();
        let report = tokio::task::spawn_blocking(move || dispatcher.test_auth(&url))
            .await
            .map_err(|e| Error::Other(format!("test-auth task failed: {e}")))?;
        if let Some(ref error) = report.error {
            debug!(error = %error, "test-auth could not load rules");
        }
        serde_json::to_string_pretty(&report).context("Failed to render report")
    }
}
