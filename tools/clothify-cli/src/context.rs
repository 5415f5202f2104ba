//! CLI execution context.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clothify_store::{AppState, StoreConfig};

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Store configuration, with environment overrides applied.
    pub config: StoreConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from an explicit config file, or the nearest one above
    /// the working directory.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => StoreConfig::find(&cwd),
        };
        let config = match &config_path {
            Some(path) => StoreConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => StoreConfig::default(),
        };
        if let Some(path) = &config_path {
            output.debug(&format!("Using config {}", path.display()));
        }

        Ok(Self {
            config: config.with_env(),
            config_path,
            output,
            cwd,
        })
    }

    /// Open the storefront described by the configuration.
    pub fn state(&self) -> Result<AppState> {
        tracing::debug!(
            remote = self.config.database.remote().is_some(),
            "opening storefront"
        );
        AppState::from_config(self.config.clone()).context("Failed to open storefront")
    }
}
