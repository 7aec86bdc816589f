//! Configuration and client plumbing shared by the commands

use crate::error::Result as CliResult;
use anyhow::Context;
use redshift_reaper_core::aws::{AwsWarehouse, ConnectOptions, connect};
use redshift_reaper_core::{Config, ConfigDocument, Profile};
use std::path::PathBuf;
use tracing::{debug, info};

/// Holds the loaded configuration and knows how to build Redshift clients
#[derive(Clone, Debug)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl ConnectionManager {
    /// Create a new connection manager with a custom config path
    pub fn with_config_path(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// The configuration file as written, for profile edits
    pub fn load_document(&self) -> CliResult<ConfigDocument> {
        let path = self.document_path()?;
        debug!("Loading unexpanded config document from {:?}", path);
        Ok(ConfigDocument::load_from_path(&path).context("Failed to load configuration")?)
    }

    /// Write an edited document back to the configuration file
    pub fn save_document(&self, document: &ConfigDocument) -> CliResult<()> {
        let path = self.document_path()?;
        document
            .save_to_path(&path)
            .context("Failed to save configuration")?;
        Ok(())
    }

    fn document_path(&self) -> CliResult<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_path()?),
        }
    }

    /// Path the configuration is read from and written to
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config_path
            .clone()
            .or_else(|| Config::config_path().ok())
    }

    /// Profile selected by `--profile`, the default, or the only one configured
    pub fn resolve_profile(&self, explicit: Option<&str>) -> CliResult<Option<(&str, &Profile)>> {
        let resolved = self.config.resolve_profile(explicit)?;
        if let Some((name, _)) = resolved {
            debug!("Using profile: {}", name);
        }
        Ok(resolved)
    }

    /// Build a Redshift client, probing the region unless told not to
    pub async fn create_warehouse(&self, options: &ConnectOptions) -> CliResult<AwsWarehouse> {
        info!(
            "Creating Redshift client (region: {}, aws profile: {})",
            options.region.as_deref().unwrap_or("<default>"),
            options.aws_profile.as_deref().unwrap_or("<default>")
        );
        Ok(connect(options).await?)
    }
}
