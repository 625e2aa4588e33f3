//! Help center configuration management for `kbase.toml`.
//!
//! # Sections
//!
//! | Section      | Purpose                                        |
//! |--------------|------------------------------------------------|
//! | `[site]`     | Listing page title and description             |
//! | `[paths]`    | Pages, assets and views directories            |
//! | `[serve]`    | HTTP server (interface, port)                  |
//! | `[listing]`  | Page size, slice rule, index caching           |
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "Acme Help"
//!
//! [paths]
//! pages = "pages"
//!
//! [serve]
//! port = 5277
//!
//! [listing]
//! page_size = 10
//! ```
//!
//! A missing config file is not an error: every field has a default.

pub mod defaults;
mod error;
mod listing;
mod paths;
mod serve;
mod site;

pub use error::ConfigError;

use listing::ListingConfig;
use paths::PathsSection;
use serve::ServeConfig;
use site::SiteSection;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::IpAddr,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing kbase.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Listing page metadata
    #[serde(default)]
    pub site: SiteSection,

    /// Directory layout
    #[serde(default)]
    pub paths: PathsSection,

    /// HTTP server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Listing behaviour
    #[serde(default)]
    pub listing: ListingConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load, apply CLI overrides, resolve paths and validate.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.config_path = paths::normalize_path(&config_path);
        config.update_with_cli(cli, root);
        config.validate()?;

        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli, root: &Path) {
        Self::update_option(&mut self.paths.pages, cli.pages.as_ref());
        self.paths.resolve(root);

        if let Commands::Serve { interface, port } = &cli.command {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.listing.page_size == 0 {
            bail!(ConfigError::Validation(
                "[listing.page_size] must be greater than 0".into()
            ));
        }

        if self.serve.interface.parse::<IpAddr>().is_err() {
            bail!(ConfigError::Validation(format!(
                "[serve.interface] `{}` is not an IP address",
                self.serve.interface
            )));
        }

        if !self.paths.pages.is_dir() {
            bail!(ConfigError::Validation(format!(
                "[paths.pages] `{}` is not a directory",
                self.paths.pages.display()
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
