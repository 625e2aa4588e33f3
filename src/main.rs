//! kbase - A file-backed help center server.

mod cli;
mod config;
mod error;
mod index;
mod listing;
mod logger;
mod markdown;
mod serve;
mod topic;
mod views;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use listing::{check_topics, list_topics};
use serve::serve_site;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Serve { .. } => serve_site(Arc::new(config)),
        Commands::Check => check_topics(&config).map(|_| ()),
        Commands::List { list_args } => list_topics(&config, list_args),
    }
}
