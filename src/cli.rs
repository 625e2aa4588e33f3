//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// kbase help center CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Help root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Pages directory path (relative to root)
    #[arg(short = 'P', long)]
    pub pages: Option<PathBuf>,

    /// Config file name (default: kbase.toml)
    #[arg(short = 'C', long, default_value = "kbase.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Listing arguments for the `list` command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only topics carrying this tag (repeatable, all must match)
    #[arg(short, long)]
    pub tagged: Vec<String>,

    /// Number of topics to skip
    #[arg(long)]
    pub skip: Option<usize>,

    /// Page size (default: `[listing] page_size`)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the help center over HTTP
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Load every topic once and report the first broken one
    Check,

    /// Print a page of the topic listing
    List {
        #[command(flatten)]
        list_args: ListArgs,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check)
    }
    pub const fn is_list(&self) -> bool {
        matches!(self.command, Commands::List { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["kbase", "-r", "help", "serve", "-p", "8080"]).unwrap();
        assert!(cli.is_serve());
        assert_eq!(cli.root, Some(PathBuf::from("help")));
        assert_eq!(cli.config, PathBuf::from("kbase.toml"));
        match cli.command {
            Commands::Serve { interface, port } => {
                assert_eq!(interface, None);
                assert_eq!(port, Some(8080));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from([
            "kbase", "list", "-t", "a", "--tagged", "b", "--skip", "2", "-l", "5", "--json",
        ])
        .unwrap();
        assert!(cli.is_list());
        let Commands::List { list_args } = cli.command else {
            unreachable!()
        };
        assert_eq!(list_args.tagged, vec!["a", "b"]);
        assert_eq!(list_args.skip, Some(2));
        assert_eq!(list_args.limit, Some(5));
        assert!(list_args.json);
    }

    #[test]
    fn test_parse_check_with_config() {
        let cli = Cli::try_parse_from(["kbase", "-C", "help.toml", "check"]).unwrap();
        assert!(cli.is_check());
        assert_eq!(cli.config, PathBuf::from("help.toml"));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["kbase"]).is_err());
    }
}
