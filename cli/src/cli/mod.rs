pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "filegate")]
#[command(author, version, about = "File-preview gateway - proxy /@api/ to the file backend and serve the front end")]
pub struct Cli {
    /// Path to config file (default: ./config.toml, then ~/.config/filegate/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the gateway
    Start {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show configuration and whether the gateway is running
    Status,

    /// Show where a request path would be forwarded
    Rewrite {
        /// Request path, optionally with a query string (e.g. /@api/files/readme.txt)
        path: String,
    },

    /// Print or write the global component typings
    Components {
        /// Rebuild the local table from the component directories
        #[arg(long)]
        scan: bool,

        /// Print the table as JSON instead of TypeScript
        #[arg(long, conflicts_with_all = ["out", "write"])]
        json: bool,

        /// Write the typings to the manifest path from config
        #[arg(short, long, conflicts_with = "out")]
        write: bool,

        /// Write the typings to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_help_names_lookup_order() {
        let command = Cli::command();
        let help = command
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .and_then(|arg| arg.get_help())
            .map(|help| help.to_string())
            .unwrap();
        assert_eq!(
            help,
            "Path to config file (default: ./config.toml, then ~/.config/filegate/config.toml)"
        );
    }
}
