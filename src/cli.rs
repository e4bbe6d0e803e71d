//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// linkhop - a small URL shortener
#[derive(Parser, Debug)]
#[command(name = "linkhop")]
#[command(version)]
#[command(about = "A small URL shortener", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Print or write an example configuration file
    GenerateConfig {
        /// Output path (default: stdout)
        output_path: Option<String>,
    },

    /// Mint a bearer token for the management API (development helper)
    IssueToken {
        /// Owner id to put in the `sub` claim
        #[arg(long)]
        user: String,
    },
}
