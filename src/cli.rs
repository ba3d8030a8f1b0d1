//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// geolius - IP geolocation API backed by MaxMind databases
#[derive(Parser, Debug)]
#[command(name = "geolius")]
#[command(version)]
#[command(about = "IP geolocation API backed by MaxMind databases", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Resolve addresses against the configured databases
    Lookup {
        /// One or more IPv4 / IPv6 addresses
        #[arg(required = true, num_args = 1..)]
        addresses: Vec<String>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
