//! CLI command definitions for the `waypost` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod sign;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Resume paused workflow executions over signed webhooks.
#[derive(Parser)]
#[command(name = "waypost", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Detailed output (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the TOML config file.
    #[arg(long, global = true, env = "WAYPOST_CONFIG", default_value = "waypost.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on (overrides config).
        #[arg(long, short)]
        port: Option<u16>,

        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// JSON file with workflows and executions to preload.
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Print a signed resume URL for a waiting execution.
    SignUrl {
        /// Execution to resume.
        execution_id: String,

        /// Webhook suffix configured on the waiting node.
        #[arg(long)]
        suffix: Option<String>,

        /// Public base URL (defaults to `webhooks.base_url`, then the bind address).
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
