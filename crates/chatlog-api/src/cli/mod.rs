//! CLI command definitions for the `chatlog` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Conversation log service for chat-bot deployments.
#[derive(Parser)]
#[command(name = "chatlog", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Read configuration from this file instead of `{data_dir}/config.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (overrides config and PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config and CHATLOG_HOST).
        #[arg(long)]
        host: Option<String>,
    },

    /// Print conversation statistics as JSON.
    Stats {
        /// Restrict to one user identifier.
        user: Option<String>,
    },
}
