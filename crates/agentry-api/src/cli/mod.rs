//! CLI command definitions and dispatch for the `agentry` binary.
//!
//! Uses clap derive macros for argument parsing. One conversational command
//! (`agentry turn`) drives the builder; the rest inspect local sessions.

pub mod session;
pub mod turn;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Build, iterate on, and publish NEAR AI agents from your terminal.
#[derive(Parser)]
#[command(name = "agentry", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to OpenTelemetry (stdout exporter)
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send one message to the builder and print its replies
    Turn {
        /// The message to send
        message: String,

        /// Session to continue; a fresh one is created when omitted
        #[arg(short, long)]
        session: Option<String>,
    },

    /// List builder sessions stored in the data directory
    #[command(alias = "ls")]
    Sessions,

    /// Show one session: agent, publish state, conversation log
    Show {
        /// Session ID to display
        session_id: String,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}
