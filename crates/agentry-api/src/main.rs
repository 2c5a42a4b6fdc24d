//! Agentry CLI entry point.
//!
//! Binary name: `agentry`
//!
//! Parses CLI arguments, initializes tracing and application state, then
//! dispatches to the appropriate command handler.

mod cli;
mod reply;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default log filter from verbosity flags; RUST_LOG still wins.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,agentry_core=debug",
        _ => "trace",
    };
    if let Err(e) = agentry_observe::tracing_setup::init_tracing(cli.otel, filter) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "agentry", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    let result = match cli.command {
        Commands::Turn { message, session } => {
            cli::turn::run_turn(&state, session, &message, cli.json).await
        }
        Commands::Sessions => cli::session::list_sessions(&state, cli.json).await,
        Commands::Show { session_id } => {
            cli::session::show_session(&state, &session_id, cli.json).await
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    agentry_observe::tracing_setup::shutdown_tracing();
    result
}
