//! The conversational `turn` command.

use anyhow::Result;
use console::style;
use uuid::Uuid;

use crate::reply::ConsoleReplySink;
use crate::state::AppState;

/// Send one message to the builder in the given (or a fresh) session.
pub async fn run_turn(
    state: &AppState,
    session: Option<String>,
    message: &str,
    json: bool,
) -> Result<()> {
    let session_id = session.unwrap_or_else(|| Uuid::now_v7().to_string());

    // Replies stream to stdout as they arrive unless the caller asked for
    // JSON, in which case they are collected and emitted once at the end.
    let sink = ConsoleReplySink::new(!json);
    let controller = state.turn_controller(&session_id, sink.clone()).await;
    controller.handle_turn(&session_id, message).await;

    if json {
        let output = serde_json::json!({
            "session_id": session_id,
            "replies": sink.replies(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} session {}",
        style("i").blue().bold(),
        style(&session_id).cyan()
    );
    println!(
        "  {} {}",
        style("continue with:").dim(),
        style(format!("agentry turn -s {session_id} \"...\"")).yellow()
    );
    println!();

    Ok(())
}
