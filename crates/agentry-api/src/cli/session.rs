//! Session browsing commands: list and show.

use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use uuid::Uuid;

use agentry_core::storage::SessionStore;
use agentry_infra::filesystem::session_dir;
use agentry_infra::session_store::FileSessionStore;
use agentry_types::session::SessionState;

use crate::state::AppState;

/// List builder sessions stored in the data directory.
pub async fn list_sessions(state: &AppState, json: bool) -> Result<()> {
    let ids = collect_session_ids(state).await?;

    let store = FileSessionStore::new(state.data_dir.clone());
    let mut rows: Vec<(String, SessionState)> = Vec::with_capacity(ids.len());
    for id in ids {
        let session_state = store.load(&id).await;
        rows.push((id, session_state));
    }

    if json {
        let export: Vec<_> = rows
            .iter()
            .map(|(id, s)| {
                serde_json::json!({
                    "session_id": id,
                    "started": session_started(id),
                    "agent_name": s.agent_name,
                    "last_version": s.last_version,
                    "events": s.scratchpad.len(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&export)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!();
        println!(
            "  {} No sessions yet. Start one with: {}",
            style("i").blue().bold(),
            style("agentry turn \"build me an agent\"").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Session", "Started", "Agent", "Version", "Events"]);

    for (id, session_state) in &rows {
        let started = session_started(id)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let agent = if session_state.agent_name.is_empty() {
            Cell::new("(none)").fg(Color::DarkGrey)
        } else {
            Cell::new(&session_state.agent_name).fg(Color::Cyan)
        };
        let version = if session_state.last_version.is_empty() {
            Cell::new("unpublished").fg(Color::DarkGrey)
        } else {
            Cell::new(&session_state.last_version).fg(Color::Green)
        };
        table.add_row(vec![
            Cell::new(id),
            Cell::new(started),
            agent,
            version,
            Cell::new(session_state.scratchpad.len()),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Show one session: agent details, publish state, conversation log.
pub async fn show_session(state: &AppState, session_id: &str, json: bool) -> Result<()> {
    let dir = session_dir(&state.data_dir, session_id);
    if !tokio::fs::try_exists(&dir).await.unwrap_or(false) {
        anyhow::bail!("session '{session_id}' not found");
    }

    let store = FileSessionStore::new(state.data_dir.clone());
    let session_state = store.load(session_id).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&session_state)?);
        return Ok(());
    }

    println!();
    println!("  Session {}", style(session_id).cyan().bold());
    println!();

    if session_state.agent_name.is_empty() && !session_state.has_agent_code() {
        println!(
            "  {} Nothing generated in this session yet.",
            style("i").blue().bold()
        );
    } else {
        println!(
            "  Agent:       {}",
            style(&session_state.agent_name).cyan()
        );
        if !session_state.agent_description.is_empty() {
            println!("  Description: {}", session_state.agent_description);
        }
        if session_state.last_version.is_empty() {
            println!("  Published:   {}", style("not yet").dim());
        } else {
            println!(
                "  Published:   {}",
                style(&session_state.last_version).green()
            );
        }
        if let Some(pending) = &session_state.pending_secrets {
            if pending.is_outstanding() {
                let keys: Vec<&str> = pending.keys.keys().map(String::as_str).collect();
                println!(
                    "  {} Waiting on secrets: {}",
                    style("!").yellow().bold(),
                    style(keys.join(", ")).yellow()
                );
            }
        }
    }
    println!();

    if !session_state.scratchpad.is_empty() {
        println!("  {}", style("Conversation log").bold());
        for entry in &session_state.scratchpad {
            println!("    {entry}");
        }
        println!();
    }

    Ok(())
}

// --- Helpers ---

async fn collect_session_ids(state: &AppState) -> Result<Vec<String>> {
    let sessions_dir = state.data_dir.join("sessions");
    let mut ids = Vec::new();
    match tokio::fs::read_dir(&sessions_dir).await {
        Ok(mut entries) => {
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_type().await?.is_dir() {
                    if let Ok(name) = entry.file_name().into_string() {
                        ids.push(name);
                    }
                }
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    // UUID v7 ids sort chronologically; anything else just sorts by name.
    ids.sort();
    Ok(ids)
}

/// Start time recovered from a UUID v7 session id, when the id is one.
fn session_started(session_id: &str) -> Option<DateTime<Utc>> {
    let uuid = Uuid::parse_str(session_id).ok()?;
    let ts = uuid.get_timestamp()?;
    let (secs, nanos) = ts.to_unix();
    DateTime::from_timestamp(i64::try_from(secs).ok()?, nanos)
}
