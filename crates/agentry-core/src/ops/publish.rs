//! Registry publication of the session's agent under a version label.

use std::collections::BTreeMap;

use agentry_types::error::{FileStoreError, RegistryError};
use agentry_types::metadata::AgentMetadata;
use agentry_types::registry::{EntryLocation, SessionFileInfo};

use crate::hub::{AuthService, RegistryService, ReplySink, SecretVault};
use crate::storage::{SessionFiles, SessionStore};
use crate::turn::TurnContext;

/// Why a publish attempt did not produce a registry entry.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("not logged in")]
    NotAuthenticated,

    #[error("metadata.json not found; generate an agent first")]
    MissingMetadata,

    #[error("metadata.json is malformed: {0}")]
    MalformedMetadata(String),

    #[error("only default source is allowed; remove details._source from metadata")]
    ForeignSource,

    #[error("file already exists at version {version}")]
    VersionConflict { version: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Files(#[from] FileStoreError),
}

/// Publish after generate or update and tell the user where the agent lives
/// on success. Failures are logged but produce no reply.
pub(crate) async fn publish_and_report<S, F, H, R>(
    ctx: &mut TurnContext<'_, S, F, H, R>,
    version: &str,
) where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    tracing::info!(version, "uploading agent");
    match publish(ctx, version).await {
        Ok(location) => ctx.reply(&upload_success_text(&location)),
        Err(e) => {
            tracing::error!(version, error = %e, "agent upload failed");
        }
    }
}

/// Explicit user-requested release. Unlike the auto-publish path, a failure
/// here is reported back into the conversation.
pub(crate) async fn upload_requested<S, F, H, R>(
    ctx: &mut TurnContext<'_, S, F, H, R>,
    version: &str,
) where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    tracing::info!(version, "uploading agent");
    match publish(ctx, version).await {
        Ok(location) => ctx.reply(&upload_success_text(&location)),
        Err(e) => {
            tracing::error!(version, error = %e, "agent upload failed");
            ctx.reply(&format!("Upload failed: {e}"));
        }
    }
}

fn upload_success_text(location: &EntryLocation) -> String {
    format!(
        "Agent uploaded successfully.\n\
         Chat with it https://app.near.ai/agents/{location}\n\
         You can give me the feedback and I will make improvements for you!"
    )
}

/// Stamp the version into metadata, push the entry, then push session files.
pub(crate) async fn publish<S, F, H, R>(
    ctx: &mut TurnContext<'_, S, F, H, R>,
    version: &str,
) -> Result<EntryLocation, PublishError>
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    let raw = ctx
        .files
        .read_file("metadata.json")
        .await?
        .ok_or(PublishError::MissingMetadata)?;
    let mut metadata: AgentMetadata =
        serde_json::from_str(&raw).map_err(|e| PublishError::MalformedMetadata(e.to_string()))?;
    metadata.version = version.to_string();

    let pretty = serde_json::to_string_pretty(&metadata)
        .map_err(|e| PublishError::MalformedMetadata(e.to_string()))?;
    ctx.files.write_file("metadata.json", &pretty).await?;

    // Snapshot into session state so later turns can rebuild the entry.
    ctx.state.metadata = Some(metadata.clone());
    ctx.flush().await;

    let Some(credentials) = ctx.hub.credentials() else {
        return Err(PublishError::NotAuthenticated);
    };
    let location = EntryLocation::new(credentials.namespace(), &metadata.name, version);

    if metadata.has_foreign_source() {
        return Err(PublishError::ForeignSource);
    }

    ctx.hub.update_entry(&location, &metadata).await?;

    let to_upload = collect_uploadable(ctx.files.list_files().await?);

    if !to_upload.contains_key("agent.py") {
        // The session listing can lag right after generation; fall back to
        // the code snapshot held in session state.
        if let Err(e) = ctx
            .hub
            .upload_file(&location, "agent.py", ctx.state.agent_code.as_bytes())
            .await
        {
            tracing::warn!(error = %e, "cannot upload agent.py from session state");
        }
    }

    for filename in to_upload.keys() {
        let content = ctx.files.read_file(filename).await?.ok_or_else(|| {
            PublishError::Files(FileStoreError::Io(format!(
                "{filename} disappeared during upload"
            )))
        })?;
        match ctx
            .hub
            .upload_file(&location, filename, content.as_bytes())
            .await
        {
            Ok(()) => {}
            Err(RegistryError::AlreadyExists { version }) => {
                return Err(PublishError::VersionConflict { version });
            }
            Err(e) => return Err(PublishError::Registry(e)),
        }
    }

    Ok(location)
}

/// Pick the files worth uploading: session bookkeeping stays local, and a
/// filename seen twice keeps only its newest entry.
fn collect_uploadable(listing: Vec<SessionFileInfo>) -> BTreeMap<String, SessionFileInfo> {
    let mut files: BTreeMap<String, SessionFileInfo> = BTreeMap::new();
    for file in listing {
        if file.filename.contains("state.json") {
            continue;
        }
        if file.filename == "metadata.json" {
            continue;
        }
        match files.get(&file.filename) {
            Some(existing) if existing.created_at >= file.created_at => {}
            _ => {
                files.insert(file.filename.clone(), file);
            }
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn info(filename: &str, secs: i64) -> SessionFileInfo {
        SessionFileInfo {
            filename: filename.to_string(),
            created_at: Utc.timestamp_opt(secs, 0).single().unwrap(),
        }
    }

    #[test]
    fn test_collect_skips_bookkeeping_files() {
        let files = collect_uploadable(vec![
            info("agent.py", 1),
            info("metadata.json", 1),
            info("state.json", 1),
            info("chat_state.json", 1),
        ]);
        assert_eq!(files.len(), 1);
        assert!(files.contains_key("agent.py"));
    }

    #[test]
    fn test_collect_keeps_newest_duplicate() {
        let files = collect_uploadable(vec![
            info("agent.py", 5),
            info("agent.py", 9),
            info("agent.py", 2),
        ]);
        assert_eq!(files.len(), 1);
        assert_eq!(files["agent.py"].created_at.timestamp(), 9);
    }
}
