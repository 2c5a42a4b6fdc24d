//! Session state persistence on the local filesystem.
//!
//! One `state.json` per session, living in the same working directory as the
//! session's other files so that directory listings see it alongside
//! `agent.py` and `metadata.json`. Load never fails: a missing or corrupt
//! document comes back as the default state. Save logs failures instead of
//! raising them, because persistence trouble must not abort a turn.

use std::path::PathBuf;

use agentry_core::storage::session_store::SessionStore;
use agentry_types::session::SessionState;

use crate::filesystem::session_dir;

const STATE_FILENAME: &str = "state.json";

/// Local filesystem implementation of the `SessionStore` trait.
pub struct FileSessionStore {
    data_dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn state_path(&self, session_id: &str) -> PathBuf {
        session_dir(&self.data_dir, session_id).join(STATE_FILENAME)
    }
}

impl SessionStore for FileSessionStore {
    async fn load(&self, session_id: &str) -> SessionState {
        let path = self.state_path(session_id);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No state.json for session {session_id}, starting fresh");
                return SessionState::default();
            }
            Err(err) => {
                tracing::warn!("Failed to read {}: {err}, starting fresh", path.display());
                return SessionState::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!("Failed to parse {}: {err}, starting fresh", path.display());
                SessionState::default()
            }
        }
    }

    async fn save(&self, session_id: &str, state: &SessionState) {
        let path = self.state_path(session_id);

        let json = match serde_json::to_string_pretty(state) {
            Ok(json) => json,
            Err(err) => {
                tracing::error!("Failed to serialize state for session {session_id}: {err}");
                return;
            }
        };
        if let Some(parent) = path.parent() {
            if let Err(err) = tokio::fs::create_dir_all(parent).await {
                tracing::error!("Failed to create {}: {err}", parent.display());
                return;
            }
        }
        if let Err(err) = tokio::fs::write(&path, json).await {
            tracing::error!("Failed to write {}: {err}", path.display());
        }
    }
}
