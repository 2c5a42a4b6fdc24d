//! Application state wiring the CLI to concrete infrastructure.

use std::path::PathBuf;

use agentry_core::turn::TurnController;
use agentry_infra::config::{auth_path, bootstrap_credentials, load_config, resolve_data_dir};
use agentry_infra::filesystem::FileSessionFiles;
use agentry_infra::hub::HubClient;
use agentry_infra::llm::create_provider;
use agentry_infra::session_store::FileSessionStore;
use agentry_types::config::AgentryConfig;

use crate::reply::ConsoleReplySink;

/// Turn controller pinned to the concrete infra implementations.
pub type ConcreteTurnController =
    TurnController<FileSessionStore, FileSessionFiles, HubClient, ConsoleReplySink>;

/// Shared application state for CLI commands.
pub struct AppState {
    pub config: AgentryConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data directory and load configuration.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;
        let config = load_config(&data_dir).await;

        Ok(Self { config, data_dir })
    }

    /// Wire up a turn controller for one session.
    ///
    /// Credentials are re-read on every call so a login persisted by an
    /// earlier invocation is picked up without restarting anything.
    pub async fn turn_controller(
        &self,
        session_id: &str,
        sink: ConsoleReplySink,
    ) -> ConcreteTurnController {
        let credentials = bootstrap_credentials(&self.data_dir).await;
        let provider = create_provider(&self.config.inference_url, credentials.as_ref());
        let hub = HubClient::new(
            self.config.hub_url.clone(),
            auth_path(&self.data_dir),
            credentials,
        );
        let store = FileSessionStore::new(self.data_dir.clone());
        let files = FileSessionFiles::new(&self.data_dir, session_id);

        TurnController::new(
            provider,
            store,
            files,
            hub,
            sink,
            self.config.model.clone(),
            self.config.max_tokens,
            self.config.temperature,
        )
    }
}
