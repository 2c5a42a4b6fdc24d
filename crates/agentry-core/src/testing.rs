//! Shared test doubles for the turn engine and operation tests.
//!
//! Every double is a cheap-clone handle over `Arc`ed interior state, so a
//! test can hand one clone to the controller and keep another to inspect
//! what happened.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use agentry_types::auth::AuthCredentials;
use agentry_types::error::{AuthError, FileStoreError, RegistryError, VaultError};
use agentry_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, ToolCall,
    ToolCompletionResponse, ToolDefinition, Usage,
};
use agentry_types::metadata::AgentMetadata;
use agentry_types::registry::{EntryLocation, SessionFileInfo};
use agentry_types::secret::SecretSpec;
use agentry_types::session::SessionState;

use crate::hub::{AuthService, RegistryService, ReplySink, SecretVault};
use crate::llm::LlmProvider;
use crate::storage::{SessionFiles, SessionStore};

// ---------------------------------------------------------------------------
// ScriptedProvider
// ---------------------------------------------------------------------------

/// One scripted model reply, consumed in order.
pub(crate) enum ScriptedReply {
    Text(String),
    ToolCalls(Vec<ToolCall>),
    TextAndCalls(String, Vec<ToolCall>),
    Fail(LlmError),
}

impl ScriptedReply {
    pub(crate) fn text(content: &str) -> Self {
        Self::Text(content.to_string())
    }

    pub(crate) fn tool_call(name: &str, arguments: serde_json::Value) -> Self {
        Self::ToolCalls(vec![ToolCall {
            id: Some("call_mock_1".to_string()),
            name: name.to_string(),
            arguments,
        }])
    }
}

struct ProviderState {
    script: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<CompletionRequest>>,
    offered_tools: Mutex<Vec<Vec<String>>>,
}

/// An [`LlmProvider`] that replays a fixed script and records every request.
#[derive(Clone)]
pub(crate) struct ScriptedProvider {
    state: Arc<ProviderState>,
}

impl ScriptedProvider {
    pub(crate) fn new(script: Vec<ScriptedReply>) -> Self {
        Self {
            state: Arc::new(ProviderState {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
                offered_tools: Mutex::new(Vec::new()),
            }),
        }
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub(crate) fn offered_tools(&self) -> Vec<Vec<String>> {
        self.state.offered_tools.lock().unwrap().clone()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.state.script.lock().unwrap().len()
    }

    fn next(&self) -> ScriptedReply {
        self.state
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted provider ran out of replies")
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.state.requests.lock().unwrap().push(request.clone());
        match self.next() {
            ScriptedReply::Text(content) => Ok(CompletionResponse {
                id: "msg_scripted_1".to_string(),
                content,
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 5,
                },
            }),
            ScriptedReply::ToolCalls(_) | ScriptedReply::TextAndCalls(..) => {
                panic!("plain completion received a tool-call script entry")
            }
            ScriptedReply::Fail(e) => Err(e),
        }
    }

    async fn complete_with_tools(
        &self,
        request: &CompletionRequest,
        tools: &[ToolDefinition],
    ) -> Result<ToolCompletionResponse, LlmError> {
        self.state.requests.lock().unwrap().push(request.clone());
        self.state
            .offered_tools
            .lock()
            .unwrap()
            .push(tools.iter().map(|t| t.name.clone()).collect());

        let (text, tool_calls) = match self.next() {
            ScriptedReply::Text(content) => (Some(content), Vec::new()),
            ScriptedReply::ToolCalls(calls) => (None, calls),
            ScriptedReply::TextAndCalls(content, calls) => (Some(content), calls),
            ScriptedReply::Fail(e) => return Err(e),
        };
        let stop_reason = if tool_calls.is_empty() {
            StopReason::EndTurn
        } else {
            StopReason::ToolUse
        };
        Ok(ToolCompletionResponse {
            id: "msg_scripted_1".to_string(),
            text,
            tool_calls,
            model: request.model.clone(),
            stop_reason,
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory [`SessionStore`] that counts saves.
#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    states: Arc<Mutex<HashMap<String, SessionState>>>,
    save_count: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_state(session_id: &str, state: SessionState) -> Self {
        let store = Self::default();
        store
            .states
            .lock()
            .unwrap()
            .insert(session_id.to_string(), state);
        store
    }

    pub(crate) fn saved(&self, session_id: &str) -> Option<SessionState> {
        self.states.lock().unwrap().get(session_id).cloned()
    }

    pub(crate) fn save_count(&self) -> usize {
        *self.save_count.lock().unwrap()
    }
}

impl SessionStore for MemoryStore {
    async fn load(&self, session_id: &str) -> SessionState {
        self.states
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn save(&self, session_id: &str, state: &SessionState) {
        *self.save_count.lock().unwrap() += 1;
        self.states
            .lock()
            .unwrap()
            .insert(session_id.to_string(), state.clone());
    }
}

// ---------------------------------------------------------------------------
// MemoryFiles
// ---------------------------------------------------------------------------

/// In-memory [`SessionFiles`] with a counter clock for creation times.
#[derive(Clone, Default)]
pub(crate) struct MemoryFiles {
    files: Arc<Mutex<BTreeMap<String, (String, DateTime<Utc>)>>>,
    clock: Arc<Mutex<i64>>,
}

impl MemoryFiles {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn content(&self, filename: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(filename)
            .map(|(content, _)| content.clone())
    }
}

impl SessionFiles for MemoryFiles {
    async fn read_file(&self, filename: &str) -> Result<Option<String>, FileStoreError> {
        Ok(self.content(filename))
    }

    async fn write_file(&self, filename: &str, content: &str) -> Result<(), FileStoreError> {
        let mut clock = self.clock.lock().unwrap();
        *clock += 1;
        let created_at = Utc
            .timestamp_opt(*clock, 0)
            .single()
            .expect("counter timestamp is valid");
        self.files
            .lock()
            .unwrap()
            .insert(filename.to_string(), (content.to_string(), created_at));
        Ok(())
    }

    async fn list_files(&self) -> Result<Vec<SessionFileInfo>, FileStoreError> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .map(|(filename, (_, created_at))| SessionFileInfo {
                filename: filename.clone(),
                created_at: *created_at,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// RecordingHub
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
pub(crate) enum UploadBehavior {
    Succeed,
    Conflict,
    Fail,
}

struct HubState {
    entries: Mutex<Vec<(EntryLocation, AgentMetadata)>>,
    uploads: Mutex<Vec<(EntryLocation, String, Vec<u8>)>>,
    created_secrets: Mutex<Vec<SecretSpec>>,
    deleted_secrets: Mutex<Vec<SecretSpec>>,
    persisted: Mutex<Vec<AuthCredentials>>,
    credentials: Mutex<Option<AuthCredentials>>,
    upload_behavior: Mutex<UploadBehavior>,
}

/// Records every hub interaction; implements all three hub-facing traits.
#[derive(Clone)]
pub(crate) struct RecordingHub {
    state: Arc<HubState>,
}

impl RecordingHub {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(HubState {
                entries: Mutex::new(Vec::new()),
                uploads: Mutex::new(Vec::new()),
                created_secrets: Mutex::new(Vec::new()),
                deleted_secrets: Mutex::new(Vec::new()),
                persisted: Mutex::new(Vec::new()),
                credentials: Mutex::new(None),
                upload_behavior: Mutex::new(UploadBehavior::Succeed),
            }),
        }
    }

    pub(crate) fn logged_in(account_id: &str) -> Self {
        let hub = Self::new();
        *hub.state.credentials.lock().unwrap() = Some(test_credentials(account_id));
        hub
    }

    pub(crate) fn set_upload_behavior(&self, behavior: UploadBehavior) {
        *self.state.upload_behavior.lock().unwrap() = behavior;
    }

    pub(crate) fn entries(&self) -> Vec<(EntryLocation, AgentMetadata)> {
        self.state.entries.lock().unwrap().clone()
    }

    pub(crate) fn uploads(&self) -> Vec<(EntryLocation, String, Vec<u8>)> {
        self.state.uploads.lock().unwrap().clone()
    }

    pub(crate) fn created_secrets(&self) -> Vec<SecretSpec> {
        self.state.created_secrets.lock().unwrap().clone()
    }

    pub(crate) fn deleted_secrets(&self) -> Vec<SecretSpec> {
        self.state.deleted_secrets.lock().unwrap().clone()
    }

    pub(crate) fn persisted(&self) -> Vec<AuthCredentials> {
        self.state.persisted.lock().unwrap().clone()
    }
}

impl RegistryService for RecordingHub {
    async fn update_entry(
        &self,
        location: &EntryLocation,
        metadata: &AgentMetadata,
    ) -> Result<(), RegistryError> {
        self.state
            .entries
            .lock()
            .unwrap()
            .push((location.clone(), metadata.clone()));
        Ok(())
    }

    async fn upload_file(
        &self,
        location: &EntryLocation,
        filename: &str,
        content: &[u8],
    ) -> Result<(), RegistryError> {
        let behavior = *self.state.upload_behavior.lock().unwrap();
        match behavior {
            UploadBehavior::Succeed => {
                self.state.uploads.lock().unwrap().push((
                    location.clone(),
                    filename.to_string(),
                    content.to_vec(),
                ));
                Ok(())
            }
            UploadBehavior::Conflict => Err(RegistryError::AlreadyExists {
                version: location.version.clone(),
            }),
            UploadBehavior::Fail => Err(RegistryError::Request(
                "scripted upload failure".to_string(),
            )),
        }
    }
}

impl SecretVault for RecordingHub {
    async fn create_secret(&self, spec: &SecretSpec) -> Result<(), VaultError> {
        self.state.created_secrets.lock().unwrap().push(spec.clone());
        Ok(())
    }

    async fn delete_secret(&self, spec: &SecretSpec) -> Result<(), VaultError> {
        self.state.deleted_secrets.lock().unwrap().push(spec.clone());
        Ok(())
    }
}

impl AuthService for RecordingHub {
    fn credentials(&self) -> Option<AuthCredentials> {
        self.state.credentials.lock().unwrap().clone()
    }

    fn install_credentials(&self, credentials: AuthCredentials) {
        *self.state.credentials.lock().unwrap() = Some(credentials);
    }

    async fn update_auth_config(&self, credentials: &AuthCredentials) -> Result<bool, AuthError> {
        if credentials.nonce.parse::<u64>().is_err() {
            return Ok(false);
        }
        self.state.persisted.lock().unwrap().push(credentials.clone());
        Ok(true)
    }
}

pub(crate) fn test_credentials(account_id: &str) -> AuthCredentials {
    AuthCredentials {
        account_id: account_id.to_string(),
        signature: "c2lnbmF0dXJl".to_string(),
        public_key: "ed25519:6Sq9pg".to_string(),
        callback_url: "https://app.near.ai/callback".to_string(),
        nonce: "1700000000000".to_string(),
        recipient: "ai.near".to_string(),
        message: "Welcome to NEAR AI".to_string(),
    }
}

// ---------------------------------------------------------------------------
// RecordingSink
// ---------------------------------------------------------------------------

/// Captures user-facing replies in order.
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    replies: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().clone()
    }
}

impl ReplySink for RecordingSink {
    fn add_reply(&self, text: &str) {
        self.replies.lock().unwrap().push(text.to_string());
    }
}
