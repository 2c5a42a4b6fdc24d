//! Per-turn execution context.
//!
//! One `TurnContext` is built for each inbound message and threaded through
//! every operation the turn dispatches. It owns the mutable session state
//! and borrows the collaborators, so there is no global accessor anywhere;
//! when the turn ends the controller flushes the state through `flush`.

use tracing::{Instrument, info_span};

use agentry_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, ToolCompletionResponse,
    ToolDefinition,
};
use agentry_types::session::SessionState;

use crate::hub::{AuthService, RegistryService, ReplySink, SecretVault};
use crate::llm::BoxLlmProvider;
use crate::storage::{SessionFiles, SessionStore};

/// Everything one turn needs: collaborators, completion parameters, and the
/// session state being mutated.
pub struct TurnContext<'a, S, F, H, R>
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    pub(crate) llm: &'a BoxLlmProvider,
    pub(crate) store: &'a S,
    pub(crate) files: &'a F,
    pub(crate) hub: &'a H,
    pub(crate) replies: &'a R,
    pub(crate) session_id: &'a str,
    pub(crate) model: String,
    pub(crate) max_tokens: u32,
    pub(crate) temperature: Option<f64>,
    pub(crate) state: SessionState,
}

impl<'a, S, F, H, R> TurnContext<'a, S, F, H, R>
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        llm: &'a BoxLlmProvider,
        store: &'a S,
        files: &'a F,
        hub: &'a H,
        replies: &'a R,
        session_id: &'a str,
        model: String,
        max_tokens: u32,
        temperature: Option<f64>,
        state: SessionState,
    ) -> Self {
        Self {
            llm,
            store,
            files,
            hub,
            replies,
            session_id,
            model,
            max_tokens,
            temperature,
            state,
        }
    }

    /// Run a plain completion with this turn's model parameters.
    pub(crate) async fn complete(
        &self,
        system: Option<&str>,
        messages: Vec<Message>,
    ) -> Result<CompletionResponse, LlmError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
            system: system.map(str::to_string),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.llm.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
        );

        self.llm.complete(&request).instrument(span).await
    }

    /// Run a completion offering `tools`.
    pub(crate) async fn complete_with_tools(
        &self,
        system: String,
        messages: Vec<Message>,
        tools: &[ToolDefinition],
    ) -> Result<ToolCompletionResponse, LlmError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
            system: Some(system),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let span = info_span!(
            "gen_ai.tools",
            gen_ai.system = self.llm.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.tool_count = tools.len(),
        );

        self.llm
            .complete_with_tools(&request, tools)
            .instrument(span)
            .await
    }

    /// Send one user-visible message through the reply sink.
    pub(crate) fn reply(&self, text: &str) {
        tracing::debug!(chars = text.len(), "reply");
        self.replies.add_reply(text);
    }

    /// Persist the session state. Save failures are absorbed by the store.
    pub(crate) async fn flush(&self) {
        self.store.save(self.session_id, &self.state).await;
    }
}
