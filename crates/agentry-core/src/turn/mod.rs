//! The turn engine.
//!
//! One turn = one inbound user message processed to completion: load state,
//! short-circuit the login sentinel, otherwise assemble the system prompt,
//! run the tool-offering completion, dispatch whatever the model decided,
//! and flush state. Nothing that happens mid-turn is allowed to skip the
//! final flush.

pub mod context;
pub mod prompt;
pub mod tools;

pub use context::TurnContext;

use tracing::{error, info, warn};

use agentry_types::llm::{LlmError, Message};

use crate::hub::{AuthService, RegistryService, ReplySink, SecretVault};
use crate::llm::BoxLlmProvider;
use crate::ops;
use crate::session::SessionStateExt;
use crate::storage::{SessionFiles, SessionStore};
use crate::turn::prompt::build_turn_system_prompt;
use crate::turn::tools::{ToolCommand, tool_definitions};

/// Inbound messages starting with this prefix complete the login flow
/// directly, without consulting the model.
pub const LOGIN_SENTINEL: &str = "nearai login save";

/// Drives one conversation session across stateless invocations.
pub struct TurnController<S, F, H, R>
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    llm: BoxLlmProvider,
    store: S,
    files: F,
    hub: H,
    replies: R,
    model: String,
    max_tokens: u32,
    temperature: Option<f64>,
}

impl<S, F, H, R> TurnController<S, F, H, R>
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        llm: BoxLlmProvider,
        store: S,
        files: F,
        hub: H,
        replies: R,
        model: String,
        max_tokens: u32,
        temperature: Option<f64>,
    ) -> Self {
        Self {
            llm,
            store,
            files,
            hub,
            replies,
            model,
            max_tokens,
            temperature,
        }
    }

    /// Process one inbound message for `session_id`.
    ///
    /// Never fails: every error path ends in a user-visible explanation, and
    /// the state flush runs regardless of what happened before it.
    pub async fn handle_turn(&self, session_id: &str, message: &str) {
        let state = self.store.load(session_id).await;
        let mut ctx = TurnContext::new(
            &self.llm,
            &self.store,
            &self.files,
            &self.hub,
            &self.replies,
            session_id,
            self.model.clone(),
            self.max_tokens,
            self.temperature,
            state,
        );

        // The signed login command is handled without the model. It is also
        // kept out of the scratchpad so the signature never reaches a prompt.
        if message.starts_with(LOGIN_SENTINEL) {
            info!(session_id, "login sentinel received");
            ops::login::finish_login(&mut ctx, message).await;
            ctx.flush().await;
            info!(session_id, "turn complete");
            return;
        }

        if let Err(e) = self.run_model_turn(&mut ctx, message).await {
            error!(session_id, error = %e, "turn aborted by model call failure");
            ctx.reply(&format!(
                "Unfortunately agent was stopped because of the error:\n{e}"
            ));
        }

        ctx.flush().await;
        info!(session_id, "turn complete");
    }

    async fn run_model_turn(
        &self,
        ctx: &mut TurnContext<'_, S, F, H, R>,
        message: &str,
    ) -> Result<(), LlmError> {
        let system = build_turn_system_prompt(&ctx.state);
        let tools = tool_definitions();
        let response = ctx
            .complete_with_tools(system, vec![Message::user(message)], &tools)
            .await?;

        ctx.state.record_user_message(message);

        if let Some(text) = response.text.as_deref() {
            if !text.trim().is_empty() {
                ctx.reply(text);
                ctx.state.record_assistant_text(text);
            }
        }

        for call in &response.tool_calls {
            let command = match ToolCommand::parse(call) {
                Ok(command) => command,
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "rejected tool call");
                    ctx.reply(&format!(
                        "Unfortunately agent was stopped because of the error:\n{e}"
                    ));
                    break;
                }
            };

            ctx.state.record_tool_call(command.tool_name(), &call.arguments);

            if let Err(e) = ops::dispatch(ctx, command).await {
                match e {
                    ops::OpError::Precondition(explanation) => {
                        // Rejection of this one call, explained to the user;
                        // later calls in the batch still run.
                        warn!(tool = %call.name, %explanation, "operation rejected");
                        ctx.reply(&explanation);
                    }
                    e => {
                        error!(tool = %call.name, error = %e, "operation failed");
                        ctx.reply(&format!(
                            "Unfortunately agent was stopped because of the error:\n{e}"
                        ));
                        break;
                    }
                }
            }
        }

        Ok(())
    }
}
