//! Relay a clarification question and note it for the next turn's prompt.

use crate::hub::{AuthService, RegistryService, ReplySink, SecretVault};
use crate::session::SessionStateExt;
use crate::storage::{SessionFiles, SessionStore};
use crate::turn::TurnContext;

pub(crate) fn ask_user<S, F, H, R>(ctx: &mut TurnContext<'_, S, F, H, R>, question: &str)
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    tracing::debug!(question, "writing question to scratchpad");
    ctx.state.record_question(question);
    ctx.reply(question);
}
