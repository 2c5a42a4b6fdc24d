//! The builder operations and their dispatcher.
//!
//! Each operation is a free async function taking the per-turn context plus
//! its validated arguments. The dispatcher maps a parsed [`ToolCommand`] to
//! its operation; error policy lives with the caller in the turn engine.

pub mod ask;
pub mod generate;
pub mod login;
pub mod prompts;
pub mod publish;
pub mod secrets;
pub mod update;

use agentry_types::error::FileStoreError;
use agentry_types::llm::LlmError;

use crate::hub::{AuthService, RegistryService, ReplySink, SecretVault};
use crate::storage::{SessionFiles, SessionStore};
use crate::turn::TurnContext;
use crate::turn::tools::ToolCommand;

/// Errors an operation can surface to the turn engine.
///
/// `Precondition` carries a user-facing explanation and aborts only the one
/// operation; everything else aborts the remainder of the turn's dispatch
/// list with an apologetic reply.
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Files(#[from] FileStoreError),

    #[error("not logged in")]
    NotAuthenticated,

    #[error("{0}")]
    Precondition(String),
}

/// Run one validated command against the turn context.
pub async fn dispatch<S, F, H, R>(
    ctx: &mut TurnContext<'_, S, F, H, R>,
    command: ToolCommand,
) -> Result<(), OpError>
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    match command {
        ToolCommand::Generate(args) => generate::generate(ctx, args).await,
        ToolCommand::Update(args) => update::update_agent(ctx, args).await,
        ToolCommand::Upload(args) => {
            publish::upload_requested(ctx, &args.version).await;
            Ok(())
        }
        ToolCommand::CreateSecret(args) => secrets::create_secret(ctx, args).await,
        ToolCommand::StartLogin => {
            login::start_login(ctx);
            Ok(())
        }
        ToolCommand::FinishLogin(args) => {
            login::finish_login(ctx, &args.login_command).await;
            Ok(())
        }
        ToolCommand::AskUser(args) => {
            ask::ask_user(ctx, &args.question);
            Ok(())
        }
    }
}

/// Strip a Markdown code fence (e.g. ```python ... ```) off a model reply.
///
/// Models are told to answer with bare code, but routinely fence it anyway.
/// Unfenced text comes back unchanged apart from surrounding whitespace.
pub(crate) fn strip_code_fences(text: &str, language: &str) -> String {
    let trimmed = text.trim();

    let without_open = if let Some(rest) = trimmed.strip_prefix(&format!("```{language}")) {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        trimmed
    };

    let without_close = without_open.strip_suffix("```").unwrap_or(without_open);
    without_close.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_python_fence() {
        let text = "```python\ndef run(env):\n    pass\n```";
        assert_eq!(
            strip_code_fences(text, "python"),
            "def run(env):\n    pass"
        );
    }

    #[test]
    fn test_strip_bare_fence() {
        assert_eq!(strip_code_fences("```\nx = 1\n```", "python"), "x = 1");
    }

    #[test]
    fn test_unfenced_text_unchanged() {
        assert_eq!(
            strip_code_fences("  def run(env): pass\n", "python"),
            "def run(env): pass"
        );
    }

    #[test]
    fn test_strip_json_fence() {
        let text = "```json\n{\"use_secrets\": false}\n```";
        assert_eq!(strip_code_fences(text, "json"), "{\"use_secrets\": false}");
    }
}
