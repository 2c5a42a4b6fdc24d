//! Iteration over previously generated code.
//!
//! The rewrite is a single pass and deliberately skips the secret detector;
//! keys flagged at generation time stay pending until the user supplies them.

use chrono::Utc;

use agentry_types::llm::Message;

use crate::hub::{AuthService, RegistryService, ReplySink, SecretVault};
use crate::ops::{OpError, prompts, publish, strip_code_fences};
use crate::storage::{SessionFiles, SessionStore};
use crate::turn::TurnContext;
use crate::turn::tools::UpdateArgs;

pub(crate) async fn update_agent<S, F, H, R>(
    ctx: &mut TurnContext<'_, S, F, H, R>,
    args: UpdateArgs,
) -> Result<(), OpError>
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    tracing::info!(plan = %args.update_plan, "updating agent");

    if !ctx.state.has_agent_code() {
        tracing::warn!("agent was not created yet or was not saved");
    }

    let prompt = prompts::regenerate_code_prompt(&ctx.state.agent_code, &args.update_plan);
    let response = ctx.complete(None, vec![Message::system(prompt)]).await?;
    let agent_code = strip_code_fences(&response.content, "python");

    ctx.reply(&format!(
        "I have generated the updated code for you: \n```python\n{agent_code}```"
    ));

    let Some(metadata) = ctx.state.metadata.clone() else {
        return Err(OpError::Precondition(
            "I cannot update the agent because it was never published in this session. \
             Please generate it first."
                .to_string(),
        ));
    };
    let metadata_json = serde_json::to_string_pretty(&metadata)
        .expect("session metadata serialization should not fail");
    ctx.files.write_file("metadata.json", &metadata_json).await?;

    ctx.files.write_file("agent.py", &agent_code).await?;
    ctx.state.agent_code = agent_code;

    let version = format!("gen-{}", Utc::now().format("%Y%m%d%H%M%S"));
    ctx.state.last_version = version.clone();

    publish::publish_and_report(ctx, &version).await;
    Ok(())
}
