//! First-time agent generation: metadata, two-pass codegen, secret check,
//! then an automatic dev upload.

use chrono::Utc;

use agentry_types::llm::Message;
use agentry_types::metadata::AgentMetadata;

use crate::hub::{AuthService, RegistryService, ReplySink, SecretVault};
use crate::ops::{OpError, prompts, publish, secrets, strip_code_fences};
use crate::session::SessionStateExt;
use crate::storage::{SessionFiles, SessionStore};
use crate::turn::TurnContext;
use crate::turn::tools::GenerateArgs;

pub(crate) async fn generate<S, F, H, R>(
    ctx: &mut TurnContext<'_, S, F, H, R>,
    args: GenerateArgs,
) -> Result<(), OpError>
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    tracing::info!(name = %args.agent_name, "generating agent");

    ctx.state.agent_name = args.agent_name.clone();
    ctx.state.agent_description = args.agent_description.clone();

    let metadata = AgentMetadata::generated(&args.agent_name, &args.agent_description);
    let metadata_json = serde_json::to_string_pretty(&metadata)
        .expect("generated metadata serialization should not fail");
    ctx.files.write_file("metadata.json", &metadata_json).await?;

    let agent_code = generate_agent_code(ctx, &args.agent_technical_plan).await?;
    ctx.reply(&format!(
        "I have generated code for you: \n```python\n{agent_code}```"
    ));

    let requirement = secrets::detect_secret_requirements(ctx, &agent_code).await?;
    ctx.state.set_pending_secrets(requirement.clone());
    if requirement.use_secrets {
        secrets::provide_secret_instructions(ctx, &requirement, &agent_code).await?;
    }

    ctx.files.write_file("agent.py", &agent_code).await?;

    let version = format!("gen-{}", Utc::now().format("%Y%m%d%H%M%S"));
    ctx.state.last_version = version.clone();
    ctx.state.agent_code = agent_code;
    ctx.flush().await;

    publish::publish_and_report(ctx, &version).await;
    Ok(())
}

/// Two-pass code generation: draft against the plan, then a guideline-driven
/// review pass over the draft.
async fn generate_agent_code<S, F, H, R>(
    ctx: &TurnContext<'_, S, F, H, R>,
    technical_plan: &str,
) -> Result<String, OpError>
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    tracing::debug!("generating agent.py");

    let mut conversation = vec![Message::system(prompts::generate_code_prompt(
        technical_plan,
    ))];
    let first = ctx.complete(None, conversation.clone()).await?;
    let draft = strip_code_fences(&first.content, "python");

    conversation.push(Message::assistant(draft));
    conversation.push(Message::user(prompts::CODE_GUIDELINES));
    let reviewed = ctx.complete(None, conversation).await?;

    Ok(strip_code_fences(&reviewed.content, "python"))
}
