//! Secret detection and vault storage.

use agentry_types::llm::{LlmError, Message};
use agentry_types::secret::{SecretRequirement, SecretSpec};

use crate::hub::{AuthService, RegistryService, ReplySink, SecretVault};
use crate::ops::{OpError, prompts, strip_code_fences};
use crate::storage::{SessionFiles, SessionStore};
use crate::turn::TurnContext;
use crate::turn::tools::CreateSecretArgs;

/// Ask the model whether the generated code needs credentials.
///
/// A reply that is not valid JSON degrades to "no secrets needed" rather than
/// failing the generation; only transport-level faults propagate.
pub(crate) async fn detect_secret_requirements<S, F, H, R>(
    ctx: &TurnContext<'_, S, F, H, R>,
    agent_code: &str,
) -> Result<SecretRequirement, LlmError>
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    let response = ctx
        .complete(
            Some(prompts::DETECT_SECRETS_PROMPT),
            vec![Message::user(agent_code)],
        )
        .await?;

    tracing::debug!(reply = %response.content, "secret detector replied");

    let raw = strip_code_fences(&response.content, "json");
    match serde_json::from_str::<SecretRequirement>(&raw) {
        Ok(requirement) => Ok(requirement),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "cannot figure out what env variables are used, skipping this step"
            );
            Ok(SecretRequirement::none())
        }
    }
}

/// Tell the user how to obtain and hand over the keys the code needs.
pub(crate) async fn provide_secret_instructions<S, F, H, R>(
    ctx: &TurnContext<'_, S, F, H, R>,
    secrets: &SecretRequirement,
    agent_code: &str,
) -> Result<(), LlmError>
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    let listing = serde_json::to_string(secrets).unwrap_or_else(|_| "{}".to_string());
    let response = ctx
        .complete(
            Some(prompts::SECRET_INSTRUCTIONS_PROMPT),
            vec![
                Message::user(format!("Code of the agent: \n{agent_code}")),
                Message::user(format!(
                    "List of environment variables or secrets that user should provide \n{listing}"
                )),
            ],
        )
        .await?;
    ctx.reply(&response.content);
    Ok(())
}

/// Store one key-value pair in the hub vault, scoped to the session's agent.
pub(crate) async fn create_secret<S, F, H, R>(
    ctx: &mut TurnContext<'_, S, F, H, R>,
    args: CreateSecretArgs,
) -> Result<(), OpError>
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    let Some(credentials) = ctx.hub.credentials() else {
        return Err(OpError::NotAuthenticated);
    };

    let Some(metadata) = ctx.state.metadata.clone() else {
        ctx.reply("I cannot create secret for you because I should create an agent first.");
        return Ok(());
    };

    let spec = SecretSpec {
        namespace: credentials.namespace().to_string(),
        name: metadata.name.clone(),
        version: String::new(),
        description: metadata.description.clone(),
        key: args.key.clone(),
        value: args.value,
        category: "agent".to_string(),
    };
    store_secret(ctx, &spec).await;

    // Storage faults are logged, not surfaced; the confirmation is
    // unconditional.
    ctx.reply(&format!("I've saved {} for you.", args.key));
    Ok(())
}

/// Delete-then-create against the vault. Failures are logged, never raised.
pub(crate) async fn store_secret<S, F, H, R>(
    ctx: &TurnContext<'_, S, F, H, R>,
    spec: &SecretSpec,
) -> bool
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    // The hub rejects duplicate keys, so clear any previous value first.
    if let Err(e) = ctx.hub.delete_secret(spec).await {
        tracing::debug!(key = %spec.key, error = %e, "secret was not deleted");
    }

    match ctx.hub.create_secret(spec).await {
        Ok(()) => {
            tracing::info!(key = %spec.key, namespace = %spec.namespace, "secret saved");
            true
        }
        Err(e) => {
            tracing::error!(key = %spec.key, error = %e, "secret was not saved");
            false
        }
    }
}
