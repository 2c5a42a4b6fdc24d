//! The two-phase hub login flow.
//!
//! Phase one hands the user a signing URL; phase two parses the
//! `nearai login save ...` command they paste back, validates and installs
//! the credentials, and mirrors them into the vault so hosted agents can
//! publish on the user's behalf.

use std::collections::BTreeMap;

use chrono::Utc;

use agentry_types::auth::AuthCredentials;
use agentry_types::error::AuthError;
use agentry_types::metadata::AgentMetadata;
use agentry_types::secret::SecretSpec;

use crate::hub::{AuthService, RegistryService, ReplySink, SecretVault};
use crate::ops::secrets;
use crate::storage::{SessionFiles, SessionStore};
use crate::turn::{LOGIN_SENTINEL, TurnContext};

const AUTH_URL: &str = "https://auth.near.ai";
const MESSAGE: &str = "Welcome to NEAR AI";
const RECIPIENT: &str = "ai.near";

/// Hand the user a signing URL. Nothing is persisted; the nonce only has to
/// be fresh, not remembered.
pub(crate) fn start_login<S, F, H, R>(ctx: &TurnContext<'_, S, F, H, R>)
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    let nonce = Utc::now().timestamp_millis().to_string();
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("message", MESSAGE)
        .append_pair("nonce", &nonce)
        .append_pair("recipient", RECIPIENT)
        .finish();

    ctx.reply(&format!(
        "Please visit the following URL to complete the login process: {AUTH_URL}?{query}\n\
         After visiting the URL, follow the instructions to save your auth signature"
    ));
}

/// Finalize the login from the pasted `nearai login save ...` command.
///
/// Every failure mode ends in a user-facing reply; this never aborts the
/// rest of the turn.
pub(crate) async fn finish_login<S, F, H, R>(
    ctx: &mut TurnContext<'_, S, F, H, R>,
    login_command: &str,
) where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    if let Err(e) = try_finish_login(ctx, login_command).await {
        ctx.reply(&format!("Error happen when finalizing login flow:\n{e}"));
    }
}

async fn try_finish_login<S, F, H, R>(
    ctx: &mut TurnContext<'_, S, F, H, R>,
    login_command: &str,
) -> Result<(), AuthError>
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    let fields = parse_login_command(login_command)?;

    let (Some(account_id), Some(signature), Some(public_key), Some(callback_url), Some(nonce)) = (
        fields.get("accountId"),
        fields.get("signature"),
        fields.get("publicKey"),
        fields.get("callbackUrl"),
        fields.get("nonce"),
    ) else {
        ctx.reply("Data is missed in the provided login command");
        return Ok(());
    };

    // When the login replaces another account, the vault copy stays under
    // the old namespace where previously generated agents look it up.
    let namespace = match ctx.hub.credentials() {
        Some(previous) if previous.account_id != *account_id => previous.account_id,
        _ => account_id.clone(),
    };

    let credentials = AuthCredentials {
        account_id: account_id.clone(),
        signature: signature.clone(),
        public_key: public_key.clone(),
        callback_url: callback_url.clone(),
        nonce: nonce.clone(),
        recipient: RECIPIENT.to_string(),
        message: MESSAGE.to_string(),
    };

    let success = ctx.hub.update_auth_config(&credentials).await?;
    ctx.reply(if success {
        "Login successful"
    } else {
        "Login failed. Please try again."
    });

    ctx.hub.install_credentials(credentials.clone());

    if success {
        save_auth_as_secret(ctx, &credentials, namespace).await;
    }

    Ok(())
}

/// Mirror the credential record into the vault under `NEARAI_CONFIG`.
/// Failures here are logged only; the login itself already succeeded.
async fn save_auth_as_secret<S, F, H, R>(
    ctx: &TurnContext<'_, S, F, H, R>,
    credentials: &AuthCredentials,
    namespace: String,
) where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    tracing::info!(namespace = %namespace, "saving auth secret");

    let value = match serde_json::to_string(credentials) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "cannot save NEARAI_CONFIG secret");
            return;
        }
    };

    // Scope to the agent's published identity when metadata exists; a login
    // before any generation falls back to the session's plain name fields.
    let (name, description) = match read_metadata_identity(ctx).await {
        Some(identity) => identity,
        None => (
            ctx.state.agent_name.clone(),
            ctx.state.agent_description.clone(),
        ),
    };

    let spec = SecretSpec {
        namespace,
        name,
        version: String::new(),
        description,
        key: "NEARAI_CONFIG".to_string(),
        value,
        category: "agent".to_string(),
    };
    if !secrets::store_secret(ctx, &spec).await {
        tracing::warn!("cannot save NEARAI_CONFIG secret");
    }
}

async fn read_metadata_identity<S, F, H, R>(
    ctx: &TurnContext<'_, S, F, H, R>,
) -> Option<(String, String)>
where
    S: SessionStore,
    F: SessionFiles,
    H: RegistryService + SecretVault + AuthService,
    R: ReplySink,
{
    let raw = ctx.files.read_file("metadata.json").await.ok()??;
    let metadata: AgentMetadata = serde_json::from_str(&raw).ok()?;
    Some((metadata.name, metadata.description))
}

/// Extract `--key=value` flags from the pasted command.
///
/// Values may be shell-quoted; keys are restricted to word characters and
/// anything that does not look like a flag is ignored.
pub(crate) fn parse_login_command(command: &str) -> Result<BTreeMap<String, String>, AuthError> {
    if !command.starts_with(LOGIN_SENTINEL) {
        return Err(AuthError::NotLoginCommand);
    }

    let mut fields = BTreeMap::new();
    for token in split_shell_words(command)? {
        if let Some((key, value)) = parse_flag(&token) {
            fields.insert(key.to_string(), value.to_string());
        }
    }
    Ok(fields)
}

fn parse_flag(token: &str) -> Option<(&str, &str)> {
    let rest = token.strip_prefix("--")?;
    let (key, value) = rest.split_once('=')?;
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    if value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Minimal POSIX-style word splitting: whitespace separates, single and
/// double quotes group, backslash escapes the next character.
fn split_shell_words(input: &str) -> Result<Vec<String>, AuthError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some('\'') => {
                if c == '\'' {
                    quote = None;
                } else {
                    current.push(c);
                }
            }
            Some(_) => match c {
                '"' => quote = None,
                '\\' => match chars.next() {
                    Some('"') => current.push('"'),
                    Some('\\') => current.push('\\'),
                    Some(other) => {
                        current.push('\\');
                        current.push(other);
                    }
                    None => {
                        return Err(AuthError::Malformed("trailing backslash".to_string()));
                    }
                },
                _ => current.push(c),
            },
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_word = true;
                }
                '\\' => match chars.next() {
                    Some(escaped) => {
                        current.push(escaped);
                        in_word = true;
                    }
                    None => {
                        return Err(AuthError::Malformed("trailing backslash".to_string()));
                    }
                },
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                _ => {
                    current.push(c);
                    in_word = true;
                }
            },
        }
    }

    if quote.is_some() {
        return Err(AuthError::Malformed("unterminated quote".to_string()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
