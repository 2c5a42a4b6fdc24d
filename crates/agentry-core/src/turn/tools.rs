//! The tool catalogue offered to the orchestrator LLM.
//!
//! Each tool has a typed argument struct; the JSON schema shown to the model
//! is derived from it, and the model's raw tool call is parsed back through
//! the same struct into a [`ToolCommand`] before anything executes. A call
//! that does not deserialize never reaches an operation.

use schemars::JsonSchema;
use serde::Deserialize;

use agentry_types::llm::{ToolCall, ToolDefinition};

// ---------------------------------------------------------------------------
// Argument structs
// ---------------------------------------------------------------------------

/// Arguments for `generate`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GenerateArgs {
    /// The name of the agent. Should match ^[a-zA-Z0-9_\-.]+$
    pub agent_name: String,
    /// A short description of the agent.
    pub agent_description: String,
    /// A markdown-formatted list of technical capabilities the agent has.
    /// This is a technical plan of what steps to take in the code, what APIs
    /// to use, what data to fetch, etc. Only a limited subset of packages is
    /// available, so keep to basic stuff; it is only for prototyping.
    pub agent_technical_plan: String,
}

/// Arguments for `update_agent`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateArgs {
    /// A markdown-formatted list of improvements to the existing code of the
    /// agent; it can be bugs, or additional features to implement. Only a
    /// limited subset of packages is available, so keep to basic stuff.
    pub update_plan: String,
}

/// Arguments for `upload`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UploadArgs {
    /// The version number of the agent.
    pub version: String,
}

/// Arguments for `create_secret`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateSecretArgs {
    /// The name of the secret.
    pub key: String,
    /// The value of the secret.
    pub value: String,
}

/// Arguments for `start_login_flow` (none).
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StartLoginArgs {}

/// Arguments for `finish_login_flow`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FinishLoginArgs {
    /// The login command, looking like: `nearai login save --accountId=ai.near
    /// --signature=some_signature --publicKey=some_public_key --nonce=nonce
    /// --callbackUrl=callback_url`
    pub login_command: String,
}

/// Arguments for `ask_user`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AskUserArgs {
    /// The question that the agent needs to ask the user.
    pub question: String,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// A validated tool invocation, ready for dispatch.
#[derive(Debug, Clone)]
pub enum ToolCommand {
    Generate(GenerateArgs),
    Update(UpdateArgs),
    Upload(UploadArgs),
    CreateSecret(CreateSecretArgs),
    StartLogin,
    FinishLogin(FinishLoginArgs),
    AskUser(AskUserArgs),
}

impl ToolCommand {
    /// Parse a raw model tool call into a command, validating its arguments
    /// against the tool's schema type.
    pub fn parse(call: &ToolCall) -> Result<Self, ToolParseError> {
        match call.name.as_str() {
            "generate" => parse_args(call).map(ToolCommand::Generate),
            "update_agent" => parse_args(call).map(ToolCommand::Update),
            "upload" => parse_args(call).map(ToolCommand::Upload),
            "create_secret" => parse_args(call).map(ToolCommand::CreateSecret),
            // No arguments to validate
            "start_login_flow" => Ok(ToolCommand::StartLogin),
            "finish_login_flow" => parse_args(call).map(ToolCommand::FinishLogin),
            "ask_user" => parse_args(call).map(ToolCommand::AskUser),
            other => Err(ToolParseError::UnknownTool(other.to_string())),
        }
    }

    /// The catalogue name of this command's tool.
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolCommand::Generate(_) => "generate",
            ToolCommand::Update(_) => "update_agent",
            ToolCommand::Upload(_) => "upload",
            ToolCommand::CreateSecret(_) => "create_secret",
            ToolCommand::StartLogin => "start_login_flow",
            ToolCommand::FinishLogin(_) => "finish_login_flow",
            ToolCommand::AskUser(_) => "ask_user",
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(call: &ToolCall) -> Result<T, ToolParseError> {
    serde_json::from_value(call.arguments.clone()).map_err(|e| ToolParseError::InvalidArguments {
        tool: call.name.clone(),
        message: e.to_string(),
    })
}

/// Errors turning a raw tool call into a [`ToolCommand`].
#[derive(Debug, thiserror::Error)]
pub enum ToolParseError {
    #[error("unknown tool: '{0}'")]
    UnknownTool(String),

    #[error("invalid arguments for '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },
}

/// The definitions offered to the model, in catalogue order.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        definition::<GenerateArgs>(
            "generate",
            "Generate a new NEAR AI agent and upload a test version to NEAR AI Hub.",
        ),
        definition::<UploadArgs>(
            "upload",
            "Release a new version of the agent to users. Call this only when the user asks \
             to do it. For development purposes, use `generate` instead.",
        ),
        definition::<UpdateArgs>(
            "update_agent",
            "Update the NEAR AI agent and upload a test version to NEAR AI Hub.",
        ),
        definition::<CreateSecretArgs>(
            "create_secret",
            "Saves a key-value pair (secret) in the agent's secure storage.",
        ),
        definition::<StartLoginArgs>(
            "start_login_flow",
            "Initiates the login process for the user. This tool creates the unique login \
             link that the user should paste into their browser, then follow the instructions.",
        ),
        definition::<FinishLoginArgs>(
            "finish_login_flow",
            "Finalizes the login process by saving the user's credentials. Execute this when \
             the user sends a command starting with `nearai login save` into the chat.",
        ),
        definition::<AskUserArgs>(
            "ask_user",
            "Sends a message to the user with a question from the agent. Use it to request \
             additional information or confirmation from a human. It does not return a \
             response directly; the user's answer arrives as the next message.",
        ),
    ]
}

fn definition<T: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let schema = schemars::schema_for!(T);
    let parameters =
        serde_json::to_value(schema).expect("tool schema serialization should not fail");
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        parameters,
    }
}
