//! NEAR AI inference client implementing the LlmProvider trait.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use agentry_core::llm::provider::LlmProvider;
use agentry_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, ToolCall,
    ToolCompletionResponse, ToolDefinition, Usage,
};

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatFunction, ChatMessage, ChatTool,
};

/// NEAR AI hub inference provider.
///
/// Speaks the hub's OpenAI-compatible `/chat/completions` dialect. The bearer
/// token is the serialized login record, so the same credentials that publish
/// to the registry also authorize inference.
pub struct NearAiProvider {
    client: reqwest::Client,
    auth: Option<SecretString>,
    base_url: String,
}

impl NearAiProvider {
    /// Create a provider for the endpoint at `inference_url`.
    ///
    /// `auth` is the serialized login record, absent when the session runs
    /// logged out.
    pub fn new(inference_url: impl Into<String>, auth: Option<SecretString>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // 5 min timeout for long generations
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            auth,
            base_url: inference_url.into(),
        }
    }

    /// Build a full URL from a path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Convert a generic [`CompletionRequest`] to the wire format, folding
    /// the system prompt in as the leading message.
    fn to_chat_request(
        &self,
        request: &CompletionRequest,
        tools: Option<&[ToolDefinition]>,
    ) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        for message in &request.messages {
            messages.push(ChatMessage {
                role: message.role.to_string(),
                content: message.content.clone(),
            });
        }

        ChatCompletionRequest {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            tools: tools.map(|tools| {
                tools
                    .iter()
                    .map(|tool| ChatTool {
                        kind: "function".to_string(),
                        function: ChatFunction {
                            name: tool.name.clone(),
                            description: tool.description.clone(),
                            parameters: tool.parameters.clone(),
                        },
                    })
                    .collect()
            }),
        }
    }

    /// POST the request and deserialize the response, mapping HTTP failures
    /// to [`LlmError`].
    async fn post_chat(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let mut builder = self
            .client
            .post(self.url("/chat/completions"))
            .header("content-type", "application/json")
            .json(body);
        if let Some(auth) = &self.auth {
            builder = builder.bearer_auth(auth.expose_secret());
        }

        let response = builder.send().await.map_err(|e| LlmError::Provider {
            message: format!("HTTP request failed: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited {
                    retry_after_ms: None,
                },
                503 | 529 => LlmError::Overloaded(error_body),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))
    }
}

// NearAiProvider intentionally does NOT derive Debug to prevent accidental
// exposure of the bearer credentials in logs or error messages.

impl LlmProvider for NearAiProvider {
    fn name(&self) -> &str {
        "nearai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_chat_request(request, None);
        let response = self.post_chat(&body).await?;
        to_completion_response(response)
    }

    async fn complete_with_tools(
        &self,
        request: &CompletionRequest,
        tools: &[ToolDefinition],
    ) -> Result<ToolCompletionResponse, LlmError> {
        let body = self.to_chat_request(request, Some(tools));
        let response = self.post_chat(&body).await?;
        to_tool_response(response)
    }
}

/// Convert a wire response to a generic [`CompletionResponse`].
fn to_completion_response(
    response: ChatCompletionResponse,
) -> Result<CompletionResponse, LlmError> {
    let usage = to_usage(response.usage);
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Deserialization("response carried no choices".to_string()))?;

    Ok(CompletionResponse {
        id: response.id,
        content: choice.message.content.unwrap_or_default(),
        model: response.model,
        stop_reason: map_finish_reason(choice.finish_reason.as_deref()),
        usage,
    })
}

/// Convert a wire response to a generic [`ToolCompletionResponse`], parsing
/// each tool call's JSON-encoded argument string.
fn to_tool_response(response: ChatCompletionResponse) -> Result<ToolCompletionResponse, LlmError> {
    let usage = to_usage(response.usage);
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Deserialization("response carried no choices".to_string()))?;

    let text = choice.message.content.filter(|content| !content.is_empty());
    let mut tool_calls = Vec::new();
    for call in choice.message.tool_calls.unwrap_or_default() {
        let arguments = serde_json::from_str(&call.function.arguments).map_err(|e| {
            LlmError::Deserialization(format!(
                "tool call '{}' arguments are not valid JSON: {e}",
                call.function.name
            ))
        })?;
        tool_calls.push(ToolCall {
            id: call.id,
            name: call.function.name,
            arguments,
        });
    }

    // Some backends report finish_reason "stop" even when tool calls are
    // present; the calls themselves are authoritative.
    let stop_reason = if tool_calls.is_empty() {
        map_finish_reason(choice.finish_reason.as_deref())
    } else {
        StopReason::ToolUse
    };

    Ok(ToolCompletionResponse {
        id: response.id,
        text,
        tool_calls,
        model: response.model,
        stop_reason,
        usage,
    })
}

fn to_usage(usage: super::types::ChatUsage) -> Usage {
    Usage {
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
    }
}

fn map_finish_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("length") => StopReason::MaxTokens,
        Some("tool_calls") => StopReason::ToolUse,
        Some("content_filter") => StopReason::ContentFilter,
        // "stop", anything unrecognized, or absent
        _ => StopReason::EndTurn,
    }
}
