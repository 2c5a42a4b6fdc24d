//! NEAR AI wire types for the chat completions endpoint.
//!
//! These are the request/response structures for the hub's OpenAI-compatible
//! `/chat/completions` API. NOT the generic LLM types from `agentry-types`
//! -- those are provider-agnostic.

use serde::{Deserialize, Serialize};

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ChatTool>>,
}

/// One message on the wire. The generic request's system prompt travels as
/// the first entry with role `"system"`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// A tool offered to the model, in the `{"type": "function", ...}` envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTool {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: ChatFunction,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatFunction {
    pub name: String,
    pub description: String,
    /// JSON Schema for the arguments object.
    pub parameters: serde_json::Value,
}

/// Response body for `POST /chat/completions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: ChatUsage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The assistant message inside a choice. Either side can be absent: a pure
/// tool-call answer has no content, a pure text answer has no tool calls.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ChatToolCall>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatToolCall {
    #[serde(default)]
    pub id: Option<String>,
    pub function: ChatFunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatFunctionCall {
    pub name: String,
    /// The arguments object, JSON-encoded as a string on the wire.
    pub arguments: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_absent_fields() {
        let request = ChatCompletionRequest {
            model: "deepseek-3".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            max_tokens: 64,
            temperature: None,
            tools: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("tools").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_request_tool_envelope_shape() {
        let request = ChatCompletionRequest {
            model: "deepseek-3".to_string(),
            messages: Vec::new(),
            max_tokens: 64,
            temperature: Some(0.2),
            tools: Some(vec![ChatTool {
                kind: "function".to_string(),
                function: ChatFunction {
                    name: "generate".to_string(),
                    description: "Generate an agent".to_string(),
                    parameters: serde_json::json!({"type": "object"}),
                },
            }]),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tools"][0]["type"], "function");
        assert_eq!(json["tools"][0]["function"]["name"], "generate");
        assert_eq!(json["tools"][0]["function"]["parameters"]["type"], "object");
        assert_eq!(json["temperature"], 0.2);
    }

    #[test]
    fn test_response_text_deserialization() {
        let json = r#"{
            "id": "chatcmpl-123",
            "model": "deepseek-3",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hello there"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.id, "chatcmpl-123");
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].message.content.as_deref(), Some("Hello there"));
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.prompt_tokens, 12);
        assert_eq!(response.usage.completion_tokens, 5);
    }

    #[test]
    fn test_response_tool_call_deserialization() {
        let json = r#"{
            "id": "chatcmpl-456",
            "model": "deepseek-3",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "generate",
                            "arguments": "{\"agent_name\": \"price-bot\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        let message = &response.choices[0].message;
        assert!(message.content.is_none());
        let calls = message.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].id.as_deref(), Some("call_abc"));
        assert_eq!(calls[0].function.name, "generate");
        // Arguments stay a string at this layer
        assert!(calls[0].function.arguments.contains("price-bot"));
        // Usage missing entirely defaults to zero
        assert_eq!(response.usage.prompt_tokens, 0);
    }

    #[test]
    fn test_response_tolerates_missing_optional_fields() {
        let json = r#"{"choices": [{"message": {}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.id, "");
        assert!(response.choices[0].message.content.is_none());
        assert!(response.choices[0].message.tool_calls.is_none());
        assert!(response.choices[0].finish_reason.is_none());
    }
}
