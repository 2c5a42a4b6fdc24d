//! LlmProvider trait definition.
//!
//! This is the core abstraction over the hub's inference endpoint.

use agentry_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ToolCompletionResponse, ToolDefinition,
};

/// Trait for LLM inference backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
///
/// Implementations live in agentry-infra (e.g., `NearAiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "nearai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;

    /// Send a completion request offering `tools`; the model may answer with
    /// text, tool calls, or both.
    fn complete_with_tools(
        &self,
        request: &CompletionRequest,
        tools: &[ToolDefinition],
    ) -> impl std::future::Future<Output = Result<ToolCompletionResponse, LlmError>> + Send;
}
