use serde::{Deserialize, Serialize};

/// Global configuration, loaded from `config.toml` in the data directory.
///
/// Every field has a default so a missing or partial file still yields a
/// working configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentryConfig {
    /// Model used for the orchestrator's own completions.
    pub model: String,
    /// Base URL of the hub's OpenAI-compatible inference endpoint.
    pub inference_url: String,
    /// Base URL of the hub's registry and secret-vault API.
    pub hub_url: String,
    /// Token budget per completion call.
    pub max_tokens: u32,
    /// Sampling temperature; provider default when unset.
    pub temperature: Option<f64>,
}

impl Default for AgentryConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            inference_url: default_inference_url(),
            hub_url: default_hub_url(),
            max_tokens: default_max_tokens(),
            temperature: None,
        }
    }
}

fn default_model() -> String {
    "deepseek-3".to_string()
}

fn default_inference_url() -> String {
    "https://api.near.ai/v1".to_string()
}

fn default_hub_url() -> String {
    "https://api.near.ai".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}
