use serde::{Deserialize, Serialize};

/// Default inference model baked into generated agents.
const GENERATED_MODEL: &str = "deepseek-3";
const INFERENCE_FRAMEWORK: &str = "nearai";
const AGENT_FRAMEWORK: &str = "web-agent";

/// Registry metadata document for an agent entry (`metadata.json`).
///
/// Field order matches the document the generator writes. Unknown keys are
/// kept in `extra` so a hand-edited document survives a load/store cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMetadata {
    pub name: String,
    /// Empty until the publisher stamps a concrete version.
    pub version: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub details: AgentDetails,
    pub show_entry: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The `details` object of an agent entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDetails {
    pub agent: AgentRuntime,
    /// Hub-managed keys such as `_source` land here.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRuntime {
    pub defaults: AgentDefaults,
    pub framework: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDefaults {
    pub model: String,
    pub inference_framework: String,
}

impl AgentMetadata {
    /// Metadata for a freshly generated agent, version left empty.
    pub fn generated(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            description: description.into(),
            category: "agent".to_string(),
            tags: vec!["generated".to_string()],
            details: AgentDetails {
                agent: AgentRuntime {
                    defaults: AgentDefaults {
                        model: GENERATED_MODEL.to_string(),
                        inference_framework: INFERENCE_FRAMEWORK.to_string(),
                    },
                    framework: AGENT_FRAMEWORK.to_string(),
                },
                extra: serde_json::Map::new(),
            },
            show_entry: true,
            extra: serde_json::Map::new(),
        }
    }

    /// True when the entry was imported from another namespace.
    ///
    /// The hub marks imported entries with a `details._source` key; those
    /// must never be re-published under the caller's namespace.
    pub fn has_foreign_source(&self) -> bool {
        self.details.extra.contains_key("_source")
    }
}
