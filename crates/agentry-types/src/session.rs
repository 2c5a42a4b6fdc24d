use serde::{Deserialize, Serialize};

use crate::metadata::AgentMetadata;
use crate::secret::SecretRequirement;

/// The persisted state of one conversation session.
///
/// Every field tolerates absence on load (`#[serde(default)]`) so that
/// documents written by older builds still deserialize. A session that has
/// not generated anything yet is simply `SessionState::default()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    /// Registry metadata of the agent under construction, once generated.
    pub metadata: Option<AgentMetadata>,
    /// Short name of the agent under construction.
    pub agent_name: String,
    /// One-line description of the agent under construction.
    pub agent_description: String,
    /// Full source of the generated agent program.
    pub agent_code: String,
    /// Version label of the most recent publish (e.g. "gen-20260825120000").
    pub last_version: String,
    /// Environment variables the generated code still needs, if any.
    pub pending_secrets: Option<SecretRequirement>,
    /// Append-only conversation memory, one entry per event.
    pub scratchpad: Vec<String>,
}

impl SessionState {
    /// Whether an agent program has been generated in this session.
    pub fn has_agent_code(&self) -> bool {
        !self.agent_code.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_loads_as_default() {
        let state: SessionState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn test_partial_document_fills_missing_fields() {
        let state: SessionState =
            serde_json::from_str(r#"{"agent_name":"weather-bot","agent_code":"def run(): pass"}"#)
                .unwrap();
        assert_eq!(state.agent_name, "weather-bot");
        assert!(state.has_agent_code());
        assert!(state.scratchpad.is_empty());
        assert!(state.metadata.is_none());
        assert!(state.pending_secrets.is_none());
    }

    #[test]
    fn test_roundtrip_preserves_scratchpad_order() {
        let mut state = SessionState::default();
        state.scratchpad.push("User: hello".to_string());
        state.scratchpad.push("Agent: hi".to_string());
        let json = serde_json::to_string(&state).unwrap();
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scratchpad, vec!["User: hello", "Agent: hi"]);
    }

    #[test]
    fn test_has_agent_code_ignores_whitespace() {
        let mut state = SessionState::default();
        assert!(!state.has_agent_code());
        state.agent_code = "   \n".to_string();
        assert!(!state.has_agent_code());
        state.agent_code = "print('hi')".to_string();
        assert!(state.has_agent_code());
    }
}
