//! SessionState accumulator logic.
//!
//! The `SessionState` struct lives in `agentry-types`; this module provides
//! an extension trait (`SessionStateExt`) with the mutation helpers a turn
//! needs: scratchpad accumulation and pending-secret bookkeeping. The
//! extension trait pattern is used because the behavior belongs with the
//! turn engine, not with the plain data crate.

use agentry_types::secret::SecretRequirement;
use agentry_types::session::SessionState;

/// Extension trait for `SessionState` mutation during a turn.
pub trait SessionStateExt {
    /// Append one entry to the conversation scratchpad. Entries are never
    /// rewritten or removed.
    fn append_scratchpad(&mut self, entry: impl Into<String>);

    /// Record an incoming user message in the scratchpad.
    fn record_user_message(&mut self, content: &str);

    /// Record an assistant reply in the scratchpad.
    fn record_assistant_text(&mut self, content: &str);

    /// Record a question the assistant asked the user.
    fn record_question(&mut self, question: &str);

    /// Record a tool invocation (name plus compact argument JSON).
    fn record_tool_call(&mut self, name: &str, arguments: &serde_json::Value);

    /// The scratchpad as one newline-joined block for prompt assembly.
    fn scratchpad_text(&self) -> String;

    /// Names of environment variables the generated code still needs.
    fn outstanding_secret_keys(&self) -> Vec<&str>;

    /// Replace the pending-secret record from a fresh detector run.
    fn set_pending_secrets(&mut self, requirement: SecretRequirement);
}

impl SessionStateExt for SessionState {
    fn append_scratchpad(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        tracing::debug!(entry = %entry, "scratchpad append");
        self.scratchpad.push(entry);
    }

    fn record_user_message(&mut self, content: &str) {
        self.append_scratchpad(format!("User: {content}"));
    }

    fn record_assistant_text(&mut self, content: &str) {
        self.append_scratchpad(format!("Assistant: {content}"));
    }

    fn record_question(&mut self, question: &str) {
        self.append_scratchpad(format!("Agent: {question}"));
    }

    fn record_tool_call(&mut self, name: &str, arguments: &serde_json::Value) {
        let compact = serde_json::to_string(arguments).unwrap_or_else(|_| "{}".to_string());
        self.append_scratchpad(format!("Tool {name}: {compact}"));
    }

    fn scratchpad_text(&self) -> String {
        self.scratchpad.join("\n")
    }

    fn outstanding_secret_keys(&self) -> Vec<&str> {
        match &self.pending_secrets {
            Some(req) if req.is_outstanding() => req.keys.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    fn set_pending_secrets(&mut self, requirement: SecretRequirement) {
        if requirement.use_secrets {
            self.pending_secrets = Some(requirement);
        } else {
            self.pending_secrets = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_scratchpad_entries_keep_arrival_order() {
        let mut state = SessionState::default();
        state.record_user_message("build me a bot");
        state.record_tool_call("generate", &serde_json::json!({"agent_name": "bot"}));
        state.record_question("Shall I proceed?");
        assert_eq!(
            state.scratchpad,
            vec![
                "User: build me a bot",
                "Tool generate: {\"agent_name\":\"bot\"}",
                "Agent: Shall I proceed?",
            ]
        );
    }

    #[test]
    fn test_scratchpad_text_joins_with_newlines() {
        let mut state = SessionState::default();
        state.record_user_message("one");
        state.record_assistant_text("two");
        assert_eq!(state.scratchpad_text(), "User: one\nAssistant: two");
    }

    #[test]
    fn test_outstanding_keys_empty_without_requirement() {
        let state = SessionState::default();
        assert!(state.outstanding_secret_keys().is_empty());
    }

    #[test]
    fn test_outstanding_keys_listed_in_order() {
        let mut state = SessionState::default();
        let mut keys = BTreeMap::new();
        keys.insert("B_KEY".to_string(), "why b".to_string());
        keys.insert("A_KEY".to_string(), "why a".to_string());
        state.set_pending_secrets(SecretRequirement {
            use_secrets: true,
            keys,
            values: None,
        });
        assert_eq!(state.outstanding_secret_keys(), vec!["A_KEY", "B_KEY"]);
    }

    #[test]
    fn test_negative_detection_clears_pending() {
        let mut state = SessionState::default();
        let mut keys = BTreeMap::new();
        keys.insert("KEY".to_string(), "why".to_string());
        state.set_pending_secrets(SecretRequirement {
            use_secrets: true,
            keys,
            values: None,
        });
        assert!(state.pending_secrets.is_some());

        state.set_pending_secrets(SecretRequirement::none());
        assert!(state.pending_secrets.is_none());
    }
}
