//! Turn system prompt builder.
//!
//! Constructs the system prompt for the orchestrator LLM using XML tag
//! boundaries. Sections appear in a fixed order: role, secrets guidance,
//! conversation memory, and (once code exists) the current agent source.
//! The model decides between answering in text and invoking tools based on
//! which sections are present.

use agentry_types::session::SessionState;

use crate::session::SessionStateExt;

// ---------------------------------------------------------------------------
// System prompt builder
// ---------------------------------------------------------------------------

/// Build the complete turn system prompt with XML-tagged sections.
///
/// The prompt includes:
/// - `<builder_role>`: what the orchestrator is and which tool fits which ask
/// - `<secrets_guidance>`: vault usage rules, extended with the concrete
///   environment variable names once the detector has flagged the code
/// - `<conversation_memory>`: the append-only scratchpad
/// - `<existing_agent>`: the generated source, present only after `generate`
///   has run, steering the model toward `update_agent` from then on
pub fn build_turn_system_prompt(state: &SessionState) -> String {
    let mut sections = Vec::with_capacity(4);

    sections.push(format!(
        "<builder_role>\n{}\n</builder_role>",
        build_role_section()
    ));

    sections.push(format!(
        "<secrets_guidance>\n{}\n</secrets_guidance>",
        build_secrets_section(state)
    ));

    sections.push(format!(
        "<conversation_memory>\n{}\n</conversation_memory>",
        build_memory_section(state)
    ));

    // Only after generate has produced code
    if state.has_agent_code() {
        sections.push(format!(
            "<existing_agent>\n{}\n</existing_agent>",
            build_existing_agent_section(state)
        ));
    }

    sections.join("\n\n")
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn build_role_section() -> &'static str {
    "You are an agent that builds other agents.\n\
    Before running the `generate` tool, ask if the user confirms your plan; use the `ask_user` tool for that.\n\
    Use the `generate` tool when the user asks to build an agent.\n\
    Use the `update_agent` tool when the user wants to make any improvements in the code you generated.\n\
    Use the `create_secret` tool when the user wants to save any secret or api key into the secure agent's vault.\n\
    Use the `start_login_flow` tool when the user wants to log in.\n\
    Use the `finish_login_flow` tool when the user message starts with `nearai login save`.\n\
    Use the `ask_user` tool when you need to request additional information from the user.\n\
    When the user only asks questions, respond only with a short text answer, without invoking any tools."
}

fn build_secrets_section(state: &SessionState) -> String {
    let mut guidance = "The user can provide you with instructions or keys which can be useful \
        to make private API calls. In that case you should save the secrets into the secret \
        vault using the `create_secret` tool. You must generate the agent first, and only \
        after that can you ask for the api keys."
        .to_string();

    let outstanding = state.outstanding_secret_keys();
    if !outstanding.is_empty() {
        guidance.push_str(&format!(
            "\nThe current code expects these environment variables: {}. \
            Make sure that you save secrets with the correct keys from this list.",
            outstanding.join(", ")
        ));
    }

    guidance
}

fn build_memory_section(state: &SessionState) -> String {
    format!(
        "You have memory of the previous conversation with the user; it is called the scratchpad.\n\
        The scratchpad is updated automatically.\n\
        You should carefully read it before deciding on the next step.\n\
        If multiple steps are needed, iterate through them until you gather all necessary data.\n\
        \n\
        The current scratchpad is:\n\
        <scratchpad>\n{}\n</scratchpad>",
        state.scratchpad_text()
    )
}

fn build_existing_agent_section(state: &SessionState) -> String {
    format!(
        "You already built the agent. From here on you should only use the `update_agent` tool, \
        and never the `generate` tool, unless the user explicitly asks you to create a new agent \
        from scratch.\n\
        The current code of the agent is:\n{}",
        state.agent_code
    )
}
