//! LLM provider implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] trait defined in
//! `agentry-core`. The only backend is the NEAR AI hub's inference endpoint,
//! plus a small factory ([`create_provider`]) that wires login credentials
//! into a type-erased provider.
//!
//! [`LlmProvider`]: agentry_core::llm::provider::LlmProvider

pub mod nearai;

use secrecy::SecretString;

use agentry_core::llm::box_provider::BoxLlmProvider;
use agentry_types::auth::AuthCredentials;

use self::nearai::NearAiProvider;

/// Build the hub inference provider as a [`BoxLlmProvider`].
///
/// Login credentials, when present, are serialized into the bearer token the
/// hub expects. Without them the provider still sends requests; the endpoint
/// answers those with 401 and the turn surfaces it as an authentication
/// failure.
pub fn create_provider(inference_url: &str, credentials: Option<&AuthCredentials>) -> BoxLlmProvider {
    let token = credentials
        .and_then(|credentials| serde_json::to_string(credentials).ok())
        .map(SecretString::from);
    BoxLlmProvider::new(NearAiProvider::new(inference_url, token))
}
