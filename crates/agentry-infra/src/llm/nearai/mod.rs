//! NEAR AI inference provider implementation.
//!
//! This module provides the [`NearAiProvider`] which implements the
//! [`LlmProvider`](agentry_core::llm::provider::LlmProvider) trait for the
//! hub's OpenAI-compatible chat completions endpoint, including tool calling.

pub mod client;
pub mod types;

pub use client::NearAiProvider;
