//! Infrastructure layer for Agentry.
//!
//! Contains implementations of the collaborator traits defined in
//! `agentry-core`: filesystem session storage, the NEAR AI hub client
//! (registry, secret vault, login credentials), and the hub's inference
//! endpoint as an LLM provider.

pub mod config;
pub mod filesystem;
pub mod hub;
pub mod llm;
pub mod session_store;
