//! Shared domain types for Agentry.
//!
//! This crate contains the core domain types used across the Agentry
//! orchestrator: SessionState, AgentMetadata, AuthCredentials, the registry
//! and secret-vault records, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod auth;
pub mod config;
pub mod error;
pub mod llm;
pub mod metadata;
pub mod registry;
pub mod secret;
pub mod session;
