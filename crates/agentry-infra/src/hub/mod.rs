//! NEAR AI hub client.
//!
//! This module provides the [`HubClient`] which implements the three hub-side
//! traits from `agentry-core`: `RegistryService` (entry metadata and file
//! uploads), `SecretVault` (per-agent secrets), and `AuthService` (login
//! credential storage).

pub mod client;
pub mod types;

pub use client::HubClient;
