//! Collaborator traits for the NEAR AI hub and the chat reply channel.
//!
//! The hub side covers the three remote concerns of a build session:
//! publishing registry entries, storing user secrets, and recording login
//! credentials. `ReplySink` is the channel user-visible messages go out on.
//! Implementations live in agentry-infra.

use agentry_types::auth::AuthCredentials;
use agentry_types::error::{AuthError, RegistryError, VaultError};
use agentry_types::metadata::AgentMetadata;
use agentry_types::registry::EntryLocation;
use agentry_types::secret::SecretSpec;

/// Registry operations: entry metadata upsert and file upload.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait RegistryService: Send + Sync {
    /// Create or update the registry entry at `location`.
    fn update_entry(
        &self,
        location: &EntryLocation,
        metadata: &AgentMetadata,
    ) -> impl std::future::Future<Output = Result<(), RegistryError>> + Send;

    /// Upload one file into the entry at `location`.
    ///
    /// Returns [`RegistryError::AlreadyExists`] when the hub refuses the
    /// write because this version already holds content at that path.
    fn upload_file(
        &self,
        location: &EntryLocation,
        filename: &str,
        content: &[u8],
    ) -> impl std::future::Future<Output = Result<(), RegistryError>> + Send;
}

/// Hub secret vault operations.
pub trait SecretVault: Send + Sync {
    fn create_secret(
        &self,
        spec: &SecretSpec,
    ) -> impl std::future::Future<Output = Result<(), VaultError>> + Send;

    /// Remove a secret; `spec.value` is ignored.
    fn delete_secret(
        &self,
        spec: &SecretSpec,
    ) -> impl std::future::Future<Output = Result<(), VaultError>> + Send;
}

/// Login credential storage.
///
/// `install_credentials` puts credentials into the running process only;
/// `update_auth_config` additionally validates and persists them, returning
/// `Ok(false)` when the record fails validation.
pub trait AuthService: Send + Sync {
    /// Credentials currently installed in this process, if any.
    fn credentials(&self) -> Option<AuthCredentials>;

    /// Install credentials for the rest of this process, without validation
    /// or persistence.
    fn install_credentials(&self, credentials: AuthCredentials);

    /// Validate and persist credentials. `Ok(true)` means they were accepted
    /// and stored; `Ok(false)` means validation rejected them.
    fn update_auth_config(
        &self,
        credentials: &AuthCredentials,
    ) -> impl std::future::Future<Output = Result<bool, AuthError>> + Send;
}

/// Outbound channel for user-visible chat messages.
///
/// Delivery is fire-and-forget; a sink must never fail a turn.
pub trait ReplySink: Send + Sync {
    fn add_reply(&self, text: &str);
}
