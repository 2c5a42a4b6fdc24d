//! NEAR AI hub client implementing the registry, vault, and auth traits.

use std::path::PathBuf;
use std::sync::RwLock;
use std::time::Duration;

use agentry_core::hub::{AuthService, RegistryService, SecretVault};
use agentry_types::auth::AuthCredentials;
use agentry_types::error::{AuthError, RegistryError, VaultError};
use agentry_types::metadata::AgentMetadata;
use agentry_types::registry::EntryLocation;
use agentry_types::secret::SecretSpec;

use super::types::{EntryMetadataBody, RemoveSecretBody, UploadMetadataBody};

/// Client for the NEAR AI hub's registry, secret vault, and login storage.
///
/// One instance serves the whole process. The installed login record lives
/// behind an `RwLock` so a login finishing mid-turn is visible to every
/// subsequent hub call, and every authenticated request serializes that
/// record into its `Authorization: Bearer` header.
pub struct HubClient {
    client: reqwest::Client,
    base_url: String,
    auth: RwLock<Option<AuthCredentials>>,
    auth_path: PathBuf,
}

impl HubClient {
    /// Create a client for the hub at `hub_url`.
    ///
    /// `auth_path` is where validated login records are persisted and
    /// `credentials` is the record the process booted with, if any.
    pub fn new(
        hub_url: impl Into<String>,
        auth_path: PathBuf,
        credentials: Option<AuthCredentials>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120)) // registry uploads can be slow
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            base_url: hub_url.into(),
            auth: RwLock::new(credentials),
            auth_path,
        }
    }

    /// Build a full URL from a path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// The serialized login record the hub takes as a bearer token, `None`
    /// when logged out.
    fn bearer_token(&self) -> Option<String> {
        let auth = self.auth.read().expect("auth lock poisoned");
        auth.as_ref()
            .and_then(|credentials| serde_json::to_string(credentials).ok())
    }
}

// HubClient intentionally does NOT derive Debug to prevent accidental
// exposure of the installed login record.

impl RegistryService for HubClient {
    async fn update_entry(
        &self,
        location: &EntryLocation,
        metadata: &AgentMetadata,
    ) -> Result<(), RegistryError> {
        let token = self.bearer_token().ok_or(RegistryError::NotAuthenticated)?;
        let body = UploadMetadataBody {
            entry_location: location.clone(),
            metadata: EntryMetadataBody::from(metadata),
        };

        let response = self
            .client
            .post(self.url("/v1/registry/upload_metadata"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| RegistryError::Request(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        Err(RegistryError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn upload_file(
        &self,
        location: &EntryLocation,
        filename: &str,
        content: &[u8],
    ) -> Result<(), RegistryError> {
        let token = self.bearer_token().ok_or(RegistryError::NotAuthenticated)?;

        let part =
            reqwest::multipart::Part::bytes(content.to_vec()).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("path", filename.to_string())
            .part("file", part)
            .text("namespace", location.namespace.clone())
            .text("name", location.name.clone())
            .text("version", location.version.clone());

        let response = self
            .client
            .post(self.url("/v1/registry/upload_file"))
            .bearer_auth(&token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RegistryError::Request(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        // The hub answers 400 with an "already exists" body when this
        // version already holds content at that path.
        if status.as_u16() == 400 && message.contains("already exists") {
            return Err(RegistryError::AlreadyExists {
                version: location.version.clone(),
            });
        }
        Err(RegistryError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl SecretVault for HubClient {
    async fn create_secret(&self, spec: &SecretSpec) -> Result<(), VaultError> {
        let token = self.bearer_token().ok_or(VaultError::NotAuthenticated)?;
        let response = self
            .client
            .post(self.url("/v1/create_hub_secret"))
            .bearer_auth(&token)
            .json(spec)
            .send()
            .await
            .map_err(|e| VaultError::Request(format!("HTTP request failed: {e}")))?;
        check_vault_status(response).await
    }

    async fn delete_secret(&self, spec: &SecretSpec) -> Result<(), VaultError> {
        let token = self.bearer_token().ok_or(VaultError::NotAuthenticated)?;
        let response = self
            .client
            .post(self.url("/v1/remove_hub_secret"))
            .bearer_auth(&token)
            .json(&RemoveSecretBody::from(spec))
            .send()
            .await
            .map_err(|e| VaultError::Request(format!("HTTP request failed: {e}")))?;
        check_vault_status(response).await
    }
}

async fn check_vault_status(response: reqwest::Response) -> Result<(), VaultError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let message = response.text().await.unwrap_or_default();
    Err(VaultError::Api {
        status: status.as_u16(),
        message,
    })
}

impl AuthService for HubClient {
    fn credentials(&self) -> Option<AuthCredentials> {
        self.auth.read().expect("auth lock poisoned").clone()
    }

    fn install_credentials(&self, credentials: AuthCredentials) {
        *self.auth.write().expect("auth lock poisoned") = Some(credentials);
    }

    async fn update_auth_config(&self, credentials: &AuthCredentials) -> Result<bool, AuthError> {
        if !record_is_complete(credentials) {
            return Ok(false);
        }

        let json = serde_json::to_string_pretty(credentials)
            .map_err(|e| AuthError::Store(e.to_string()))?;
        if let Some(parent) = self.auth_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AuthError::Store(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        tokio::fs::write(&self.auth_path, json).await.map_err(|e| {
            AuthError::Store(format!("cannot write {}: {e}", self.auth_path.display()))
        })?;
        Ok(true)
    }
}

/// A login record validates when every field is filled and the nonce is
/// numeric.
fn record_is_complete(credentials: &AuthCredentials) -> bool {
    let filled = [
        &credentials.account_id,
        &credentials.signature,
        &credentials.public_key,
        &credentials.callback_url,
        &credentials.nonce,
        &credentials.recipient,
        &credentials.message,
    ]
    .iter()
    .all(|field| !field.is_empty());

    filled && credentials.nonce.parse::<u64>().is_ok()
}
