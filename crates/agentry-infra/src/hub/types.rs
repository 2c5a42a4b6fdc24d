//! NEAR AI hub wire types.
//!
//! Request bodies for the hub's registry and secret-vault endpoints. NOT the
//! domain types from `agentry-types` -- those carry fields (entry name and
//! version, secret values on removal) the hub wants elsewhere or not at all.

use serde::Serialize;

use agentry_types::metadata::{AgentDetails, AgentMetadata};
use agentry_types::registry::EntryLocation;
use agentry_types::secret::SecretSpec;

/// Body for `POST /v1/registry/upload_metadata`.
#[derive(Debug, Clone, Serialize)]
pub struct UploadMetadataBody {
    pub entry_location: EntryLocation,
    pub metadata: EntryMetadataBody,
}

/// The metadata document as the hub accepts it: everything in
/// [`AgentMetadata`] except `name` and `version`, which travel in the entry
/// location instead.
#[derive(Debug, Clone, Serialize)]
pub struct EntryMetadataBody {
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub details: AgentDetails,
    pub show_entry: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<&AgentMetadata> for EntryMetadataBody {
    fn from(metadata: &AgentMetadata) -> Self {
        Self {
            description: metadata.description.clone(),
            category: metadata.category.clone(),
            tags: metadata.tags.clone(),
            details: metadata.details.clone(),
            show_entry: metadata.show_entry,
            extra: metadata.extra.clone(),
        }
    }
}

/// Body for `POST /v1/remove_hub_secret`. Unlike creation, removal carries
/// no description and no value.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveSecretBody {
    pub namespace: String,
    pub name: String,
    pub version: String,
    pub key: String,
    pub category: String,
}

impl From<&SecretSpec> for RemoveSecretBody {
    fn from(spec: &SecretSpec) -> Self {
        Self {
            namespace: spec.namespace.clone(),
            name: spec.name.clone(),
            version: spec.version.clone(),
            key: spec.key.clone(),
            category: spec.category.clone(),
        }
    }
}
