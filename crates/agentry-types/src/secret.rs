use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What the authentication detector found in a generated program.
///
/// This is also the wire shape the detector model is prompted to reply with,
/// so every field tolerates absence. `keys` maps an environment variable name
/// to a human-readable explanation of why the generated code needs it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretRequirement {
    /// True when the generated code needs credentials the user must supply.
    pub use_secrets: bool,
    /// Required environment variable names and why each one is needed.
    pub keys: BTreeMap<String, String>,
    /// Values already collected for the keys above, if any.
    pub values: Option<BTreeMap<String, String>>,
}

impl SecretRequirement {
    /// A requirement that asks for nothing. Used whenever detection fails.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether anything still has to be collected from the user.
    pub fn is_outstanding(&self) -> bool {
        self.use_secrets && !self.keys.is_empty()
    }
}

/// Everything the hub vault needs to create (or remove) one secret.
///
/// The secret is scoped to a registry entry, so the entry coordinates ride
/// along with the key/value pair. `value` is ignored on removal.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretSpec {
    pub namespace: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub key: String,
    pub value: String,
    pub category: String,
}

// Manual Debug so secret values never land in logs.
impl std::fmt::Debug for SecretSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretSpec")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("version", &self.version)
            .field("key", &self.key)
            .field("value", &"***")
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}
