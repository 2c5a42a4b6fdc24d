use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Fully qualified address of a registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLocation {
    pub namespace: String,
    pub name: String,
    pub version: String,
}

impl EntryLocation {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for EntryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.name, self.version)
    }
}

/// One file in a session's working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFileInfo {
    pub filename: String,
    pub created_at: DateTime<Utc>,
}
