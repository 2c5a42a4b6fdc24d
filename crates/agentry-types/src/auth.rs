use serde::{Deserialize, Serialize};

use std::fmt;

/// A signed NEAR login record.
///
/// Serialized as-is into the `Authorization: Bearer` header for hub calls,
/// so field names must stay exactly as the hub expects them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCredentials {
    pub account_id: String,
    pub signature: String,
    pub public_key: String,
    pub callback_url: String,
    pub nonce: String,
    pub recipient: String,
    pub message: String,
}

impl AuthCredentials {
    /// The registry namespace these credentials publish under.
    pub fn namespace(&self) -> &str {
        &self.account_id
    }
}

// Manual Debug so the signature never lands in logs.
impl fmt::Debug for AuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCredentials")
            .field("account_id", &self.account_id)
            .field("signature", &"***")
            .field("public_key", &self.public_key)
            .field("nonce", &self.nonce)
            .finish_non_exhaustive()
    }
}
