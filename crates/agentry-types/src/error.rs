use thiserror::Error;

/// Errors from registry operations (entry upsert, file upload).
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The hub rejected an upload because the path already has content at
    /// this version. Versions are immutable once written.
    #[error("file already exists at version {version}")]
    AlreadyExists { version: String },

    #[error("not logged in")]
    NotAuthenticated,

    #[error("registry request failed: {0}")]
    Request(String),

    #[error("registry returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Errors from the hub secret vault.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("not logged in")]
    NotAuthenticated,

    #[error("vault request failed: {0}")]
    Request(String),

    #[error("vault returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Errors from the login flow and credential storage.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("incorrect login command provided, expected `nearai login save ...`")]
    NotLoginCommand,

    #[error("malformed login command: {0}")]
    Malformed(String),

    #[error("credential store error: {0}")]
    Store(String),
}

/// Errors from session file storage.
#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("filesystem error: {0}")]
    Io(String),

    #[error("invalid filename: '{0}'")]
    InvalidFilename(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_names_the_version() {
        let err = RegistryError::AlreadyExists {
            version: "gen-20260825120000".to_string(),
        };
        assert!(err.to_string().contains("gen-20260825120000"));
    }

    #[test]
    fn test_api_error_carries_status() {
        let err = VaultError::Api {
            status: 403,
            message: "forbidden".to_string(),
        };
        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("forbidden"));
    }
}
