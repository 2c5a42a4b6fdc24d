//! Session file store trait.
//!
//! A session owns a flat working directory holding the artifacts of the
//! build: `agent.py`, `metadata.json`, `state.json`, and anything else the
//! generated program wrote. Implementations live in agentry-infra.

use agentry_types::error::FileStoreError;
use agentry_types::registry::SessionFileInfo;

/// Trait for a session's working-directory files.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in agentry-infra.
pub trait SessionFiles: Send + Sync {
    /// Read a file's content, `None` when it does not exist.
    fn read_file(
        &self,
        filename: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, FileStoreError>> + Send;

    /// Write (create or overwrite) a file.
    fn write_file(
        &self,
        filename: &str,
        content: &str,
    ) -> impl std::future::Future<Output = Result<(), FileStoreError>> + Send;

    /// List every file in the working directory with its creation time.
    fn list_files(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<SessionFileInfo>, FileStoreError>> + Send;
}
