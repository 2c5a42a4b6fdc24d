//! Session working-directory store on the local filesystem.
//!
//! Implements the `SessionFiles` trait from `agentry-core` with files stored
//! flat at `{data_dir}/sessions/{session_id}/`. The generated program
//! (`agent.py`), its registry document (`metadata.json`), the session state
//! document (`state.json`), and anything else a session produces all live
//! side by side in that directory.

use std::path::{Path, PathBuf};

use agentry_core::storage::files::SessionFiles;
use agentry_types::error::FileStoreError;
use agentry_types::registry::SessionFileInfo;
use chrono::{DateTime, Utc};

/// Local filesystem implementation of the `SessionFiles` trait.
///
/// All operations go through `tokio::fs` for async I/O. The directory is
/// created lazily on first write, so a session that never produces a file
/// leaves nothing behind.
pub struct FileSessionFiles {
    session_dir: PathBuf,
}

impl FileSessionFiles {
    /// Create a store for one session's working directory.
    pub fn new(data_dir: &Path, session_id: &str) -> Self {
        Self {
            session_dir: session_dir(data_dir, session_id),
        }
    }

    fn file_path(&self, filename: &str) -> Result<PathBuf, FileStoreError> {
        validate_filename(filename)?;
        Ok(self.session_dir.join(filename))
    }
}

/// Compute the working directory for a session: `{data_dir}/sessions/{session_id}/`.
pub fn session_dir(data_dir: &Path, session_id: &str) -> PathBuf {
    data_dir.join("sessions").join(session_id)
}

/// Reject names that would escape the flat session directory.
fn validate_filename(filename: &str) -> Result<(), FileStoreError> {
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return Err(FileStoreError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

impl SessionFiles for FileSessionFiles {
    async fn read_file(&self, filename: &str) -> Result<Option<String>, FileStoreError> {
        let path = self.file_path(filename)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(FileStoreError::Io(format!("failed to read {filename}: {err}"))),
        }
    }

    async fn write_file(&self, filename: &str, content: &str) -> Result<(), FileStoreError> {
        let path = self.file_path(filename)?;
        tokio::fs::create_dir_all(&self.session_dir)
            .await
            .map_err(|e| FileStoreError::Io(format!("failed to create session dir: {e}")))?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| FileStoreError::Io(format!("failed to write {filename}: {e}")))
    }

    async fn list_files(&self) -> Result<Vec<SessionFileInfo>, FileStoreError> {
        let mut entries = match tokio::fs::read_dir(&self.session_dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(FileStoreError::Io(format!("failed to list session dir: {err}")));
            }
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FileStoreError::Io(format!("failed to list session dir: {e}")))?
        {
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| FileStoreError::Io(format!("failed to stat entry: {e}")))?;
            if !metadata.is_file() {
                continue;
            }
            // Skip non-UTF-8 names; nothing in a session writes them.
            let Ok(filename) = entry.file_name().into_string() else {
                continue;
            };
            let created_at = metadata
                .created()
                .or_else(|_| metadata.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            files.push(SessionFileInfo {
                filename,
                created_at,
            });
        }
        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_store(tmp: &TempDir) -> FileSessionFiles {
        FileSessionFiles::new(tmp.path(), "session-1")
    }

    #[tokio::test]
    async fn test_write_and_read_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = make_store(&tmp);

        store
            .write_file("agent.py", "def run(env): pass")
            .await
            .unwrap();
        let content = store.read_file("agent.py").await.unwrap();
        assert_eq!(content.as_deref(), Some("def run(env): pass"));
    }

    #[tokio::test]
    async fn test_read_missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = make_store(&tmp);
        assert!(store.read_file("agent.py").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_creates_session_dir() {
        let tmp = TempDir::new().unwrap();
        let store = make_store(&tmp);

        store.write_file("metadata.json", "{}").await.unwrap();
        assert!(session_dir(tmp.path(), "session-1").join("metadata.json").is_file());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let store = make_store(&tmp);

        store.write_file("agent.py", "v1").await.unwrap();
        store.write_file("agent.py", "v2").await.unwrap();
        assert_eq!(store.read_file("agent.py").await.unwrap().as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_list_files_empty_for_fresh_session() {
        let tmp = TempDir::new().unwrap();
        let store = make_store(&tmp);
        assert!(store.list_files().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_files_sorted_with_timestamps() {
        let tmp = TempDir::new().unwrap();
        let store = make_store(&tmp);

        store.write_file("b.txt", "b").await.unwrap();
        store.write_file("a.txt", "a").await.unwrap();

        let files = store.list_files().await.unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        for file in &files {
            assert!(file.created_at <= Utc::now());
        }
    }

    #[tokio::test]
    async fn test_list_files_skips_subdirectories() {
        let tmp = TempDir::new().unwrap();
        let store = make_store(&tmp);

        store.write_file("agent.py", "code").await.unwrap();
        tokio::fs::create_dir(session_dir(tmp.path(), "session-1").join("nested"))
            .await
            .unwrap();

        let files = store.list_files().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "agent.py");
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = make_store(&tmp);

        for bad in ["../escape.txt", "sub/dir.txt", "back\\slash.txt", ""] {
            let result = store.write_file(bad, "evil").await;
            assert!(matches!(result, Err(FileStoreError::InvalidFilename(_))), "{bad:?}");
        }
        let result = store.read_file("../../etc/passwd").await;
        assert!(matches!(result, Err(FileStoreError::InvalidFilename(_))));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let tmp = TempDir::new().unwrap();
        let first = FileSessionFiles::new(tmp.path(), "session-1");
        let second = FileSessionFiles::new(tmp.path(), "session-2");

        first.write_file("agent.py", "one").await.unwrap();
        assert!(second.read_file("agent.py").await.unwrap().is_none());
    }
}
