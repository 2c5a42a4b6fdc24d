//! Global configuration and credential bootstrap for Agentry.
//!
//! Reads `config.toml` from the data directory (`~/.agentry/` in production)
//! and deserializes it into [`AgentryConfig`]. Falls back to defaults when
//! the file is missing or malformed. Also resolves the login record each
//! process starts with, from the `NEARAI_CONFIG` environment variable or the
//! `auth.json` the login flow persists.

use std::path::{Path, PathBuf};

use agentry_types::auth::AuthCredentials;
use agentry_types::config::AgentryConfig;

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AgentryConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> AgentryConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AgentryConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AgentryConfig::default();
        }
    };

    match toml::from_str::<AgentryConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AgentryConfig::default()
        }
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `AGENTRY_DATA_DIR` environment variable
/// 2. `~/.agentry` under the home directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("AGENTRY_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".agentry");
    }

    // Last resort: current directory
    PathBuf::from(".agentry")
}

/// Where the login flow persists its validated record.
pub fn auth_path(data_dir: &Path) -> PathBuf {
    data_dir.join("auth.json")
}

/// Resolve the login record this process starts with, if any.
///
/// Priority:
/// 1. `NEARAI_CONFIG` environment variable -- the same serialized record the
///    login flow mirrors into the hub vault, either bare or wrapped in an
///    `{"auth": ...}` envelope
/// 2. `{data_dir}/auth.json`, written by a previous login
///
/// An unusable record in either place logs a warning and falls through;
/// nothing usable anywhere means the session runs logged out.
pub async fn bootstrap_credentials(data_dir: &Path) -> Option<AuthCredentials> {
    if let Ok(raw) = std::env::var("NEARAI_CONFIG") {
        match parse_credentials(&raw) {
            Some(credentials) => return Some(credentials),
            None => {
                tracing::warn!("NEARAI_CONFIG is set but does not hold a usable login record");
            }
        }
    }

    let path = auth_path(data_dir);
    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}", path.display());
            return None;
        }
    };

    let credentials = parse_credentials(&raw);
    if credentials.is_none() {
        tracing::warn!("Failed to parse {}: not a usable login record", path.display());
    }
    credentials
}

/// Parse a serialized login record, accepting both the bare record and the
/// `{"auth": ...}` envelope older tooling wrote.
fn parse_credentials(raw: &str) -> Option<AuthCredentials> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let record = value.get("auth").cloned().unwrap_or(value);
    serde_json::from_value(record).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.model, "deepseek-3");
        assert_eq!(config.hub_url, "https://api.near.ai");
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
model = "llama-v3p1-405b-instruct"
max_tokens = 2048
temperature = 0.2
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.model, "llama-v3p1-405b-instruct");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.temperature, Some(0.2));
        // Unnamed fields keep their defaults
        assert_eq!(config.inference_url, "https://api.near.ai/v1");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.model, "deepseek-3");
        assert_eq!(config.max_tokens, 4096);
    }

    #[test]
    fn resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var("AGENTRY_DATA_DIR", "/tmp/test-agentry");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-agentry"));
        unsafe {
            std::env::remove_var("AGENTRY_DATA_DIR");
        }
    }

    fn sample_record() -> serde_json::Value {
        serde_json::json!({
            "account_id": "alice.near",
            "signature": "ed25519:abc",
            "public_key": "ed25519:pub",
            "callback_url": "https://example.com/cb",
            "nonce": "1724572800000",
            "recipient": "ai.near",
            "message": "Welcome to NEAR AI"
        })
    }

    #[test]
    fn parse_credentials_accepts_bare_and_wrapped_records() {
        let bare = sample_record().to_string();
        let wrapped = serde_json::json!({"auth": sample_record()}).to_string();

        assert_eq!(parse_credentials(&bare).unwrap().account_id, "alice.near");
        assert_eq!(parse_credentials(&wrapped).unwrap().account_id, "alice.near");
        assert!(parse_credentials("not json").is_none());
        assert!(parse_credentials(r#"{"auth": {"account_id": 42}}"#).is_none());
    }

    // A single test covers every bootstrap source so NEARAI_CONFIG is never
    // set while another test calls bootstrap_credentials in parallel.
    #[tokio::test]
    async fn bootstrap_credentials_prefers_env_then_file() {
        let tmp = TempDir::new().unwrap();

        // Nothing anywhere: logged out
        assert!(bootstrap_credentials(tmp.path()).await.is_none());

        // Corrupt auth.json: still logged out
        tokio::fs::write(&auth_path(tmp.path()), "{ broken")
            .await
            .unwrap();
        assert!(bootstrap_credentials(tmp.path()).await.is_none());

        // Valid auth.json
        tokio::fs::write(&auth_path(tmp.path()), sample_record().to_string())
            .await
            .unwrap();
        let from_file = bootstrap_credentials(tmp.path()).await.unwrap();
        assert_eq!(from_file.account_id, "alice.near");

        // Env var wins over the file
        let mut env_record = sample_record();
        env_record["account_id"] = serde_json::json!("bob.near");
        // SAFETY: restored before the test returns; no other test reads NEARAI_CONFIG.
        unsafe {
            std::env::set_var("NEARAI_CONFIG", env_record.to_string());
        }
        let from_env = bootstrap_credentials(tmp.path()).await.unwrap();
        unsafe {
            std::env::remove_var("NEARAI_CONFIG");
        }
        assert_eq!(from_env.account_id, "bob.near");
    }
}
