//! CLI configuration.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use trip_cart::SessionConfig;
use trip_data::{ClientConfig, DEFAULT_BASE_URL};

/// Overrides `api.api_key`.
pub const API_KEY_ENV: &str = "TRIP_API_KEY";
/// Supplies a bearer token for this invocation only.
pub const TOKEN_ENV: &str = "TRIP_TOKEN";

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Remote API connection.
    #[serde(default)]
    pub api: ClientConfig,

    /// Session behaviour.
    #[serde(default)]
    pub session: SessionSection,

    /// Local storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Environment-specific overrides.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Config with the named environment's overrides applied.
    pub fn for_environment(&self, env: &str) -> Result<CliConfig> {
        let Some(env_config) = self.environments.get(env) else {
            bail!("Unknown environment: {}", env);
        };

        let mut config = self.clone();
        if let Some(ref api) = env_config.api {
            config.api = api.clone();
        }
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()) {
            self.api.api_key = Some(key);
        }
        self
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            login_redirect_delay: Duration::from_millis(self.session.login_redirect_delay_ms),
        }
    }

    /// Where the token and remembered booking dates are stored.
    pub fn storage_path(&self) -> PathBuf {
        match self.storage.path {
            Some(ref path) => PathBuf::from(path),
            None => data_dir().join("trip").join("storage.json"),
        }
    }
}

/// Session behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSection {
    /// Delay between the session-expired message and the login redirect.
    #[serde(default = "default_redirect_delay_ms")]
    pub login_redirect_delay_ms: u64,
}

fn default_redirect_delay_ms() -> u64 {
    1500
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            login_redirect_delay_ms: default_redirect_delay_ms(),
        }
    }
}

/// Local storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage file path (default: ~/.local/share/trip/storage.json).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Environment-specific configuration overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// API config override.
    #[serde(default)]
    pub api: Option<ClientConfig>,
}

/// Platform data directory.
fn data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from("/tmp")
    }
}

/// Generate a default trip.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Trip booking client configuration

[api]
base_url = "{base_url}"
# api_key = "your-api-key"
timeout_secs = 30

[session]
login_redirect_delay_ms = 1500

[storage]
# path = "~/.local/share/trip/storage.json"

[environments.staging]
[environments.staging.api]
base_url = "https://staging.example.com/api/v1"
timeout_secs = 10
"#,
        base_url = DEFAULT_BASE_URL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.session.login_redirect_delay_ms, 1500);
        assert!(config.environments.contains_key("staging"));
    }

    #[test]
    fn test_environment_override() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();

        let staging = config.for_environment("staging").unwrap();
        assert_eq!(staging.api.base_url, "https://staging.example.com/api/v1");
        assert_eq!(staging.api.timeout_secs, 10);

        assert!(config.for_environment("nope").is_err());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            config.session_config().login_redirect_delay,
            Duration::from_millis(1500)
        );
        assert!(config.storage_path().ends_with("trip/storage.json"));
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trip.json");
        let path = path.to_str().unwrap();

        let mut config = CliConfig::default();
        config.api.api_key = Some("key".into());
        config.save(path).unwrap();

        let loaded = CliConfig::load(path).unwrap();
        assert_eq!(loaded.api.api_key.as_deref(), Some("key"));
        assert_eq!(loaded.api.base_url, DEFAULT_BASE_URL);
    }
}
