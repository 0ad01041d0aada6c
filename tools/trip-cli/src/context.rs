//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use trip_cache::{Cache, CredentialStore};
use trip_cart::{BookingFlow, CartStore, DateCache, HttpCartApi, SessionHooks};

use crate::config::{CliConfig, TOKEN_ENV};
use crate::output::Output;

const CONFIG_NAMES: [&str; 3] = ["trip.toml", ".trip.toml", "trip.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Effective configuration (environment and overrides applied).
    pub config: CliConfig,
    /// File the configuration was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, env: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some(path) => {
                    let config = path
                        .to_str()
                        .context("Config path is not valid UTF-8")
                        .and_then(CliConfig::load)?;
                    (config, Some(path))
                }
                None => (CliConfig::default(), None),
            }
        };

        let config = match env {
            Some(env) => config.for_environment(env)?,
            None => config,
        }
        .with_env_overrides();

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    return Some(config_path);
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Open the local storage file.
    pub fn cache(&self) -> Result<Cache> {
        let path = self.config.storage_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        Cache::open(&path).with_context(|| format!("Failed to open {}", path.display()))
    }

    /// Stored credentials, or a throwaway store holding `TRIP_TOKEN` when set.
    pub fn credentials(&self, cache: &Cache) -> Result<CredentialStore> {
        match std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()) {
            Some(token) => {
                let credentials = CredentialStore::in_memory();
                credentials.set_token(token)?;
                Ok(credentials)
            }
            None => Ok(CredentialStore::new(cache.clone())),
        }
    }

    /// Wire a cart session against the configured API.
    pub fn session(&self) -> Result<Session> {
        let cache = self.cache()?;
        let credentials = self.credentials(&cache)?;
        if !credentials.is_authenticated() {
            self.output
                .warn("Not logged in; run `trip login` first if requests are rejected");
        }

        let api = HttpCartApi::from_config(&self.config.api, credentials.clone())
            .context("Failed to create HTTP client")?;
        let notifier = Arc::new(self.output.clone());
        let hooks = SessionHooks::new(credentials, notifier.clone(), notifier)
            .with_config(self.config.session_config());
        let store = CartStore::new(Arc::new(api), hooks);

        Ok(Session {
            store,
            dates: DateCache::new(cache),
        })
    }
}

/// A cart store and its local date fallback, for one command.
pub struct Session {
    pub store: CartStore,
    pub dates: DateCache,
}

impl Session {
    pub fn booking(&self) -> BookingFlow {
        BookingFlow::new(self.store.clone(), self.dates.clone())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.store.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".trip.toml"), "").unwrap();

        let found = Context::find_config(&nested).unwrap();
        assert_eq!(found, dir.path().join(".trip.toml"));
    }
}
