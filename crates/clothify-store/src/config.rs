//! Store configuration.
//!
//! Loaded from `clothify.toml` (or `.clothify.toml` / `clothify.json`),
//! found by walking up from the working directory, then overridden by
//! `CLOTHIFY_*` environment variables.

use crate::StoreError;
use clothify_commerce::cart::PricingRules;
use clothify_commerce::search::DEFAULT_PER_PAGE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["clothify.toml", ".clothify.toml", "clothify.json"];

pub const ENV_DATABASE_URL: &str = "CLOTHIFY_DATABASE_URL";
pub const ENV_ANON_KEY: &str = "CLOTHIFY_ANON_KEY";
pub const ENV_STORAGE_PATH: &str = "CLOTHIFY_STORAGE_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub search: SearchConfig,

    /// Shipping and tax rules applied to carts and orders.
    #[serde(default)]
    pub pricing: PricingRules,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl StoreConfig {
    /// Load config from a file. `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::ConfigRead {
            path: display.clone(),
            source,
        })?;

        let parsed = if is_json(path) {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str(&content).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| StoreError::ConfigParse {
            path: display,
            message,
        })
    }

    /// Write config to a file in the format its extension implies.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| e.to_string())
        } else {
            toml::to_string_pretty(self).map_err(|e| e.to_string())
        }
        .map_err(|message| StoreError::ConfigParse {
            path: display.clone(),
            message,
        })?;

        std::fs::write(path, content).map_err(|source| StoreError::ConfigRead {
            path: display,
            source,
        })
    }

    /// Find a config file in `start` or any of its parents.
    pub fn find(start: impl AsRef<Path>) -> Option<PathBuf> {
        let mut current = Some(start.as_ref());
        while let Some(dir) = current {
            for name in CONFIG_FILE_NAMES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
            current = dir.parent();
        }
        None
    }

    /// Load the nearest config file above the working directory, falling
    /// back to defaults, then apply environment overrides.
    pub fn discover() -> Result<Self, StoreError> {
        let found = std::env::current_dir().ok().and_then(Self::find);
        let config = match found {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(path)?
            }
            None => Self::default(),
        };
        Ok(config.with_env())
    }

    /// Apply `CLOTHIFY_*` overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Blank values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_DATABASE_URL) {
            self.database.url = Some(url);
        }
        if let Some(key) = get(ENV_ANON_KEY) {
            self.database.anon_key = Some(key);
        }
        if let Some(path) = get(ENV_STORAGE_PATH) {
            self.storage.path = Some(PathBuf::from(path));
        }
        self
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Hosted database connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// Project URL, e.g. `https://xyz.example.co`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Public anon key sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,

    /// How long GET responses stay cached (default: 60).
    #[serde(default = "default_request_cache_ttl")]
    pub request_cache_ttl_secs: u64,

    /// Request timeout (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            request_cache_ttl_secs: default_request_cache_ttl(),
            timeout_secs: default_timeout(),
        }
    }
}

impl DatabaseConfig {
    /// URL and key when both are set.
    pub fn remote(&self) -> Option<(&str, &str)> {
        Some((self.url.as_deref()?, self.anon_key.as_deref()?))
    }

    pub fn request_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.request_cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_request_cache_ttl() -> u64 {
    60
}

fn default_timeout() -> u64 {
    30
}

/// Search behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Quiet period before a typed query runs (default: 300).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Products per results page (default: 24).
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            per_page: default_per_page(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_per_page() -> usize {
    DEFAULT_PER_PAGE
}

/// Local storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// JSON file backing the local store. In-memory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}
