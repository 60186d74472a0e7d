//! Application configuration, stored as TOML.
//!
//! ```toml
//! [search]
//! proxy_url = "https://proxy.example/"
//! timeout_seconds = 10
//!
//! [defaults]
//! region = "us-en"
//! time = "week"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use seeker_search::{SearchConfig, SearchFilters, TimeFilter};

use crate::error::{AppError, Result};

/// Environment variable that overrides `search.proxy_url`.
pub const PROXY_URL_ENV: &str = "SEEKER_PROXY_URL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekerConfig {
    /// Proxy transport settings.
    pub search: SearchConfig,
    /// Filters applied when a search doesn't name its own.
    pub defaults: DefaultsConfig,
}

/// Default search filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Region code such as `us-en`. Unset means no region preference.
    pub region: Option<String>,
    /// Result age restriction.
    pub time: TimeFilter,
}

impl DefaultsConfig {
    /// The filters a plain search starts from.
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            region: self.region.clone(),
            time: self.time,
        }
    }
}

impl SeekerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `path` if it exists, defaults otherwise, then apply the
    /// environment override and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is unreadable or invalid, or if
    /// the resulting search settings don't validate.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::from_file(path)?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };
        config.apply_proxy_override(std::env::var(PROXY_URL_ENV).ok());
        config.search.validate()?;
        Ok(config)
    }

    /// Replace the proxy URL with `proxy_url` when it is set and non-blank.
    pub fn apply_proxy_override(&mut self, proxy_url: Option<String>) {
        if let Some(url) = proxy_url.filter(|u| !u.trim().is_empty()) {
            tracing::debug!("proxy url taken from {PROXY_URL_ENV}");
            self.search.proxy_url = url.trim().to_owned();
        }
    }
}
