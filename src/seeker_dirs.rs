//! Filesystem locations used by seeker.
//!
//! Paths come from the [`dirs`] crate so they land in the platform's usual
//! places.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Config | `~/Library/Application Support/seeker/` | `~/.config/seeker/` |
//! | Data | `~/Library/Application Support/seeker/` | `~/.local/share/seeker/` |
//!
//! # Environment Overrides
//!
//! - `SEEKER_CONFIG_DIR` overrides [`config_dir`]
//! - `SEEKER_DATA_DIR` overrides [`data_dir`]

use std::path::PathBuf;

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/seeker/` by default. Override with
/// the `SEEKER_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("SEEKER_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("seeker"))
        .unwrap_or_else(|| PathBuf::from("/tmp/seeker-config"))
}

/// Application data directory, for state that outlives a run.
///
/// Resolves to `dirs::data_dir()/seeker/` by default. Override with
/// the `SEEKER_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("SEEKER_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("seeker"))
        .unwrap_or_else(|| PathBuf::from("/tmp/seeker-data"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Recent query list (`data_dir()/recent_queries.json`).
#[must_use]
pub fn recent_queries_file() -> PathBuf {
    data_dir().join("recent_queries.json")
}
