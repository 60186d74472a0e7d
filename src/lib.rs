//! Seeker: paged web search in the terminal.
//!
//! The search engine itself lives in [`seeker_search`]. This crate adds what
//! a runnable program needs around it:
//!
//! - [`config`]: TOML configuration with an environment override for the proxy
//! - [`seeker_dirs`]: where config and state live on disk
//! - [`history`]: recent queries persisted between runs
//! - [`command`], [`render`], [`repl`]: the interactive front end

pub mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod render;
pub mod repl;
pub mod seeker_dirs;

pub use config::SeekerConfig;
pub use error::{AppError, Result};
pub use history::HistoryFile;
pub use repl::Repl;

use std::path::Path;

use seeker_search::ProxyClient;

/// Load config and recent queries and build a ready-to-run front end.
///
/// `proxy_override` (from the command line) wins over both the config file
/// and `SEEKER_PROXY_URL`.
///
/// # Errors
///
/// Returns an error if the config file exists but is invalid, or the search
/// settings don't validate.
pub fn open(
    config_path: &Path,
    proxy_override: Option<String>,
    history: HistoryFile,
) -> Result<Repl<ProxyClient>> {
    let mut config = SeekerConfig::load_or_default(config_path)?;
    config.apply_proxy_override(proxy_override);
    tracing::info!(proxy = %config.search.proxy_url, "using proxy");

    let recent = history.load();
    tracing::debug!(recent = recent.len(), "recent queries loaded");
    let session = seeker_search::connect(config.search, recent)?;
    Ok(Repl::new(session, history, config.defaults.filters()))
}
