//! Recent queries persisted between runs as a JSON array.

use std::path::{Path, PathBuf};

use seeker_search::RecentQueries;

use crate::error::{AppError, Result};

/// On-disk home of the recent query list.
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    /// History stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// History at the default location.
    pub fn default_location() -> Self {
        Self::new(crate::seeker_dirs::recent_queries_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored list.
    ///
    /// A missing file is an empty list. So is an unreadable or corrupt one,
    /// with a warning; the next save overwrites it.
    pub fn load(&self) -> RecentQueries {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return RecentQueries::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read recent queries");
                return RecentQueries::new();
            }
        };
        match serde_json::from_str::<Vec<String>>(&content) {
            Ok(stored) => RecentQueries::from_stored(stored),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt recent queries file");
                RecentQueries::new()
            }
        }
    }

    /// Write `recent`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, recent: &RecentQueries) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json =
            serde_json::to_string_pretty(recent).map_err(|e| AppError::History(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
