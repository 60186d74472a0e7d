//! Most-recent-first list of past queries.

use serde::{Deserialize, Serialize};

/// Maximum number of remembered queries.
pub const MAX_RECENT_QUERIES: usize = 10;

/// Up to [`MAX_RECENT_QUERIES`] distinct queries, newest first.
///
/// Serializes as a plain JSON array so it can be stored and reloaded as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentQueries {
    queries: Vec<String>,
}

impl RecentQueries {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a stored list, applying the same dedup and cap as
    /// [`record`](Self::record). The first occurrence of a query wins.
    pub fn from_stored(stored: Vec<String>) -> Self {
        let mut queries: Vec<String> = Vec::with_capacity(MAX_RECENT_QUERIES);
        for query in stored {
            if query.trim().is_empty() || queries.contains(&query) {
                continue;
            }
            queries.push(query);
            if queries.len() == MAX_RECENT_QUERIES {
                break;
            }
        }
        Self { queries }
    }

    /// Move `query` to the front, dropping any older copy and anything past
    /// the cap. Blank queries are ignored.
    pub fn record(&mut self, query: &str) {
        if query.trim().is_empty() {
            return;
        }
        self.queries.retain(|q| q != query);
        self.queries.insert(0, query.to_owned());
        self.queries.truncate(MAX_RECENT_QUERIES);
    }

    /// The queries, newest first.
    pub fn list(&self) -> &[String] {
        &self.queries
    }

    /// Iterate newest first.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.queries.iter()
    }

    /// Query at `index` (0 is the newest).
    pub fn get(&self, index: usize) -> Option<&str> {
        self.queries.get(index).map(String::as_str)
    }

    /// Number of remembered queries.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.queries.clear();
    }
}

impl<'a> IntoIterator for &'a RecentQueries {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
