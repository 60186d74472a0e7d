//! Error types for the seeker-search crate.
//!
//! Messages are stable strings suitable for display to users. Search queries
//! never appear in error messages.

/// Errors that can occur while fetching, parsing, or navigating result pages.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The proxy answered with a non-2xx status, or the request never completed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The proxy request exceeded the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The response body could not be treated as an HTML document at all.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A built-in CSS selector failed to compile.
    #[error("selector error: {0}")]
    Selector(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Navigation was requested before any search completed.
    #[error("no active search")]
    NoActiveSearch,

    /// A fetch for the active result set is already pending.
    #[error("a page fetch is already in progress")]
    FetchInFlight,
}

impl SearchError {
    /// Whether this error came from the network layer rather than from parsing
    /// or local state.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout(_))
    }
}

/// Convenience type alias for seeker-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
