//! Error types for the seeker application.

use seeker_search::SearchError;

/// Top-level error type for the application layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Fetching, parsing, or navigating result pages failed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Configuration could not be read, parsed, or written.
    #[error("config error: {0}")]
    Config(String),

    /// Recent-query file could not be read or written.
    #[error("history error: {0}")]
    History(String),

    /// A front-end command could not be understood.
    #[error("command error: {0}")]
    Command(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// The message shown to the user for a failed search or page change.
    ///
    /// Every fetch or parse failure leads with the same sentence, followed
    /// by the typed cause.
    pub fn user_message(&self) -> String {
        match self {
            Self::Search(SearchError::NoActiveSearch) => "Search for something first".to_owned(),
            Self::Search(SearchError::FetchInFlight) => {
                "Still loading the previous page".to_owned()
            }
            Self::Search(err) => format!("Failed to fetch search results: {err}"),
            other => other.to_string(),
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_pass_through_display() {
        let err = AppError::from(SearchError::Http("proxy returned status 502".into()));
        assert_eq!(err.to_string(), "HTTP error: proxy returned status 502");
    }

    #[test]
    fn fetch_failures_share_one_user_message() {
        for err in [
            SearchError::Http("x".into()),
            SearchError::Timeout("x".into()),
            SearchError::MalformedDocument("x".into()),
        ] {
            let message = AppError::from(err).user_message();
            assert!(
                message.starts_with("Failed to fetch search results: "),
                "{message}"
            );
        }
    }

    #[test]
    fn fetch_failure_message_names_the_cause() {
        let err = AppError::from(SearchError::Timeout("after 10s".into()));
        assert_eq!(
            err.user_message(),
            "Failed to fetch search results: request timed out: after 10s"
        );
    }

    #[test]
    fn navigation_errors_have_specific_messages() {
        assert_eq!(
            AppError::from(SearchError::NoActiveSearch).user_message(),
            "Search for something first"
        );
        assert_eq!(
            AppError::from(SearchError::FetchInFlight).user_message(),
            "Still loading the previous page"
        );
    }

    #[test]
    fn other_errors_use_display() {
        let err = AppError::Command("unknown command: fly".into());
        assert_eq!(err.user_message(), "command error: unknown command: fly");
    }
}
