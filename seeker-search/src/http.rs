//! HTTP client for talking to the forwarding proxy.
//!
//! The proxy is the only host we contact. It needs no session state, so the
//! client keeps no cookies; every request asks for HTML.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Sent when the config names no User-Agent.
pub const DEFAULT_USER_AGENT: &str = concat!("seeker/", env!("CARGO_PKG_VERSION"));

/// Headers every proxy request carries.
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers
}

/// Build the [`reqwest::Client`] used for every proxy request.
///
/// Applies the configured timeout and User-Agent and the HTML `Accept`
/// headers. Redirects from the proxy are not followed: a redirect means the
/// proxy is misconfigured, and the non-2xx status surfaces as an error.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(user_agent)
        .default_headers(default_headers())
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Map a reqwest failure to the transport side of [`SearchError`].
pub(crate) fn transport_error(context: &str, err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout(format!("{context}: {err}"))
    } else {
        SearchError::Http(format!("{context}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_user_agent_names_the_crate_version() {
        assert!(DEFAULT_USER_AGENT.starts_with("seeker/"));
        assert!(DEFAULT_USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn requests_ask_for_html() {
        let headers = default_headers();
        assert_eq!(
            headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()),
            Some("text/html")
        );
        assert!(headers.contains_key(header::ACCEPT_LANGUAGE));
    }

    #[test]
    fn client_builds_with_default_and_custom_user_agent() {
        assert!(build_client(&SearchConfig::default()).is_ok());
        let custom = SearchConfig {
            user_agent: Some("Mozilla/5.0 (X11; Linux x86_64)".into()),
            ..Default::default()
        };
        assert!(build_client(&custom).is_ok());
    }

    #[test]
    fn invalid_user_agent_is_an_http_error() {
        let config = SearchConfig {
            user_agent: Some("bad\nagent".into()),
            ..Default::default()
        };
        assert!(matches!(build_client(&config), Err(SearchError::Http(_))));
    }
}
