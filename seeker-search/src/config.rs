//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls where requests are routed and how long they may
//! take. It is embedded in the application's TOML config file, so every field
//! has a serde default.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SearchError;

/// DuckDuckGo's JavaScript-free results page.
pub const DEFAULT_RESULTS_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Proxy used when nothing else is configured.
pub const DEFAULT_PROXY_URL: &str = "http://localhost:8080/";

/// Configuration for the proxy transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the forwarding proxy. Requests carry the real target in
    /// its `endpoint` query parameter.
    pub proxy_url: String,
    /// Results page the proxy forwards to.
    pub results_endpoint: String,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// User-Agent sent to the proxy. If `None`, `seeker/<version>`.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            proxy_url: DEFAULT_PROXY_URL.to_owned(),
            results_endpoint: DEFAULT_RESULTS_ENDPOINT.to_owned(),
            timeout_seconds: 10,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Config pointing at `proxy_url`, all other fields default.
    pub fn with_proxy(proxy_url: impl Into<String>) -> Self {
        Self {
            proxy_url: proxy_url.into(),
            ..Default::default()
        }
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `proxy_url` must be an absolute `http` or `https` URL
    /// - `results_endpoint` must be an absolute URL
    /// - `timeout_seconds` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        let proxy = Url::parse(&self.proxy_url)
            .map_err(|e| SearchError::Config(format!("proxy_url is not a valid URL: {e}")))?;
        if !matches!(proxy.scheme(), "http" | "https") {
            return Err(SearchError::Config(
                "proxy_url must use http or https".into(),
            ));
        }
        Url::parse(&self.results_endpoint).map_err(|e| {
            SearchError::Config(format!("results_endpoint is not a valid URL: {e}"))
        })?;
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.proxy_url, DEFAULT_PROXY_URL);
        assert_eq!(config.results_endpoint, DEFAULT_RESULTS_ENDPOINT);
        assert_eq!(config.timeout_seconds, 10);
        assert!(config.user_agent.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn with_proxy_overrides_only_proxy() {
        let config = SearchConfig::with_proxy("https://proxy.example/fetch");
        assert_eq!(config.proxy_url, "https://proxy.example/fetch");
        assert_eq!(config.results_endpoint, DEFAULT_RESULTS_ENDPOINT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unparseable_proxy_rejected() {
        let config = SearchConfig::with_proxy("not a url");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("proxy_url"));
    }

    #[test]
    fn non_http_proxy_rejected() {
        let config = SearchConfig::with_proxy("ftp://proxy.example/");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn bad_endpoint_rejected() {
        let config = SearchConfig {
            results_endpoint: "/html/".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("results_endpoint"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"proxy_url":"https://p.example/"}"#).expect("deserialize");
        assert_eq!(config.proxy_url, "https://p.example/");
        assert_eq!(config.timeout_seconds, 10);
    }
}
