//! Page fetching through the forwarding proxy.
//!
//! [`PageSource`] is the transport seam: it turns a [`PageRequest`] into a
//! raw response body. [`ProxyClient`] is the real implementation; tests
//! substitute their own. [`load_page`] adds the envelope unwrapping and
//! parsing every body needs before it becomes a [`Page`].

use std::future::Future;

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::http;
use crate::parse::parse;
use crate::types::{ContinuationDescriptor, Page, SearchFilters};

/// What to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// The first page for a fresh query.
    First {
        /// Query text as typed.
        query: String,
        /// Region and time restrictions.
        filters: SearchFilters,
    },
    /// The page described by a previous page's "next" form.
    Continuation(ContinuationDescriptor),
}

/// A transport that can retrieve result pages.
///
/// Implementations make exactly one request per call and never retry.
pub trait PageSource: Send + Sync {
    /// Fetch the raw response body for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] or [`SearchError::Timeout`] when the
    /// request fails or the response status is not 2xx.
    fn fetch(&self, request: &PageRequest) -> impl Future<Output = Result<String>> + Send;
}

/// [`PageSource`] that sends GET requests to the configured proxy.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    config: SearchConfig,
}

impl ProxyClient {
    /// Validate `config` and build the underlying HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an invalid config, or
    /// [`SearchError::Http`] if the client cannot be constructed.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let client = http::build_client(&config)?;
        Ok(Self { client, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Full proxy URL for `request`.
    ///
    /// The target URL is appended verbatim after `endpoint=`; the proxy
    /// forwards everything after it to the results endpoint.
    pub fn request_url(&self, request: &PageRequest) -> String {
        let params = match request {
            PageRequest::First { query, filters } => format!(
                "q={}&df={}&kl={}",
                urlencoding::encode(query),
                filters.time.as_param(),
                urlencoding::encode(filters.region_param()),
            ),
            PageRequest::Continuation(descriptor) => descriptor.to_query_string(),
        };
        let separator = if self.config.proxy_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}endpoint={}?{params}",
            self.config.proxy_url, self.config.results_endpoint
        )
    }
}

impl PageSource for ProxyClient {
    async fn fetch(&self, request: &PageRequest) -> Result<String> {
        let url = self.request_url(request);
        tracing::trace!(%url, "proxy request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| http::transport_error("proxy request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http(format!("proxy returned status {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| http::transport_error("proxy response read failed", e))?;

        tracing::trace!(bytes = body.len(), "proxy response received");
        Ok(body)
    }
}

/// Undo the proxy's string envelope.
///
/// A body wrapped in one pair of double quotes loses them. Then, always,
/// `\"` becomes `"` and `\\` becomes `\`, in that order.
pub fn unwrap_transport(body: &str) -> String {
    let inner = if body.len() >= 2 && body.starts_with('"') && body.ends_with('"') {
        &body[1..body.len() - 1]
    } else {
        body
    };
    inner.replace("\\\"", "\"").replace("\\\\", "\\")
}

/// Fetch, unwrap, and parse one page.
///
/// Only a first page keeps its knowledge panel; continuation pages carry
/// organic results alone.
///
/// # Errors
///
/// Transport errors from `source`, or [`SearchError::MalformedDocument`] if
/// the unwrapped body is not HTML.
pub async fn load_page<S: PageSource>(source: &S, request: &PageRequest) -> Result<Page> {
    let body = source.fetch(request).await?;
    let html = unwrap_transport(&body);
    let mut parsed = parse(&html)?;
    if let PageRequest::Continuation(_) = request {
        if parsed.knowledge_panel.take().is_some() {
            tracing::debug!("dropping knowledge panel from continuation page");
        }
    }
    Ok(parsed.into_page())
}
