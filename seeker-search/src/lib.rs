//! # seeker-search
//!
//! DuckDuckGo result pages, fetched through a forwarding proxy and kept as a
//! navigable history.
//!
//! ## Design
//!
//! - Requests go to a proxy that forwards them to the HTML-only results
//!   endpoint; the proxy may wrap the body in an escaped string envelope
//! - Results are scraped with CSS selectors; redirect links are unwrapped to
//!   their real destination
//! - Pages for the active query are kept in memory so going back never
//!   refetches and going forward fetches each unseen page once
//! - A newer search always wins over a fetch still pending for an older one
//!
//! ## Privacy
//!
//! - Search queries are logged only at trace level
//! - Nothing is cached beyond the current query's pages

pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod parse;
pub mod recent;
pub mod resolve;
pub mod session;
pub mod types;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use fetch::{PageRequest, PageSource, ProxyClient};
pub use recent::RecentQueries;
pub use session::{Navigation, SearchSession, SessionSnapshot};
pub use types::{ContinuationDescriptor, Entry, Page, SearchFilters, TimeFilter};

/// Build a session that fetches through the proxy described by `config`.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> seeker_search::Result<()> {
/// use seeker_search::{SearchConfig, SearchFilters};
///
/// let config = SearchConfig::with_proxy("https://proxy.example/");
/// let session = seeker_search::connect(config, Default::default())?;
/// session.search("rust programming", SearchFilters::default()).await?;
/// for entry in session.current_entries() {
///     println!("{}: {}", entry.title, entry.link);
/// }
/// # Ok(())
/// # }
/// ```
pub fn connect(
    config: SearchConfig,
    recent: RecentQueries,
) -> Result<SearchSession<ProxyClient>> {
    let client = ProxyClient::new(config)?;
    Ok(SearchSession::with_recent_queries(client, recent))
}
