//! Proxy contract tests.
//!
//! These run the real [`ProxyClient`] against a local mock proxy and check
//! the request shape, envelope unwrapping, status handling, and page history
//! behaviour end to end. The live test is `#[ignore]`d and needs
//! `SEEKER_PROXY_URL` pointing at a working proxy.

use std::time::Duration;

use seeker_search::{
    connect, Navigation, RecentQueries, SearchConfig, SearchError, SearchFilters, SearchSession,
    ProxyClient, TimeFilter,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIRST_PAGE: &str = include_str!("../test-data/first_page.html");
const SECOND_PAGE: &str = include_str!("../test-data/second_page.html");

/// Wrap HTML the way the proxy does: quoted, with `\` and `"` escaped.
fn envelope(html: &str) -> String {
    format!("\"{}\"", html.replace('\\', "\\\\").replace('"', "\\\""))
}

fn session_for(server: &MockServer) -> SearchSession<ProxyClient> {
    let config = SearchConfig {
        timeout_seconds: 1,
        ..SearchConfig::with_proxy(format!("{}/", server.uri()))
    };
    connect(config, RecentQueries::new()).expect("valid config")
}

#[tokio::test]
async fn first_page_request_carries_query_and_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param(
            "endpoint",
            "https://html.duckduckgo.com/html/?q=rust lang",
        ))
        .and(query_param("df", "m"))
        .and(query_param("kl", "de-de"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FIRST_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let filters = SearchFilters::default()
        .with_region("de-de")
        .with_time(TimeFilter::Month);
    let nav = session.search("rust lang", filters).await.expect("search");
    assert_eq!(nav, Navigation::Loaded { index: 0 });
}

#[tokio::test]
async fn requests_identify_the_client_and_ask_for_html() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("accept", "text/html"))
        .and(header(
            "user-agent",
            concat!("seeker/", env!("CARGO_PKG_VERSION")),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(FIRST_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    session
        .search("rust", SearchFilters::default())
        .await
        .expect("search");
}

#[tokio::test]
async fn redirect_from_proxy_is_not_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "https://elsewhere.example/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let err = session
        .search("rust", SearchFilters::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("302"), "{err}");
}

#[tokio::test]
async fn enveloped_body_is_unwrapped_and_parsed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(FIRST_PAGE)))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    session
        .search("rust", SearchFilters::default())
        .await
        .expect("search");

    let entries = session.current_entries();
    assert_eq!(entries.len(), 5);
    assert!(entries[0].is_knowledge_panel);
    assert_eq!(entries[0].title, "Rust (programming language)");
    assert!(entries[1..].iter().all(|e| !e.is_knowledge_panel));
    assert_eq!(entries[1].link, "https://www.rust-lang.org/");
    assert_eq!(entries[4].snippet, "No description");
    assert!(session.has_next_page());
}

#[tokio::test]
async fn pagination_fetches_each_page_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("df", ""))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(FIRST_PAGE)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("endpoint", "https://html.duckduckgo.com/html/?q=rust"))
        .and(query_param("s", "10"))
        .and(query_param("vqd", "4-3218749021"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(SECOND_PAGE)))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    session
        .search("rust", SearchFilters::default())
        .await
        .expect("search");

    assert_eq!(session.next().await.expect("page 2"), Navigation::Loaded { index: 1 });
    assert_eq!(session.current_entries()[0].title, "crates.io: Rust Package Registry");
    assert!(!session.has_next_page());

    assert_eq!(session.previous(), Navigation::Moved { index: 0 });
    assert!(session.current_entries()[0].is_knowledge_panel);
    assert_eq!(session.next().await.expect("cached"), Navigation::Moved { index: 1 });
    assert_eq!(session.next().await.expect("terminal"), Navigation::EndOfResults);

    assert_eq!(session.page_count(), 2);
    assert_eq!(session.recent_queries().list(), &["rust".to_owned()]);
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503).set_body_string(FIRST_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let err = session
        .search("rust", SearchFilters::default())
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(err.to_string().contains("503"), "{err}");
    assert!(session.current_entries().is_empty());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn failed_continuation_keeps_history() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("df", ""))
        .respond_with(ResponseTemplate::new(200).set_body_string(FIRST_PAGE))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("s", "10"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    session
        .search("rust", SearchFilters::default())
        .await
        .expect("search");
    let before = session.snapshot();

    let err = session.next().await.unwrap_err();
    assert!(matches!(err, SearchError::Http(_)));
    assert_eq!(session.snapshot(), before);
}

#[tokio::test]
async fn slow_proxy_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(FIRST_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let session = session_for(&server);
    let err = session
        .search("rust", SearchFilters::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Timeout(_)), "{err}");
}

#[tokio::test]
#[ignore] // Live test — run with `cargo test -- --ignored`
async fn live_search_through_proxy() {
    let Ok(proxy) = std::env::var("SEEKER_PROXY_URL") else {
        eprintln!("SEEKER_PROXY_URL not set, skipping");
        return;
    };
    let session =
        connect(SearchConfig::with_proxy(proxy), RecentQueries::new()).expect("valid config");
    session
        .search("rust programming", SearchFilters::default())
        .await
        .expect("live search should work");
    let entries = session.current_entries();
    assert!(!entries.is_empty());
    for e in entries.iter().filter(|e| !e.is_knowledge_panel) {
        assert!(!e.title.is_empty());
    }
}
