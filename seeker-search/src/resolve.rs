//! Redirect link resolution.
//!
//! DuckDuckGo wraps result links like
//! `https://duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`.
//! The real destination is the percent-decoded `uddg` parameter.

use url::Url;

/// Query parameter carrying the wrapped destination.
const REDIRECT_PARAM: &str = "uddg";

/// Resolve a result href to its canonical destination.
///
/// - Empty or unparseable input resolves to `""`. This is logged, never
///   returned as an error, so one bad link cannot sink a whole page.
/// - A URL with a `uddg` query parameter resolves to that parameter's
///   percent-decoded value. `+` is left as is. A value with a broken `%`
///   escape, or one that doesn't decode to UTF-8, resolves to `""`.
/// - Any other URL is returned unchanged.
///
/// # Examples
///
/// ```
/// use seeker_search::resolve::resolve;
///
/// let wrapped = "https://duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&rut=abc";
/// assert_eq!(resolve(wrapped), "https://www.rust-lang.org/");
/// assert_eq!(resolve("https://docs.rs/"), "https://docs.rs/");
/// assert_eq!(resolve("not a url"), "");
/// ```
pub fn resolve(raw_href: &str) -> String {
    if raw_href.is_empty() {
        tracing::debug!("empty result link");
        return String::new();
    }

    let parsed = match Url::parse(raw_href) {
        Ok(url) => url,
        Err(err) => {
            tracing::debug!(error = %err, "unparseable result link");
            tracing::trace!(href = raw_href, "unparseable result link");
            return String::new();
        }
    };

    let Some(query) = parsed.query() else {
        return raw_href.to_owned();
    };

    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != REDIRECT_PARAM {
            continue;
        }
        if !has_valid_escapes(value) {
            tracing::debug!("redirect target has a malformed percent escape");
            return String::new();
        }
        return match urlencoding::decode(value) {
            Ok(decoded) => decoded.into_owned(),
            Err(err) => {
                tracing::debug!(error = %err, "redirect target is not valid UTF-8");
                String::new()
            }
        };
    }

    raw_href.to_owned()
}

/// Every `%` must start a two-hex-digit escape.
fn has_valid_escapes(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

/// Make an attribute value absolute against the page it came from, the way
/// a browser's `element.href` does.
///
/// Empty input stays empty. Input that cannot be joined is returned as is so
/// that [`resolve`] gets to decide what to do with it.
pub fn absolutize(href: &str, base: &Url) -> String {
    if href.is_empty() {
        return String::new();
    }
    match base.join(href) {
        Ok(url) => url.into(),
        Err(_) => href.to_owned(),
    }
}
