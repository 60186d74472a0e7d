//! Core types for result entries, pages, and request filters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Snippet used for organic results whose markup has no snippet element.
pub const NO_DESCRIPTION: &str = "No description";

/// Description used for a knowledge panel with no abstract text.
pub const NO_PANEL_DESCRIPTION: &str = "No description available";

/// Title used for organic results whose markup has no title text.
pub const NO_TITLE: &str = "No title";

/// Title used for a knowledge panel whose heading link is empty.
pub const DEFAULT_PANEL_TITLE: &str = "Wikipedia";

/// A single entry on a result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// True for the knowledge panel summary, false for organic results.
    pub is_knowledge_panel: bool,
    /// Display title.
    pub title: String,
    /// Canonical destination URL. Empty when the redirect link could not be
    /// resolved.
    pub link: String,
    /// Snippet (organic) or abstract (knowledge panel).
    pub snippet: String,
    /// Knowledge panel image or organic result favicon.
    pub image_url: Option<String>,
}

/// Form fields needed to request the page following the one they came from.
///
/// Produced by the parser from the "next page" form and handed back to the
/// fetcher unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationDescriptor {
    fields: Vec<(String, String)>,
}

impl ContinuationDescriptor {
    /// Build a descriptor from `(name, value)` pairs in submission order.
    pub fn from_fields(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// The form fields in submission order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Value of the first field called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Serialize the fields as a percent-encoded query string (no leading `?`).
    pub fn to_query_string(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// One page of results: the knowledge panel (if any) followed by organic
/// entries in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Entries in display order.
    pub entries: Vec<Entry>,
    /// How to fetch the following page. `None` means this page is the last.
    pub continuation: Option<ContinuationDescriptor>,
}

impl Page {
    /// The knowledge panel entry, if this page has one.
    pub fn knowledge_panel(&self) -> Option<&Entry> {
        self.entries.first().filter(|e| e.is_knowledge_panel)
    }

    /// Entries that are not the knowledge panel.
    pub fn organic(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.is_knowledge_panel)
    }

    /// Whether another page can be requested after this one.
    pub fn has_continuation(&self) -> bool {
        self.continuation.is_some()
    }
}

/// Result age filter, sent to DuckDuckGo as `df`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    /// No restriction.
    #[default]
    Any,
    /// Past day.
    Day,
    /// Past week.
    Week,
    /// Past month.
    Month,
    /// Past year.
    Year,
}

impl TimeFilter {
    /// The `df` query parameter value. `Any` is the empty string.
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Any => "",
            Self::Day => "d",
            Self::Week => "w",
            Self::Month => "m",
            Self::Year => "y",
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        })
    }
}

impl FromStr for TimeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "any" => Ok(Self::Any),
            "d" | "day" => Ok(Self::Day),
            "w" | "week" => Ok(Self::Week),
            "m" | "month" => Ok(Self::Month),
            "y" | "year" => Ok(Self::Year),
            other => Err(format!("unknown time filter: {other}")),
        }
    }
}

/// Optional region and time restrictions for a first-page request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// DuckDuckGo region code (`kl`), e.g. `us-en`. `None` sends an empty value.
    pub region: Option<String>,
    /// Result age restriction (`df`).
    pub time: TimeFilter,
}

impl SearchFilters {
    /// Filters with a region set.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Filters with a time restriction set.
    pub fn with_time(mut self, time: TimeFilter) -> Self {
        self.time = time;
        self
    }

    /// The `kl` query parameter value.
    pub fn region_param(&self) -> &str {
        self.region.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn organic(title: &str) -> Entry {
        Entry {
            is_knowledge_panel: false,
            title: title.into(),
            link: format!("https://{title}.example"),
            snippet: NO_DESCRIPTION.into(),
            image_url: None,
        }
    }

    #[test]
    fn knowledge_panel_only_reported_when_first() {
        let mut panel = organic("panel");
        panel.is_knowledge_panel = true;
        let page = Page {
            entries: vec![panel.clone(), organic("a"), organic("b")],
            continuation: None,
        };
        assert_eq!(page.knowledge_panel(), Some(&panel));
        assert_eq!(page.organic().count(), 2);

        let plain = Page {
            entries: vec![organic("a")],
            continuation: None,
        };
        assert!(plain.knowledge_panel().is_none());
    }

    #[test]
    fn continuation_query_string_is_percent_encoded() {
        let desc = ContinuationDescriptor::from_fields(vec![
            ("q".into(), "rust lang".into()),
            ("s".into(), "10".into()),
            ("vqd".into(), "4-123&x".into()),
        ]);
        assert_eq!(desc.to_query_string(), "q=rust%20lang&s=10&vqd=4-123%26x");
        assert_eq!(desc.get("s"), Some("10"));
        assert_eq!(desc.get("missing"), None);
    }

    #[test]
    fn empty_continuation_serializes_to_empty_string() {
        assert_eq!(ContinuationDescriptor::default().to_query_string(), "");
    }

    #[test]
    fn time_filter_params() {
        assert_eq!(TimeFilter::Any.as_param(), "");
        assert_eq!(TimeFilter::Day.as_param(), "d");
        assert_eq!(TimeFilter::Week.as_param(), "w");
        assert_eq!(TimeFilter::Month.as_param(), "m");
        assert_eq!(TimeFilter::Year.as_param(), "y");
    }

    #[test]
    fn time_filter_parses_short_and_long_forms() {
        assert_eq!("w".parse::<TimeFilter>(), Ok(TimeFilter::Week));
        assert_eq!("Month".parse::<TimeFilter>(), Ok(TimeFilter::Month));
        assert_eq!("".parse::<TimeFilter>(), Ok(TimeFilter::Any));
        assert!("fortnight".parse::<TimeFilter>().is_err());
    }

    #[test]
    fn time_filter_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&TimeFilter::Year).expect("serialize");
        assert_eq!(json, "\"year\"");
    }

    #[test]
    fn filters_default_to_empty_params() {
        let filters = SearchFilters::default();
        assert_eq!(filters.region_param(), "");
        assert_eq!(filters.time.as_param(), "");

        let filters = SearchFilters::default()
            .with_region("uk-en")
            .with_time(TimeFilter::Day);
        assert_eq!(filters.region_param(), "uk-en");
        assert_eq!(filters.time, TimeFilter::Day);
    }
}
