//! Plain-text rendering of result pages and the recent-query list.

use std::fmt::Write as _;

use seeker_search::{Entry, RecentQueries, SessionSnapshot, TimeFilter};

pub const HELP: &str = "\
Commands:
  <text>                 search for <text>
  search <text>          same, explicit
    --region <code>      restrict to a region, e.g. us-en, de-de
    --time <d|w|m|y>     restrict to the past day, week, month or year
  next, n                show the next page
  prev, p                show the previous page
  history                list recent searches
  again <i>              repeat recent search number <i>
  clear-history          forget recent searches
  help                   show this text
  quit                   exit
";

/// The page being viewed: a header line, the knowledge panel if any, the
/// numbered organic results, and a footer saying whether more pages exist.
pub fn page(snapshot: &SessionSnapshot) -> String {
    let Some(query) = snapshot.query.as_deref() else {
        return "No results yet. Type a search to begin.\n".to_owned();
    };

    let mut out = String::new();
    let _ = write!(out, "Results for \"{query}\"");
    if let Some(region) = snapshot.filters.region.as_deref() {
        let _ = write!(out, " [region {region}]");
    }
    if snapshot.filters.time != TimeFilter::Any {
        let _ = write!(out, " [past {}]", snapshot.filters.time);
    }
    let _ = writeln!(out, " - page {}", snapshot.current_index + 1);
    out.push('\n');

    let mut number = 0;
    for entry in &snapshot.entries {
        if entry.is_knowledge_panel {
            knowledge_panel(&mut out, entry);
        } else {
            number += 1;
            organic(&mut out, number, entry);
        }
    }
    if snapshot.entries.is_empty() {
        out.push_str("No results on this page.\n\n");
    }

    if snapshot.has_next {
        out.push_str("More results available. Type `next` to continue.\n");
    } else {
        out.push_str("End of results.\n");
    }
    out
}

fn knowledge_panel(out: &mut String, entry: &Entry) {
    let _ = writeln!(out, "[Knowledge panel] {}", entry.title);
    let _ = writeln!(out, "    {}", entry.snippet);
    if !entry.link.is_empty() {
        let _ = writeln!(out, "    {}", entry.link);
    }
    if let Some(image) = entry.image_url.as_deref() {
        let _ = writeln!(out, "    image: {image}");
    }
    out.push('\n');
}

fn organic(out: &mut String, number: usize, entry: &Entry) {
    let _ = writeln!(out, "{number:>2}. {}", entry.title);
    if !entry.link.is_empty() {
        let _ = writeln!(out, "    {}", entry.link);
    }
    let _ = writeln!(out, "    {}", entry.snippet);
    out.push('\n');
}

/// Numbered recent queries, newest first, matching `again <i>`.
pub fn recent(recent: &RecentQueries) -> String {
    if recent.is_empty() {
        return "No recent searches.\n".to_owned();
    }
    let mut out = String::from("Recent searches:\n");
    for (i, query) in recent.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {query}", i + 1);
    }
    out
}
