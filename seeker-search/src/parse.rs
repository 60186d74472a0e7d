//! Result page parsing.
//!
//! Turns the markup of a DuckDuckGo HTML results page into a knowledge panel
//! entry, the organic result entries in document order, and the continuation
//! form for the page that follows. Missing elements fall back to fixed
//! defaults; only a body that is not HTML at all is an error.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::DEFAULT_RESULTS_ENDPOINT;
use crate::error::{Result, SearchError};
use crate::resolve::{absolutize, resolve};
use crate::types::{
    ContinuationDescriptor, Entry, Page, DEFAULT_PANEL_TITLE, NO_DESCRIPTION,
    NO_PANEL_DESCRIPTION, NO_TITLE,
};

/// Input types that never contribute to a form submission here.
const NON_SUBMITTED_INPUTS: &[&str] = &["submit", "button", "image", "reset", "file"];

/// Everything extracted from one results page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// The zero-click info box, if the page has one.
    pub knowledge_panel: Option<Entry>,
    /// Organic results in document order.
    pub results: Vec<Entry>,
    /// Form fields for the following page, if there is one.
    pub continuation: Option<ContinuationDescriptor>,
}

impl ParsedPage {
    /// Combine into display order: knowledge panel first, then organic results.
    pub fn into_page(self) -> Page {
        let mut entries = Vec::with_capacity(self.results.len() + 1);
        entries.extend(self.knowledge_panel);
        entries.extend(self.results);
        Page {
            entries,
            continuation: self.continuation,
        }
    }
}

struct Selectors {
    panel: Selector,
    panel_heading_link: Selector,
    panel_image: Selector,
    panel_abstract: Selector,
    result: Selector,
    result_title: Selector,
    result_link: Selector,
    result_icon: Selector,
    result_snippet: Selector,
    nav_form: Selector,
    form_control: Selector,
    submit_control: Selector,
    option: Selector,
}

impl Selectors {
    fn compile() -> Result<Self> {
        Ok(Self {
            panel: selector(".zci-wrapper")?,
            panel_heading_link: selector(".zci__heading a")?,
            panel_image: selector(".zci__image")?,
            panel_abstract: selector("#zero_click_abstract")?,
            result: selector(".results_links_deep")?,
            result_title: selector(".result__title")?,
            result_link: selector(".result__a")?,
            result_icon: selector(".result__icon__img")?,
            result_snippet: selector(".result__snippet")?,
            nav_form: selector(".nav-link form")?,
            form_control: selector("input, select, textarea")?,
            submit_control: selector("input[type=submit], button")?,
            option: selector("option")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| SearchError::Selector(format!("{css}: {e:?}")))
}

/// Parse a results page, resolving relative links against DuckDuckGo's
/// results endpoint.
///
/// # Errors
///
/// Returns [`SearchError::MalformedDocument`] if `html` is empty or does not
/// begin with markup. A body still in the proxy's quoted envelope starts with
/// `"` and fails the second check.
pub fn parse(html: &str) -> Result<ParsedPage> {
    let base = Url::parse(DEFAULT_RESULTS_ENDPOINT)
        .map_err(|e| SearchError::Config(format!("invalid document base: {e}")))?;
    parse_with_base(html, &base)
}

/// Parse a results page, resolving relative links against `base`.
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_with_base(html: &str, base: &Url) -> Result<ParsedPage> {
    ensure_markup(html)?;

    let sel = Selectors::compile()?;
    let document = Html::parse_document(html);

    let knowledge_panel = document
        .select(&sel.panel)
        .next()
        .map(|panel| parse_knowledge_panel(panel, &sel, base));

    let results: Vec<Entry> = document
        .select(&sel.result)
        .map(|container| parse_result(container, &sel, base))
        .collect();

    let continuation = find_next_form(&document, &sel).map(|form| {
        ContinuationDescriptor::from_fields(form_fields(form, &sel))
    });

    tracing::debug!(
        results = results.len(),
        knowledge_panel = knowledge_panel.is_some(),
        has_next = continuation.is_some(),
        "result page parsed"
    );

    Ok(ParsedPage {
        knowledge_panel,
        results,
        continuation,
    })
}

fn ensure_markup(html: &str) -> Result<()> {
    let body = html.trim_start_matches('\u{feff}').trim();
    if body.is_empty() {
        return Err(SearchError::MalformedDocument("empty document".into()));
    }
    if !body.starts_with('<') {
        return Err(SearchError::MalformedDocument(
            "document does not start with markup".into(),
        ));
    }
    Ok(())
}

fn parse_knowledge_panel(panel: ElementRef<'_>, sel: &Selectors, base: &Url) -> Entry {
    let heading = panel.select(&sel.panel_heading_link).next();

    let title = heading
        .map(|a| a.text().collect::<String>().trim().to_owned())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_PANEL_TITLE.to_owned());

    let href = heading.and_then(|a| a.value().attr("href")).unwrap_or("");
    let link = resolve(&absolutize(href, base));

    let image_url = panel
        .select(&sel.panel_image)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| absolutize(src, base))
        .filter(|src| !src.is_empty());

    let snippet = panel
        .select(&sel.panel_abstract)
        .next()
        .map(abstract_text)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_PANEL_DESCRIPTION.to_owned());

    Entry {
        is_knowledge_panel: true,
        title,
        link,
        snippet,
        image_url,
    }
}

/// Direct text children only; nested elements such as the "More at
/// Wikipedia" link are skipped.
fn abstract_text(container: ElementRef<'_>) -> String {
    let joined = container
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    joined
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" .", ".")
        .trim()
        .to_owned()
}

fn parse_result(container: ElementRef<'_>, sel: &Selectors, base: &Url) -> Entry {
    let title = single_line_text(container, &sel.result_title)
        .unwrap_or_else(|| NO_TITLE.to_owned());

    let href = container
        .select(&sel.result_link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .unwrap_or("");
    let link = resolve(&absolutize(href, base));

    let image_url = container
        .select(&sel.result_icon)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| absolutize(src, base))
        .filter(|src| !src.is_empty());

    let snippet = single_line_text(container, &sel.result_snippet)
        .unwrap_or_else(|| NO_DESCRIPTION.to_owned());

    Entry {
        is_knowledge_panel: false,
        title,
        link,
        snippet,
        image_url,
    }
}

/// Text of the first match with newlines removed; `None` when missing or blank.
fn single_line_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().replace('\n', "").trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Pick the form that leads to the next page.
///
/// Later pages carry a "Previous" form ahead of the "Next" one, so labelled
/// forms are matched by their submit button. Unlabelled markup falls back to
/// the first form.
fn find_next_form<'a>(document: &'a Html, sel: &Selectors) -> Option<ElementRef<'a>> {
    let forms: Vec<(ElementRef<'a>, Option<String>)> = document
        .select(&sel.nav_form)
        .map(|form| (form, submit_label(form, sel)))
        .collect();

    if forms.iter().all(|(_, label)| label.is_none()) {
        return forms.first().map(|(form, _)| *form);
    }

    forms
        .into_iter()
        .find(|(_, label)| {
            label
                .as_deref()
                .is_some_and(|l| l.to_ascii_lowercase().contains("next"))
        })
        .map(|(form, _)| form)
}

fn submit_label(form: ElementRef<'_>, sel: &Selectors) -> Option<String> {
    form.select(&sel.submit_control)
        .filter_map(|control| {
            let label = match control.value().attr("value") {
                Some(value) => value.trim().to_owned(),
                None => control.text().collect::<String>().trim().to_owned(),
            };
            (!label.is_empty()).then_some(label)
        })
        .next()
}

/// Collect the name/value pairs a browser would submit for `form`.
fn form_fields(form: ElementRef<'_>, sel: &Selectors) -> Vec<(String, String)> {
    let mut fields = Vec::new();

    for control in form.select(&sel.form_control) {
        let element = control.value();
        let Some(name) = element.attr("name").filter(|n| !n.is_empty()) else {
            continue;
        };
        if element.attr("disabled").is_some() {
            continue;
        }

        match element.name() {
            "input" => {
                let kind = element.attr("type").unwrap_or("text").to_ascii_lowercase();
                if NON_SUBMITTED_INPUTS.contains(&kind.as_str()) {
                    continue;
                }
                if matches!(kind.as_str(), "checkbox" | "radio") {
                    if element.attr("checked").is_none() {
                        continue;
                    }
                    let value = element.attr("value").unwrap_or("on");
                    fields.push((name.to_owned(), value.to_owned()));
                } else {
                    let value = element.attr("value").unwrap_or("");
                    fields.push((name.to_owned(), value.to_owned()));
                }
            }
            "select" => {
                let options: Vec<ElementRef<'_>> = control.select(&sel.option).collect();
                let selected: Vec<&ElementRef<'_>> = options
                    .iter()
                    .filter(|o| o.value().attr("selected").is_some())
                    .collect();
                if element.attr("multiple").is_some() {
                    for option in selected {
                        fields.push((name.to_owned(), option_value(*option)));
                    }
                } else if let Some(option) = selected.last().copied().or(options.first()) {
                    fields.push((name.to_owned(), option_value(*option)));
                }
            }
            "textarea" => {
                fields.push((name.to_owned(), control.text().collect()));
            }
            _ => {}
        }
    }

    fields
}

fn option_value(option: ElementRef<'_>) -> String {
    match option.value().attr("value") {
        Some(value) => value.to_owned(),
        None => option.text().collect::<String>().trim().to_owned(),
    }
}
