use chrono::{DateTime, Local};
use scraper::{ElementRef, Html, Selector};
use tokio::task::spawn_blocking;

use crate::record::{ArchiveLink, ArchiveRecord, DebugInfo, ExtractionStatus};
use crate::{Error, Result};

const NO_TITLE: &str = "No title";
const LINK_CONTEXT_CHARS: usize = 100;

/// Subtrees whose text is never rendered.
const HIDDEN_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Elements that start and end a line of rendered text.
const BLOCK_TAGS: [&str; 37] = [
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// One way of locating the content region of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionStrategy {
    /// The first element matching the selector.
    First(&'static str),
    /// The matching element with the most text. Ties go to the earliest one.
    LongestText(&'static str),
}

/// Tried in order; the first strategy yielding an element with non-empty text wins.
pub const REGION_STRATEGIES: [RegionStrategy; 4] = [
    RegionStrategy::First(".prose"),
    RegionStrategy::First("main"),
    RegionStrategy::First("article"),
    RegionStrategy::LongestText("div"),
];

impl RegionStrategy {
    fn select<'a>(&self, doc: &'a Html) -> Result<Option<ElementRef<'a>>> {
        match *self {
            Self::First(sel_str) => {
                let selector = create_selector(sel_str)?;
                let first = doc.select(&selector).next();
                Ok(first)
            }
            Self::LongestText(sel_str) => {
                let selector = create_selector(sel_str)?;
                let mut best: Option<(usize, ElementRef<'a>)> = None;
                for el in doc.select(&selector) {
                    let len = el.text().map(|t| t.chars().count()).sum::<usize>();
                    if best.map_or(true, |(best_len, _)| len > best_len) {
                        best = Some((len, el));
                    }
                }
                Ok(best.map(|(_, el)| el))
            }
        }
    }
}

/// Parses the page on the blocking pool, stamping missing dates with the local clock.
/// Returns `None` for an empty page.
pub async fn parse_archive(html: String, source_url: String) -> Result<Option<ArchiveRecord>> {
    let record = spawn_blocking(move || extract_archive(&html, &source_url, Local::now)).await??;
    Ok(record)
}

/// Turns raw HTML into an `ArchiveRecord`.
/// `now` is only called when the page carries no usable `<time datetime>`.
pub fn extract_archive<F>(html: &str, source_url: &str, now: F) -> Result<Option<ArchiveRecord>>
where
    F: FnOnce() -> DateTime<Local>,
{
    if html.is_empty() {
        return Ok(None);
    }
    let doc = Html::parse_document(html);

    let title = first_text(&doc, "h1")?
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let time_selector = create_selector("time")?;
    let date = doc
        .select(&time_selector)
        .next()
        .and_then(|el| el.value().attr("datetime"))
        .map(str::to_string)
        .unwrap_or_else(|| now().to_rfc3339());

    let (text_content, links) = match select_region(&doc)? {
        Some(region) => (render_text(region), extract_links(region)?),
        None => (String::new(), Vec::new()),
    };

    Ok(Some(ArchiveRecord {
        title,
        date,
        debug_info: DebugInfo {
            source_url: source_url.to_string(),
            extraction_status: ExtractionStatus::from_text(&text_content),
        },
        text_content,
        links,
    }))
}

/// Runs `REGION_STRATEGIES` in order and returns the first region with rendered text.
pub fn select_region(doc: &Html) -> Result<Option<ElementRef<'_>>> {
    for strategy in REGION_STRATEGIES {
        if let Some(el) = strategy.select(doc)? {
            if !render_text(el).is_empty() {
                return Ok(Some(el));
            }
        }
    }
    Ok(None)
}

/// Every anchor in the region with both an `href` and visible text.
fn extract_links(region: ElementRef) -> Result<Vec<ArchiveLink>> {
    let anchor_selector = create_selector("a")?;
    let links = region
        .select(&anchor_selector)
        .filter_map(|anchor| {
            let url = anchor.value().attr("href")?.trim();
            let text = collapse_whitespace(&anchor.text().collect::<String>());
            if url.is_empty() || text.is_empty() {
                return None;
            }
            let context = anchor
                .parent()
                .and_then(ElementRef::wrap)
                .map(|parent| {
                    collapse_whitespace(&parent.text().collect::<String>())
                        .chars()
                        .take(LINK_CONTEXT_CHARS)
                        .collect()
                })
                .unwrap_or_default();
            Some(ArchiveLink {
                text,
                url: url.to_string(),
                context,
            })
        })
        .collect();
    Ok(links)
}

/// Visible text of the region, one line per block element, whitespace normalized.
pub fn render_text(region: ElementRef) -> String {
    let mut raw = String::new();
    push_visible_text(region, &mut raw);
    normalize_text(&raw)
}

fn push_visible_text(el: ElementRef, out: &mut String) {
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if HIDDEN_TAGS.contains(&name) {
                continue;
            }
            if name == "br" {
                out.push('\n');
                continue;
            }
            let is_block = BLOCK_TAGS.contains(&name);
            if is_block {
                break_line(out);
            }
            push_visible_text(child_el, out);
            if is_block {
                break_line(out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

/// Trims every line, squeezes spaces/tabs, and leaves at most one blank line in a row.
pub fn normalize_text(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut pending_blank = false;
    for line in raw.lines() {
        let line = line
            .split([' ', '\t'])
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let line = line.trim();
        if line.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }
        if pending_blank {
            lines.push(String::new());
            pending_blank = false;
        }
        lines.push(line.to_string());
    }
    lines.join("\n")
}

/// Block boundaries share a single line break; blank lines only come from the source.
#[inline]
fn break_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

#[inline]
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_text(doc: &Html, sel_str: &str) -> Result<Option<String>> {
    let selector = create_selector(sel_str)?;
    let text = doc.select(&selector).next().map(|el| el.text().collect());
    Ok(text)
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::InvalidSelector(sel_str.into()))
}
