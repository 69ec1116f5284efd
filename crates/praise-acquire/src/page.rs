// Extraction of song data from a Praise! song page.
//
// The page shows the title as an <h2> inside the main content block, the
// lyric paragraphs as the <p> siblings that follow it, and a "Related
// Information" block whose <strong> labels precede the metadata values.

use crate::normalize::{normalize_lines, normalize_text};
use crate::types::{AcquiredSong, SourceInfo};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

/// Separators between several names in a single "Author:" link.
static AUTHOR_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?:&|\band\b)\s*").expect("valid regex"));

const RELATED_HEADING: &str = "Related Information";

/// Parse a song page into an `AcquiredSong`.
pub fn extract_song(html: &str, number: &str, url: &str, site: &str) -> Result<AcquiredSong> {
    let document = Html::parse_document(html);

    let title_sel = Selector::parse("div.main-content div.textual h2").expect("valid selector");
    let title_el = document
        .select(&title_sel)
        .next()
        .context("Could not find the song title (div.main-content div.textual h2)")?;
    let title = normalize_text(&title_el.text().collect::<String>());
    anyhow::ensure!(!title.is_empty(), "Song title is empty");

    let paragraphs = extract_paragraphs(title_el);
    tracing::debug!(title = %title, paragraphs = paragraphs.len(), "Extracted lyrics");

    let mut authors = Vec::new();
    let mut themes = Vec::new();
    let mut copyright = None;

    match find_related_heading(&document) {
        Some(related) => {
            let labels = labels_after(&document, related);

            if let Some(label) = find_label(&labels, "Author:") {
                if let Some(link) = following_links(label).into_iter().next() {
                    authors = split_author_field(&link_text(link));
                }
            } else if let Some(label) = find_label(&labels, "Authors:") {
                authors = following_links(label).into_iter().map(link_text).collect();
            }

            if let Some(label) = find_label(&labels, "Themes:") {
                themes = following_links(label).into_iter().map(link_text).collect();
            }

            if let Some(label) = find_label(&labels, "Copyright:") {
                copyright = next_sibling_text(label);
            }
        }
        None => {
            tracing::warn!(number = %number, "No '{RELATED_HEADING}' block; metadata left empty");
        }
    }

    authors.retain(|a| !a.is_empty());
    themes.retain(|t| !t.is_empty());

    Ok(AcquiredSong {
        source: SourceInfo {
            url: url.to_string(),
            site: site.to_string(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
        },
        number: number.to_string(),
        title,
        paragraphs,
        authors,
        themes,
        copyright,
    })
}

/// Collect the lines of every <p> sibling that follows the title heading.
fn extract_paragraphs(title_el: ElementRef<'_>) -> Vec<Vec<String>> {
    title_el
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "p")
        .map(|p| normalize_lines(p.text()))
        .collect()
}

fn find_related_heading(document: &Html) -> Option<ElementRef<'_>> {
    let h2_sel = Selector::parse("h2").expect("valid selector");
    document
        .select(&h2_sel)
        .find(|h| h.text().collect::<String>().trim() == RELATED_HEADING)
}

/// All <strong> elements after `anchor` in document order.
fn labels_after<'a>(document: &'a Html, anchor: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    document
        .tree
        .root()
        .descendants()
        .skip_while(|node| node.id() != anchor.id())
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "strong")
        .collect()
}

fn find_label<'a>(labels: &[ElementRef<'a>], label: &str) -> Option<ElementRef<'a>> {
    labels
        .iter()
        .copied()
        .find(|el| el.text().collect::<String>().trim() == label)
}

fn following_links(label: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    label
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "a")
        .collect()
}

fn link_text(link: ElementRef<'_>) -> String {
    normalize_text(&link.text().collect::<String>())
}

/// Text of the node directly after a label, e.g. `<strong>Copyright:</strong> 1990 Example`.
fn next_sibling_text(label: ElementRef<'_>) -> Option<String> {
    let sibling = label.next_sibling()?;
    let text = match sibling.value() {
        Node::Text(text) => normalize_text(text),
        Node::Element(_) => ElementRef::wrap(sibling)
            .map(|el| normalize_text(&el.text().collect::<String>()))
            .unwrap_or_default(),
        _ => String::new(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Split a single "Author:" value that may name several people.
///
/// Commas are left alone: "Newton, John" is one author written surname first.
pub fn split_author_field(field: &str) -> Vec<String> {
    AUTHOR_SEPARATOR
        .split(field)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
