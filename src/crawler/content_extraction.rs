//! Content extraction functionality for the crawler module

use crate::crawler::SiteMetadata;
use scraper::{ElementRef, Html, Selector};

/// Maximum number of links kept per page
pub const MAX_LINKS: usize = 10;

/// Elements whose text never renders
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new line when rendered
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Extract metadata from a page
///
/// Malformed HTML never fails: the parser recovers and missing values come
/// back as empty strings.
///
/// # Arguments
///
/// * `html` - The HTML of the page
/// * `include_body_text` - Whether to collect the visible body text
///
/// # Returns
///
/// The extracted metadata
pub fn extract_metadata(html: &str, include_body_text: bool) -> SiteMetadata {
    let document = Html::parse_document(html);

    let title = first_text(&document, "title")
        .or_else(|| meta_content(&document, "meta[property='og:title']"))
        .unwrap_or_default();

    let description = meta_content(&document, "meta[name='description']")
        .or_else(|| meta_content(&document, "meta[property='og:description']"))
        .unwrap_or_default();

    let links = extract_links(&document);

    let body_text = include_body_text.then(|| extract_body_text(&document));

    SiteMetadata {
        title,
        description,
        links,
        body_text,
    }
}

/// Collect anchor hrefs in document order, skipping empty ones
fn extract_links(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.is_empty())
        .take(MAX_LINKS)
        .map(str::to_string)
        .collect()
}

/// Visible text under `<body>` with whitespace runs collapsed
///
/// Text nodes are concatenated as-is, so inline markup never splits a word.
/// Block elements are separated by a space on both sides.
fn extract_body_text(document: &Html) -> String {
    let Ok(selector) = Selector::parse("body") else {
        return String::new();
    };

    let mut raw = String::new();
    for body in document.select(&selector) {
        for node in body.descendants() {
            let after_block = node
                .prev_sibling()
                .and_then(ElementRef::wrap)
                .is_some_and(|element| is_block(&element));
            if after_block {
                raw.push(' ');
            }

            if let Some(element) = ElementRef::wrap(node) {
                if is_block(&element) {
                    raw.push(' ');
                }
                continue;
            }

            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().filter_map(ElementRef::wrap).any(|element| {
                INVISIBLE_ELEMENTS.contains(&element.value().name())
            });
            if !hidden {
                raw.push_str(text);
            }
        }
    }

    collapse_whitespace(&raw)
}

fn is_block(element: &ElementRef<'_>) -> bool {
    BLOCK_ELEMENTS.contains(&element.value().name())
}

/// Collapse whitespace runs to a single space and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of the first element matching `selector`, if non-empty
fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// `content` attribute of the first element matching `selector`, if non-empty
fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}
