//! Plain-text extraction from EPUB content documents (HTML / XHTML).

use crate::markers;
use scraper::{ElementRef, Html, Node};

/// Elements whose text is never part of the readable body
const NON_CONTENT: &[&str] = &["script", "style", "head", "meta", "link"];

/// Elements treated as one paragraph each
const BLOCKS: &[&str] = &["p", "div", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Class-based title locations, most specific first. Books converted from
/// other formats tend to mark chapter titles this way instead of headings.
const TITLE_CLASSES: &[(Option<&str>, &str)] = &[
    (Some("div"), "title1"),
    (Some("div"), "title"),
    (Some("p"), "title"),
    (None, "title"),
];

/// A first paragraph shorter than this may be a chapter title.
const MAX_TITLE_PARAGRAPH_CHARS: usize = 50;

/// Blocks longer than this are prose even if they open with a marker word.
const MIN_PROSE_BLOCK_CHARS: usize = 100;

/// Title and body text recovered from one content document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub title: Option<String>,
    /// Paragraphs separated by blank lines, not yet normalized
    pub body: String,
}

pub fn extract(html: &str) -> ExtractedText {
    let document = Html::parse_document(html);

    ExtractedText {
        title: extract_title(&document),
        body: extract_body(&document),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    for heading in ["h1", "h2", "h3"] {
        if let Some(element) = find_element(document, |el| el.value().name() == heading) {
            return non_empty(text_of(element, " "));
        }
    }

    for &(tag, class) in TITLE_CLASSES {
        let found = find_element(document, |el| {
            tag.map_or(true, |tag| el.value().name() == tag)
                && el.value().classes().any(|c| c == class)
        });
        if let Some(element) = found {
            return non_empty(text_of(element, " "));
        }
    }

    let first_paragraph = find_element(document, |el| el.value().name() == "p")?;
    let text = text_of(first_paragraph, " ");
    if text.chars().count() < MAX_TITLE_PARAGRAPH_CHARS && markers::starts_with_marker(&text) {
        return Some(text);
    }

    None
}

fn extract_body(document: &Html) -> String {
    let mut paragraphs: Vec<String> = Vec::new();

    for element in elements(document) {
        if !BLOCKS.contains(&element.value().name()) || in_non_content(element) {
            continue;
        }
        let text = text_of(element, " ");
        // Nested wrappers repeat their only child's text
        if text.is_empty() || paragraphs.last() == Some(&text) {
            continue;
        }
        paragraphs.push(text);
    }

    let has_prose = paragraphs.iter().any(|p| {
        p.chars().count() > MIN_PROSE_BLOCK_CHARS || !markers::starts_with_division(p)
    });
    if has_prose {
        return paragraphs.join("\n\n");
    }

    if let Some(body) = find_element(document, |el| el.value().name() == "body") {
        let mut raw = String::new();
        collect_with_breaks(body, &mut raw);
        let lines: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if !lines.is_empty() {
            return lines.join("\n\n");
        }
    }

    let mut strings = Vec::new();
    collect_strings(document.root_element(), &mut strings);
    strings.join(" ")
}

/// All elements in document order
fn elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document.root_element().descendants().filter_map(ElementRef::wrap)
}

fn find_element<'a>(
    document: &'a Html,
    mut predicate: impl FnMut(&ElementRef<'a>) -> bool,
) -> Option<ElementRef<'a>> {
    elements(document).find(|el| predicate(el))
}

fn in_non_content(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| NON_CONTENT.contains(&ancestor.value().name()))
}

/// Trimmed, non-empty text runs of an element joined with `separator`.
fn text_of(element: ElementRef<'_>, separator: &str) -> String {
    let mut strings = Vec::new();
    collect_strings(element, &mut strings);
    strings
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn collect_strings<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push(&**text),
            Node::Element(el) if !NON_CONTENT.contains(&el.name()) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_strings(child, out);
                }
            }
            _ => {}
        }
    }
}

/// Raw text with every `<br>` turned into a line break.
fn collect_with_breaks(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            Node::Element(el) if !NON_CONTENT.contains(&el.name()) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_with_breaks(child, out);
                }
            }
            _ => {}
        }
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
