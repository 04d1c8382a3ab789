use crate::paginator::{self, Page};
use crate::reader::{self, Book, Chapter, TocEntry};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything a renderer needs about one book, as emitted by `--json`.
#[derive(Debug, Serialize)]
pub struct BookReport<'a> {
    pub slug: String,
    pub title: &'a str,
    pub author: &'a str,
    pub format: String,
    pub chapters: &'a [Chapter],
    pub toc: &'a [TocEntry],
    pub cover_ext: Option<&'a str>,
    pub first_page: usize,
    pub pages: &'a [Page],
    pub page_ranges: BTreeMap<usize, (usize, usize)>,
}

impl<'a> BookReport<'a> {
    pub fn new(book: &'a Book, pages: &'a [Page]) -> Self {
        BookReport {
            slug: book.slug(),
            title: &book.title,
            author: &book.author,
            format: book.format(),
            chapters: &book.chapters,
            toc: &book.toc,
            cover_ext: book.cover_extension(),
            first_page: reader::first_page_number(book),
            pages,
            page_ranges: paginator::page_ranges(pages),
        }
    }
}

/// Human-readable summary of a parsed and paginated book.
pub fn format_summary(book: &Book, pages: &[Page]) -> String {
    let mut lines = Vec::new();

    lines.push(format!("# {}", book.title));
    lines.push(String::new());
    lines.push(format!("**Author:** {}", book.author));
    lines.push(format!("**Format:** {}", book.format()));
    lines.push(format!("**Slug:** {}", book.slug()));
    if let Some(extension) = book.cover_extension() {
        lines.push(format!("**Cover:** {extension} (page 0)"));
    }
    lines.push(format!(
        "**Chapters:** {}, **Pages:** {}",
        book.chapters.len(),
        pages.len()
    ));

    if !book.toc.is_empty() {
        let ranges = paginator::page_ranges(pages);
        lines.push(String::new());
        lines.push("## Table of Contents".to_string());
        lines.push(String::new());
        for entry in &book.toc {
            let indent = "  ".repeat(entry.level);
            match ranges.get(&entry.chapter_index) {
                Some((first, _)) => {
                    lines.push(format!("{indent}- {} (p. {first})", entry.title))
                }
                None => lines.push(format!("{indent}- {}", entry.title)),
            }
        }
    }

    lines.push(String::new());
    lines.join("\n")
}
