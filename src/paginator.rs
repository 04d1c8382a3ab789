//! Splitting chapter text into fixed-size pages for small screens.

use crate::reader::Chapter;
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::mem;

/// Lines the first page of a chapter gives up to the chapter heading
const HEADING_LINES: usize = 3;

/// Named font size presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Small,
    #[default]
    Medium,
    Large,
}

impl Profile {
    pub fn geometry(self) -> PageGeometry {
        match self {
            Profile::Small => PageGeometry::new(38, 18),
            Profile::Medium => PageGeometry::new(32, 15),
            Profile::Large => PageGeometry::new(25, 11),
        }
    }
}

/// Screen size in character columns and text lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageGeometry {
    pub chars_per_line: usize,
    pub lines_per_page: usize,
}

impl PageGeometry {
    pub const fn new(chars_per_line: usize, lines_per_page: usize) -> Self {
        PageGeometry {
            chars_per_line,
            lines_per_page,
        }
    }

    /// Lines available on a chapter's first page.
    pub fn first_page_lines(&self) -> usize {
        self.lines_per_page.saturating_sub(HEADING_LINES).max(1)
    }
}

impl From<Profile> for PageGeometry {
    fn from(profile: Profile) -> Self {
        profile.geometry()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// 1-based; global across the book after [`Paginator::paginate_book`]
    pub number: usize,
    /// Wrapped lines joined with `\n`
    pub content: String,
    pub chapter_index: usize,
    pub chapter_title: String,
    pub is_chapter_start: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    geometry: PageGeometry,
}

impl Paginator {
    pub fn new(geometry: impl Into<PageGeometry>) -> Self {
        Paginator {
            geometry: geometry.into(),
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// The chapter body as wrapped screen lines, before grouping into pages.
    ///
    /// A leading copy of the chapter title is removed since the renderer
    /// shows it as a heading. Paragraphs end with one empty line; trailing
    /// empty lines are dropped.
    pub fn wrap_lines(&self, text: &str, title: &str) -> Vec<String> {
        let body = strip_title(text.trim(), title);
        let mut lines = Vec::new();

        for paragraph in body.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                lines.push(String::new());
                continue;
            }

            for line in paragraph.split('\n') {
                let line = line.trim();
                if line.is_empty() {
                    lines.push(String::new());
                    continue;
                }
                let wrapped = wrap(line, self.geometry.chars_per_line);
                if wrapped.is_empty() {
                    lines.push(String::new());
                } else {
                    lines.extend(wrapped);
                }
            }
            lines.push(String::new());
        }

        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines
    }

    /// Pages of one chapter, numbered from 1.
    pub fn paginate(&self, chapter: &Chapter) -> Vec<Page> {
        let lines = self.wrap_lines(&chapter.content, &chapter.title);
        let mut pages = Vec::new();
        let mut buffer: Vec<String> = Vec::new();

        for line in lines {
            buffer.push(line);
            let capacity = if pages.is_empty() {
                self.geometry.first_page_lines()
            } else {
                self.geometry.lines_per_page
            };
            if buffer.len() >= capacity {
                flush(&mut buffer, chapter, &mut pages);
            }
        }
        flush(&mut buffer, chapter, &mut pages);

        pages
    }

    /// Pages of a whole book, numbered contiguously from 1 in chapter order.
    pub fn paginate_book(&self, chapters: &[Chapter]) -> Vec<Page> {
        let mut pages = Vec::new();
        for chapter in chapters {
            for mut page in self.paginate(chapter) {
                page.number = pages.len() + 1;
                pages.push(page);
            }
        }
        pages
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Paginator::new(Profile::default())
    }
}

/// First and last page number of each chapter.
pub fn page_ranges(pages: &[Page]) -> BTreeMap<usize, (usize, usize)> {
    let mut ranges = BTreeMap::new();
    for page in pages {
        ranges
            .entry(page.chapter_index)
            .and_modify(|(_, last)| *last = page.number)
            .or_insert((page.number, page.number));
    }
    ranges
}

/// Emit the buffered lines as a page unless they are all blank.
fn flush(buffer: &mut Vec<String>, chapter: &Chapter, pages: &mut Vec<Page>) {
    let lines = mem::take(buffer);
    let start = lines.iter().position(|line| !line.is_empty());
    let end = lines.iter().rposition(|line| !line.is_empty());
    let (Some(start), Some(end)) = (start, end) else {
        return;
    };

    pages.push(Page {
        number: pages.len() + 1,
        content: lines[start..=end].join("\n"),
        chapter_index: chapter.index,
        chapter_title: chapter.title.clone(),
        is_chapter_start: pages.is_empty(),
    });
}

/// `text` without a leading, case-insensitive copy of `title`.
fn strip_title<'a>(text: &'a str, title: &str) -> &'a str {
    let mut rest = text.char_indices();
    for expected in title.chars() {
        match rest.next() {
            Some((_, actual)) if actual.to_lowercase().eq(expected.to_lowercase()) => {}
            _ => return text,
        }
    }
    let offset = rest.next().map_or(text.len(), |(at, _)| at);
    text[offset..].trim()
}

/// Greedy word wrap to `width` characters.
///
/// Words may break after a hyphen; words longer than a line are split.
pub fn wrap(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split_whitespace() {
        for (i, chunk) in hyphen_chunks(word).into_iter().enumerate() {
            let separator = usize::from(i == 0 && !current.is_empty());
            let chunk_len = chunk.chars().count();

            if current_len + separator + chunk_len <= width {
                if separator == 1 {
                    current.push(' ');
                }
                current.push_str(chunk);
                current_len += separator + chunk_len;
                continue;
            }

            if chunk_len <= width {
                lines.push(mem::take(&mut current));
                current.push_str(chunk);
                current_len = chunk_len;
                continue;
            }

            // Too long for any line: fill the current line, then split
            let mut rest = chunk;
            if !current.is_empty() {
                let room = width.saturating_sub(current_len + separator);
                if room > 0 {
                    let (head, tail) = split_at_char(rest, room);
                    if separator == 1 {
                        current.push(' ');
                    }
                    current.push_str(head);
                    rest = tail;
                }
                lines.push(mem::take(&mut current));
            }
            while rest.chars().count() > width {
                let (head, tail) = split_at_char(rest, width);
                lines.push(head.to_string());
                rest = tail;
            }
            current.push_str(rest);
            current_len = rest.chars().count();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// "well-known" becomes ["well-", "known"]. Only hyphens between two
/// alphanumeric characters are break points.
fn hyphen_chunks(word: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut chars = word.char_indices().peekable();
    let mut previous: Option<char> = None;

    while let Some((at, c)) = chars.next() {
        let next = chars.peek().map(|&(_, next)| next);
        if c == '-'
            && previous.is_some_and(char::is_alphanumeric)
            && next.is_some_and(char::is_alphanumeric)
        {
            let end = at + c.len_utf8();
            chunks.push(&word[start..end]);
            start = end;
        }
        previous = Some(c);
    }
    if start < word.len() {
        chunks.push(&word[start..]);
    }
    chunks
}

fn split_at_char(text: &str, chars: usize) -> (&str, &str) {
    let at = text
        .char_indices()
        .nth(chars)
        .map_or(text.len(), |(at, _)| at);
    text.split_at(at)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(title: &str, content: &str, index: usize) -> Chapter {
        Chapter {
            title: title.to_string(),
            content: content.to_string(),
            index,
        }
    }

    #[test]
    fn profiles_match_presets() {
        assert_eq!(Profile::default(), Profile::Medium);
        assert_eq!(Profile::Small.geometry(), PageGeometry::new(38, 18));
        assert_eq!(Profile::Medium.geometry(), PageGeometry::new(32, 15));
        assert_eq!(Profile::Large.geometry(), PageGeometry::new(25, 11));
        assert_eq!(PageGeometry::new(20, 2).first_page_lines(), 1);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
        assert_eq!(wrap("", 10), Vec::<String>::new());
    }

    #[test]
    fn breaks_after_hyphens_and_long_words() {
        assert_eq!(wrap("a well-known fact", 8), vec!["a well-", "known", "fact"]);
        assert_eq!(wrap("ab abcdefghijkl", 5), vec!["ab ab", "cdefg", "hijkl"]);
        assert_eq!(wrap("абвгдеёжзий", 4), vec!["абвг", "деёж", "зий"]);
    }

    #[test]
    fn forty_chars_on_a_narrow_screen() {
        let line = "aaaaaaaaa bbbbbbbbb ccccccccc ddddddddd";
        assert_eq!(line.len(), 39);
        let line = format!("{line}d");
        let paginator = Paginator::new(PageGeometry::new(20, 10));
        let pages = paginator.paginate(&chapter("Untitled", &line, 0));
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].content.lines().count(), 2);
        assert!(pages[0].is_chapter_start);
    }

    #[test]
    fn strips_repeated_title_case_insensitively() {
        let paginator = Paginator::default();
        let lines = paginator.wrap_lines("ГЛАВА 1\n\nТекст.", "Глава 1");
        assert_eq!(lines, vec!["Текст."]);
        let lines = paginator.wrap_lines("Intro text", "Introduction");
        assert_eq!(lines, vec!["Intro text"]);
    }

    #[test]
    fn paragraphs_keep_blank_separators() {
        let paginator = Paginator::new(PageGeometry::new(40, 10));
        let lines = paginator.wrap_lines("one\ntwo\n\nthree", "");
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn first_page_is_shorter() {
        let text: Vec<String> = (1..=12).map(|n| format!("line{n}")).collect();
        let paginator = Paginator::new(PageGeometry::new(20, 5));
        let pages = paginator.paginate(&chapter("T", &text.join("\n"), 3));

        // 12 lines: 2 on the first page, then 5 and 5
        let sizes: Vec<usize> = pages.iter().map(|p| p.content.lines().count()).collect();
        assert_eq!(sizes, vec![2, 5, 5]);
        assert_eq!(pages.iter().filter(|p| p.is_chapter_start).count(), 1);
        assert_eq!(pages[2].number, 3);
        assert!(pages.iter().all(|p| p.chapter_index == 3));
    }

    #[test]
    fn blank_page_buffers_are_discarded() {
        // The second buffer holds only blank lines and is dropped
        let paginator = Paginator::new(PageGeometry::new(20, 2));
        let pages = paginator.paginate(&chapter("T", "first\n\n\n\nsecond", 0));
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].content, "first");
        assert_eq!(pages[1].content, "second");
        assert_eq!(pages[1].number, 2);
        assert!(!pages[1].is_chapter_start);
    }

    #[test]
    fn title_only_chapter_has_no_pages() {
        let paginator = Paginator::default();
        assert!(paginator.paginate(&chapter("Epilogue", "Epilogue", 0)).is_empty());
    }

    #[test]
    fn book_numbering_and_ranges() {
        let paginator = Paginator::new(PageGeometry::new(20, 4));
        let chapters = vec![
            chapter("A", "a1\na2\na3", 0),
            chapter("B", "", 1),
            chapter("C", "c1", 2),
        ];
        let pages = paginator.paginate_book(&chapters);
        let numbers: Vec<usize> = pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        let ranges = page_ranges(&pages);
        assert_eq!(ranges.get(&0), Some(&(1, 2)));
        assert_eq!(ranges.get(&1), None);
        assert_eq!(ranges.get(&2), Some(&(3, 3)));
    }
}
