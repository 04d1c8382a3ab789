use crate::epub_reader::EpubReader;
use crate::error::ParseError;
use crate::fb2_reader::Fb2Reader;
use crate::slug;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Shared chapter representation across all input formats
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    pub title: String,
    /// Normalized plain text, paragraphs separated by a blank line
    pub content: String,
    /// Position in [`Book::chapters`]
    pub index: usize,
}

/// One table of contents line pointing at a chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub title: String,
    pub chapter_index: usize,
    /// Nesting level, 0 is top level
    pub level: usize,
}

impl TocEntry {
    /// One level-0 entry per chapter, used when a book carries no navigation.
    pub fn from_chapters(chapters: &[Chapter]) -> Vec<TocEntry> {
        chapters
            .iter()
            .map(|chapter| TocEntry {
                title: chapter.title.clone(),
                chapter_index: chapter.index,
                level: 0,
            })
            .collect()
    }
}

/// Shared cover image representation across all input formats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub data: Vec<u8>,
    /// File extension without the dot ("jpg", "png", "gif")
    pub extension: String,
}

/// A parsed book. Built once by a [`BookReader`] and read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub source: PathBuf,
    pub chapters: Vec<Chapter>,
    pub toc: Vec<TocEntry>,
    #[serde(skip)]
    pub cover: Option<CoverImage>,
}

impl Book {
    /// Lower-cased file extension of the source ("epub", "fb2").
    pub fn format(&self) -> String {
        self.source
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    /// URL-safe permanent address for this book.
    pub fn slug(&self) -> String {
        slug::slugify(&self.title, &self.source)
    }

    pub fn has_cover(&self) -> bool {
        self.cover.is_some()
    }

    pub fn cover_extension(&self) -> Option<&str> {
        self.cover.as_ref().map(|cover| cover.extension.as_str())
    }
}

/// Page number the renderer starts from: 0 is reserved for a cover image.
pub fn first_page_number(book: &Book) -> usize {
    if book.has_cover() {
        0
    } else {
        1
    }
}

/// Trait for reading book formats (EPUB, FB2)
pub trait BookReader {
    /// Parse the file at `path` into the shared book model
    fn parse(&self, path: &Path) -> Result<Book, ParseError>;
}

/// Picks the reader for a file by its extension.
pub fn reader_for(path: &Path) -> Result<Box<dyn BookReader>, ParseError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());

    match extension.as_deref() {
        Some("epub") => Ok(Box::new(EpubReader)),
        Some("fb2") => Ok(Box::new(Fb2Reader)),
        _ => Err(ParseError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Parse one book file, rejecting books without any usable chapter.
pub fn parse_book(path: &Path) -> Result<Book, ParseError> {
    let book = reader_for(path)?.parse(path)?;

    if book.chapters.is_empty() {
        return Err(ParseError::EmptyResult {
            path: path.to_path_buf(),
        });
    }

    Ok(book)
}

/// File name without extension, the title of last resort.
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub(crate) const UNKNOWN_AUTHOR: &str = "Unknown";
