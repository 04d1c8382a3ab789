use crate::error::ParseError;
use crate::html_text;
use crate::image;
use crate::nav::{self, SpineIndex};
use crate::reader::{self, Book, BookReader, Chapter, TocEntry};
use crate::text;
use rbook::prelude::*;
use rbook::Epub;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reader for EPUB 2 and EPUB 3 files
pub struct EpubReader;

impl BookReader for EpubReader {
    fn parse(&self, path: &Path) -> Result<Book, ParseError> {
        let epub = Epub::options()
            .strict(false)
            .open(path)
            .map_err(|e| ParseError::format(path, e))?;

        let title = epub
            .metadata()
            .title()
            .map(|t| t.value().trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| reader::file_stem(path));
        let author = epub
            .metadata()
            .creators()
            .map(|c| c.value().trim().to_string())
            .find(|name| !name.is_empty())
            .unwrap_or_else(|| reader::UNKNOWN_AUTHOR.to_string());

        let (chapters, spine) = read_chapters(&epub, path)?;
        let toc = read_toc(&epub, &spine, &chapters);
        let cover = image::find_cover(&epub);

        info!(
            file = %path.display(),
            chapters = chapters.len(),
            toc = toc.len(),
            cover = cover.is_some(),
            "parsed EPUB"
        );

        Ok(Book {
            title,
            author,
            source: path.to_path_buf(),
            chapters,
            toc,
            cover,
        })
    }
}

fn is_document(media_type: &str) -> bool {
    let media_type = media_type.to_lowercase();
    media_type.contains("xhtml") || media_type.contains("html")
}

/// Chapters in spine order, plus where each spine document ended up.
fn read_chapters(epub: &Epub, path: &Path) -> Result<(Vec<Chapter>, SpineIndex), ParseError> {
    let manifest = epub.manifest();
    let mut chapters = Vec::new();
    let mut spine = SpineIndex::default();
    let mut documents = 0;

    for item in epub.spine().entries() {
        let Some(entry) = manifest.by_id(item.idref()) else {
            warn!(idref = item.idref(), "spine item missing from manifest");
            continue;
        };
        if !is_document(entry.media_type()) {
            continue;
        }
        documents += 1;

        let href = entry.href().to_string();
        let bytes = match entry.read_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(%href, error = %e, "failed to read chapter, skipping");
                continue;
            }
        };

        let extracted = html_text::extract(&String::from_utf8_lossy(&bytes));
        let content = text::normalize(&extracted.body);
        if content.is_empty() {
            debug!(%href, "empty chapter, skipping");
            continue;
        }

        let index = chapters.len();
        let title = extracted
            .title
            .unwrap_or_else(|| format!("Chapter {}", index + 1));
        spine.insert(&href, index);
        chapters.push(Chapter {
            title,
            content,
            index,
        });
    }

    if documents == 0 {
        return Err(ParseError::format(path, "no content documents in spine"));
    }

    Ok((chapters, spine))
}

/// TOC from the package navigation, else one entry per chapter.
fn read_toc(epub: &Epub, spine: &SpineIndex, chapters: &[Chapter]) -> Vec<TocEntry> {
    let points = nav::read_nav_points(epub);
    let toc = nav::resolve_toc(&points, spine, chapters);
    if toc.is_empty() {
        debug!("no navigation entries, synthesizing TOC from chapters");
        return TocEntry::from_chapters(chapters);
    }
    toc
}
