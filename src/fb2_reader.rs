use crate::error::ParseError;
use crate::fb2_text::{self, Names};
use crate::reader::{self, Book, BookReader, Chapter, TocEntry};
use crate::text;
use encoding_rs::{Encoding, UTF_8};
use roxmltree::{Document, Node, ParsingOptions};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Reader for FictionBook 2 files
pub struct Fb2Reader;

impl BookReader for Fb2Reader {
    fn parse(&self, path: &Path) -> Result<Book, ParseError> {
        let bytes = fs::read(path).map_err(|e| ParseError::format(path, e))?;
        let xml = decode(&bytes);

        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(&xml, options)
            .map_err(|e| ParseError::format(path, e))?;
        let root = doc.root_element();
        let names = Names::of(root);

        let title_info = names
            .child(root, "description")
            .and_then(|description| names.child(description, "title-info"));
        let title = title_info
            .and_then(|info| names.child(info, "book-title"))
            .map(|title| fb2_text::inline_text(title, &names))
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| reader::file_stem(path));
        let author = title_info
            .and_then(|info| names.child(info, "author"))
            .map(|author| author_name(author, &names))
            .unwrap_or_else(|| reader::UNKNOWN_AUTHOR.to_string());

        let chapters = read_chapters(root, &names);
        let toc = TocEntry::from_chapters(&chapters);

        info!(file = %path.display(), chapters = chapters.len(), "parsed FB2");

        Ok(Book {
            title,
            author,
            source: path.to_path_buf(),
            chapters,
            toc,
            cover: None,
        })
    }
}

/// Decode raw FB2 bytes using the BOM, else the XML declaration, else UTF-8.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| declared_encoding(bytes))
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!(encoding = used.name(), "malformed sequences replaced while decoding");
    }
    text
}

/// The `encoding="..."` label of the XML declaration, if it names a known encoding.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(200)];
    let head = String::from_utf8_lossy(head);
    let declaration = head.strip_prefix("<?xml")?;
    let declaration = &declaration[..declaration.find("?>")?];

    let value = declaration.split("encoding").nth(1)?;
    let value = value.trim_start().strip_prefix('=')?.trim_start();
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let label = value[1..].split(quote).next()?;

    Encoding::for_label(label.trim().as_bytes())
}

fn author_name(author: Node<'_, '_>, names: &Names<'_>) -> String {
    let parts: Vec<String> = ["first-name", "middle-name", "last-name"]
        .into_iter()
        .filter_map(|field| names.child(author, field))
        .map(|part| fb2_text::inline_text(part, names))
        .filter(|part| !part.is_empty())
        .collect();
    if !parts.is_empty() {
        return parts.join(" ");
    }

    names
        .child(author, "nickname")
        .map(|nickname| fb2_text::inline_text(nickname, names))
        .filter(|nickname| !nickname.is_empty())
        .unwrap_or_else(|| reader::UNKNOWN_AUTHOR.to_string())
}

fn read_chapters(root: Node<'_, '_>, names: &Names<'_>) -> Vec<Chapter> {
    let mut chapters = Vec::new();

    for body in names.children(root, "body") {
        if body.attribute("name") == Some("notes") {
            debug!("skipping notes body");
            continue;
        }

        let sections: Vec<Node<'_, '_>> = names.children(body, "section").collect();
        if sections.is_empty() {
            push_chapter(&mut chapters, "Main".to_string(), fb2_text::render_section(body, names));
            continue;
        }

        for section in sections {
            let index = chapters.len();
            let title = names
                .child(section, "title")
                .map(|title| fb2_text::title_text(title, names))
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| format!("Chapter {}", index + 1));
            push_chapter(&mut chapters, title, fb2_text::render_section(section, names));
        }
    }

    chapters
}

fn push_chapter(chapters: &mut Vec<Chapter>, title: String, raw: String) {
    let content = text::normalize(&raw);
    if content.is_empty() {
        debug!(%title, "empty section, skipping");
        return;
    }
    chapters.push(Chapter {
        title,
        content,
        index: chapters.len(),
    });
}
