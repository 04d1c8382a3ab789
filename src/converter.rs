use crate::cli::Cli;
use crate::error::RunError;
use crate::metadata::{self, BookReport};
use crate::paginator::{PageGeometry, Paginator};
use crate::reader::{self, Book};
use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// Parse, order, paginate and print every book named on the command line.
pub fn convert(cli: &Cli) -> Result<()> {
    let books = load_books(&cli.inputs)?;
    let paginator = Paginator::new(cli.profile);
    let PageGeometry {
        chars_per_line,
        lines_per_page,
    } = paginator.geometry();
    info!(
        books = books.len(),
        profile = ?cli.profile,
        chars_per_line,
        lines_per_page,
        "paginating"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for book in &books {
        let pages = paginator.paginate_book(&book.chapters);
        info!(title = %book.title, pages = pages.len(), "paginated book");

        if cli.json {
            serde_json::to_writer(&mut out, &BookReport::new(book, &pages))
                .with_context(|| format!("Failed to write JSON for {}", book.source.display()))?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", metadata::format_summary(book, &pages))?;
        }
    }

    Ok(())
}

/// Parse each file, skipping the ones that fail, and return the books in a
/// stable order. Fails only when no file could be parsed.
pub fn load_books(paths: &[PathBuf]) -> Result<Vec<Book>, RunError> {
    let mut books = Vec::new();

    for path in paths {
        match reader::parse_book(path) {
            Ok(book) => books.push(book),
            Err(e) => warn!(file = %path.display(), error = %e, "skipping book"),
        }
    }

    if books.is_empty() {
        return Err(RunError::NoBooks {
            attempted: paths.len(),
        });
    }

    books.sort_by(compare_books);
    Ok(books)
}

fn compare_books(a: &Book, b: &Book) -> Ordering {
    natural_key(&a.title)
        .cmp(&natural_key(&b.title))
        .then_with(|| a.source.cmp(&b.source))
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum KeyPart {
    /// Digit run compared by value: significant length first, then digits
    Number(usize, String),
    Text(String),
}

/// Sort key where digit runs compare numerically ("Vol 2" < "Vol 10").
fn natural_key(title: &str) -> Vec<KeyPart> {
    let mut parts = Vec::new();
    let mut run = String::new();
    let mut in_digits = false;

    for c in title.to_lowercase().chars() {
        let is_digit = c.is_ascii_digit();
        if is_digit != in_digits && !run.is_empty() {
            parts.push(key_part(std::mem::take(&mut run), in_digits));
        }
        in_digits = is_digit;
        run.push(c);
    }
    if !run.is_empty() {
        parts.push(key_part(run, in_digits));
    }
    parts
}

fn key_part(run: String, digits: bool) -> KeyPart {
    if digits {
        let significant = run.trim_start_matches('0').to_string();
        KeyPart::Number(significant.len(), significant)
    } else {
        KeyPart::Text(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str, path: &str) -> Book {
        Book {
            title: title.to_string(),
            author: "Unknown".to_string(),
            source: PathBuf::from(path),
            chapters: Vec::new(),
            toc: Vec::new(),
            cover: None,
        }
    }

    #[test]
    fn digit_runs_sort_numerically() {
        let mut books = vec![
            titled("Vol 10", "c.epub"),
            titled("vol 2", "b.epub"),
            titled("Vol 2", "a.epub"),
            titled("Vol 007", "d.epub"),
        ];
        books.sort_by(compare_books);
        let order: Vec<&str> = books.iter().map(|b| b.source.to_str().unwrap()).collect();
        assert_eq!(order, vec!["a.epub", "b.epub", "d.epub", "c.epub"]);
    }

    #[test]
    fn no_parsable_books_is_fatal() {
        let paths = vec![PathBuf::from("missing.pdf"), PathBuf::from("missing.epub")];
        match load_books(&paths) {
            Err(RunError::NoBooks { attempted }) => assert_eq!(attempted, 2),
            other => panic!("expected NoBooks, got {other:?}"),
        }
    }
}
