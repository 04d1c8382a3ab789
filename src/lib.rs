//! Turns EPUB and FB2 books into plain-text chapters and small-screen pages.
//!
//! [`reader::parse_book`] picks a [`reader::BookReader`] by file extension and
//! builds a [`reader::Book`]; [`paginator::Paginator`] splits its chapters into
//! numbered pages for a renderer.

pub mod cli;
pub mod converter;
pub mod epub_reader;
pub mod error;
pub mod fb2_reader;
pub mod fb2_text;
pub mod html_text;
pub mod image;
pub mod markers;
pub mod metadata;
pub mod nav;
pub mod paginator;
pub mod reader;
pub mod slug;
pub mod text;

pub use error::{ParseError, RunError};
pub use paginator::{Page, PageGeometry, Paginator, Profile};
pub use reader::{parse_book, Book, BookReader, Chapter, CoverImage, TocEntry};
