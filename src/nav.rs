//! EPUB navigation: rbook's table of contents as a tree, resolved to chapters.

use crate::reader::{Chapter, TocEntry};
use percent_encoding::percent_decode_str;
use rbook::ebook::resource::ResourceKey;
use rbook::prelude::TocEntry as _;
use rbook::prelude::*;
use rbook::Epub;
use std::collections::HashMap;
use tracing::debug;

/// One node of a navigation tree. Targets are archive paths as the
/// package resolved them and may still carry a `#fragment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavPoint {
    Leaf {
        title: String,
        target: Option<String>,
    },
    Section {
        title: String,
        target: Option<String>,
        children: Vec<NavPoint>,
    },
}

impl NavPoint {
    fn new(title: String, target: Option<String>, children: Vec<NavPoint>) -> Self {
        if children.is_empty() {
            NavPoint::Leaf { title, target }
        } else {
            NavPoint::Section {
                title,
                target,
                children,
            }
        }
    }
}

/// Maps spine documents to the chapter index they became.
#[derive(Debug, Default)]
pub struct SpineIndex {
    by_path: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl SpineIndex {
    /// Record that the spine document at `href` became chapter `chapter`.
    pub fn insert(&mut self, href: &str, chapter: usize) {
        let path = normalize_path(href);
        self.by_name
            .entry(file_name(&path).to_string())
            .or_insert(chapter);
        self.by_path.entry(path).or_insert(chapter);
    }

    /// Chapter for a navigation target; the fragment is ignored.
    pub fn lookup(&self, target: &str) -> Option<usize> {
        let path = normalize_path(target);
        if path.is_empty() {
            return None;
        }
        self.by_path
            .get(&path)
            .or_else(|| self.by_name.get(file_name(&path)))
            .copied()
    }
}

/// The book's navigation tree. rbook picks the EPUB 3 nav document or the
/// NCX, whichever the package provides.
pub fn read_nav_points(epub: &Epub) -> Vec<NavPoint> {
    let toc = epub.toc();
    let Some(root) = toc.contents() else {
        return Vec::new();
    };
    root.children().iter().map(nav_point).collect()
}

fn nav_point<'a>(entry: impl rbook::prelude::TocEntry<'a>) -> NavPoint {
    let title = entry.label().trim().to_string();
    let target = entry.resource().and_then(|resource| match resource.key() {
        ResourceKey::Value(href) => link_target(&href),
        ResourceKey::Position(_) => None,
    });
    let children = entry.children().iter().map(nav_point).collect();
    NavPoint::new(title, target, children)
}

/// External links have no chapter target.
fn link_target(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.contains("://") || href.starts_with("mailto:") {
        return None;
    }
    Some(href.to_string())
}

/// Flatten a navigation tree into TOC entries, resolving each to a chapter.
pub fn resolve_toc(points: &[NavPoint], spine: &SpineIndex, chapters: &[Chapter]) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    visit(points, 0, spine, chapters, &mut entries);
    entries
}

fn visit(
    points: &[NavPoint],
    level: usize,
    spine: &SpineIndex,
    chapters: &[Chapter],
    entries: &mut Vec<TocEntry>,
) {
    for point in points {
        let (title, target, children) = match point {
            NavPoint::Leaf { title, target } => (title, target, None),
            NavPoint::Section {
                title,
                target,
                children,
            } => (title, target, Some(children)),
        };

        if !title.is_empty() {
            entries.push(TocEntry {
                title: title.clone(),
                chapter_index: chapter_for(title, target.as_deref(), spine, chapters),
                level,
            });
        }
        if let Some(children) = children {
            visit(children, level + 1, spine, chapters, entries);
        }
    }
}

fn chapter_for(title: &str, target: Option<&str>, spine: &SpineIndex, chapters: &[Chapter]) -> usize {
    if let Some(index) = target.and_then(|target| spine.lookup(target)) {
        return index;
    }

    let wanted = title.to_lowercase();
    let titles: Vec<(String, usize)> = chapters
        .iter()
        .map(|chapter| (chapter.title.to_lowercase(), chapter.index))
        .collect();

    if let Some((_, index)) = titles.iter().find(|(title, _)| *title == wanted) {
        return *index;
    }
    if let Some((_, index)) = titles
        .iter()
        .find(|(title, _)| title.contains(&wanted) || wanted.contains(title.as_str()))
    {
        return *index;
    }

    debug!(title, ?target, "unresolved TOC entry, pointing at first chapter");
    0
}

/// Archive path without query or fragment, percent-decoded, with no
/// leading slash or `.` segments.
pub fn normalize_path(href: &str) -> String {
    let end = href.find(['#', '?']).unwrap_or(href.len());
    let decoded = percent_decode_str(&href[..end]).decode_utf8_lossy();
    decoded
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(title: &str, index: usize) -> Chapter {
        Chapter {
            title: title.to_string(),
            content: "text".to_string(),
            index,
        }
    }

    #[test]
    fn normalizes_archive_paths() {
        assert_eq!(normalize_path("/OEBPS/text/ch1.xhtml#p3"), "OEBPS/text/ch1.xhtml");
        assert_eq!(normalize_path("OEBPS/ch%202.xhtml?x=1"), "OEBPS/ch 2.xhtml");
        assert_eq!(normalize_path("./OEBPS//a.xhtml"), "OEBPS/a.xhtml");
        assert_eq!(normalize_path("#only-fragment"), "");
    }

    #[test]
    fn spine_lookup_ignores_leading_slash_and_fragment() {
        let mut spine = SpineIndex::default();
        spine.insert("/OEBPS/main/c1.xhtml", 0);
        spine.insert("/OEBPS/main/c2.xhtml", 1);
        spine.insert("/OEBPS/extra/c2.xhtml", 2);

        assert_eq!(spine.lookup("OEBPS/main/c1.xhtml#top"), Some(0));
        assert_eq!(spine.lookup("OEBPS/extra/c2.xhtml"), Some(2));
        assert_eq!(spine.lookup("elsewhere/c2.xhtml"), Some(1));
        assert_eq!(spine.lookup("#top"), None);
    }

    #[test]
    fn external_links_have_no_target() {
        assert_eq!(link_target("https://example.com/"), None);
        assert_eq!(link_target("mailto:someone@example.com"), None);
        assert_eq!(link_target("  "), None);
        assert_eq!(link_target("OEBPS/a.xhtml#s1"), Some("OEBPS/a.xhtml#s1".to_string()));
    }

    #[test]
    fn resolves_by_link_then_title_then_default() {
        let chapters = vec![chapter("Prologue", 0), chapter("The Storm", 1), chapter("Aftermath", 2)];
        let mut spine = SpineIndex::default();
        spine.insert("/OEBPS/a.xhtml", 0);
        spine.insert("/OEBPS/b.xhtml", 1);
        spine.insert("/OEBPS/c.xhtml", 2);

        let points = vec![
            NavPoint::Leaf {
                title: "Linked".to_string(),
                target: Some("/OEBPS/b.xhtml#x".to_string()),
            },
            NavPoint::Section {
                title: "By name".to_string(),
                target: Some("/elsewhere/c.xhtml".to_string()),
                children: vec![NavPoint::Leaf {
                    title: "THE STORM".to_string(),
                    target: None,
                }],
            },
            NavPoint::Leaf {
                title: "Aftermath and more".to_string(),
                target: Some("/OEBPS/missing.xhtml".to_string()),
            },
            NavPoint::Leaf {
                title: "Index".to_string(),
                target: None,
            },
        ];

        let toc = resolve_toc(&points, &spine, &chapters);
        let resolved: Vec<(usize, usize)> =
            toc.iter().map(|e| (e.chapter_index, e.level)).collect();
        assert_eq!(resolved, vec![(1, 0), (2, 0), (1, 1), (2, 0), (0, 0)]);
        assert!(toc.iter().all(|e| e.chapter_index < chapters.len()));
    }
}
