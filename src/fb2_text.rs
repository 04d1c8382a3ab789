//! Rendering FictionBook body markup to plain text.

use roxmltree::Node;

/// Inline elements whose text flows into the surrounding paragraph
const INLINE: &[&str] = &[
    "emphasis",
    "strong",
    "strikethrough",
    "a",
    "sub",
    "sup",
    "code",
    "style",
];

/// Matches FB2 element names in the document's own namespace, so files
/// with and without the FictionBook namespace read the same.
#[derive(Debug, Clone, Copy)]
pub struct Names<'a> {
    namespace: Option<&'a str>,
}

impl<'a> Names<'a> {
    /// Takes the namespace of the root element.
    pub fn of(root: Node<'a, '_>) -> Self {
        Names {
            namespace: root.tag_name().namespace(),
        }
    }

    pub fn is(&self, node: Node<'_, '_>, name: &str) -> bool {
        node.is_element()
            && node.tag_name().name() == name
            && node.tag_name().namespace() == self.namespace
    }

    /// First direct child element called `name`.
    pub fn child<'n, 'i>(&self, node: Node<'n, 'i>, name: &str) -> Option<Node<'n, 'i>> {
        node.children().find(|child| self.is(*child, name))
    }

    /// All direct child elements called `name`.
    pub fn children<'n, 'i, 's>(
        &'s self,
        node: Node<'n, 'i>,
        name: &'s str,
    ) -> impl Iterator<Item = Node<'n, 'i>> + 's
    where
        'n: 's,
        'i: 's,
    {
        node.children().filter(move |child| self.is(*child, name))
    }

    fn local<'n>(&self, node: Node<'n, '_>) -> Option<&'n str> {
        (node.is_element() && node.tag_name().namespace() == self.namespace)
            .then(|| node.tag_name().name())
    }
}

/// Text of an element including its inline children, trimmed.
pub fn inline_text(node: Node<'_, '_>, names: &Names<'_>) -> String {
    let mut out = String::new();
    collect_inline(node, names, &mut out);
    out.trim().to_string()
}

fn collect_inline(node: Node<'_, '_>, names: &Names<'_>, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            out.push_str(child.text().unwrap_or_default());
        } else if names.local(child).is_some_and(|name| INLINE.contains(&name)) {
            collect_inline(child, names, out);
        }
    }
}

/// Text of a `<title>`: its paragraphs joined with a space.
pub fn title_text(title: Node<'_, '_>, names: &Names<'_>) -> String {
    let paragraphs: Vec<String> = names
        .children(title, "p")
        .map(|p| inline_text(p, names))
        .filter(|text| !text.is_empty())
        .collect();

    if paragraphs.is_empty() {
        inline_text(title, names)
    } else {
        paragraphs.join(" ")
    }
}

/// Plain text of a section or body, blocks separated by blank lines.
/// Nested sections are rendered in place, each led by its own title.
pub fn render_section(section: Node<'_, '_>, names: &Names<'_>) -> String {
    let mut blocks: Vec<String> = Vec::new();

    for child in section.children() {
        let Some(name) = names.local(child) else {
            continue;
        };
        match name {
            "p" => push_non_empty(&mut blocks, inline_text(child, names)),
            "empty-line" => blocks.push(String::new()),
            "subtitle" => {
                let text = inline_text(child, names);
                if !text.is_empty() {
                    blocks.push(format!("\n{text}\n"));
                }
            }
            "poem" => push_non_empty(&mut blocks, render_poem(child, names)),
            "cite" => push_non_empty(&mut blocks, render_cite(child, names)),
            "section" => {
                if let Some(title) = names.child(child, "title") {
                    push_non_empty(&mut blocks, title_text(title, names));
                }
                push_non_empty(&mut blocks, render_section(child, names));
            }
            // title, epigraph, image, annotation
            _ => {}
        }
    }

    blocks.join("\n\n")
}

fn render_poem(poem: Node<'_, '_>, names: &Names<'_>) -> String {
    let mut lines: Vec<String> = Vec::new();
    for stanza in names.children(poem, "stanza") {
        lines.extend(
            names
                .children(stanza, "v")
                .map(|v| inline_text(v, names))
                .filter(|text| !text.is_empty()),
        );
        lines.push(String::new());
    }
    lines.join("\n").trim().to_string()
}

fn render_cite(cite: Node<'_, '_>, names: &Names<'_>) -> String {
    let mut lines: Vec<String> = names
        .children(cite, "p")
        .map(|p| inline_text(p, names))
        .filter(|text| !text.is_empty())
        .map(|text| format!("  {text}"))
        .collect();

    if let Some(author) = names.child(cite, "text-author") {
        let author = inline_text(author, names);
        if !author.is_empty() {
            lines.push(format!("  \u{2014} {author}"));
        }
    }
    lines.join("\n")
}

fn push_non_empty(blocks: &mut Vec<String>, text: String) {
    if !text.is_empty() {
        blocks.push(text);
    }
}
