/// Normalize extracted book text into the plain-text form stored in chapters.
///
/// Horizontal whitespace runs become a single space, every line is trimmed,
/// runs of blank lines are capped at one and the whole string is trimmed.
pub fn normalize(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut blank_run = 0usize;

    for line in text.lines() {
        let line = collapse_spaces(line);

        if line.is_empty() {
            blank_run += 1;
            // Keep at most one blank line between paragraphs
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }

        result.push_str(&line);
        result.push('\n');
    }

    result.trim().to_string()
}

/// Collapse every run of non-newline whitespace into one space and trim.
fn collapse_spaces(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_horizontal_whitespace() {
        assert_eq!(normalize("a  \t b\u{a0}\u{a0}c"), "a b c");
    }

    #[test]
    fn caps_blank_line_runs() {
        assert_eq!(normalize("one\n\n\n\n\ntwo"), "one\n\ntwo");
        assert_eq!(normalize("one\n  \n\t\n \ntwo"), "one\n\ntwo");
    }

    #[test]
    fn keeps_single_line_breaks() {
        assert_eq!(normalize("verse one\nverse two"), "verse one\nverse two");
    }

    #[test]
    fn trims_lines_and_string() {
        assert_eq!(normalize("\n\n   first  \n   second   \n\n"), "first\nsecond");
        assert_eq!(normalize("  \r\n  "), "");
    }
}
