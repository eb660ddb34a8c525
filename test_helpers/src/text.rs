//! Text normalisation for comparing rendered documents.

/// Collapse every run of whitespace to a single space and drop whitespace
/// between adjacent XML tags.
#[must_use]
pub fn squash_whitespace(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.replace("> <", "><")
}

/// Trimmed, non-empty lines of `text`.
#[must_use]
pub fn content_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{content_lines, squash_whitespace};

    #[test]
    fn squash_whitespace_ignores_layout() {
        assert_eq!(
            squash_whitespace("<a>\n   <b  x=\"1\"/>\n</a>\n"),
            "<a><b x=\"1\"/></a>"
        );
    }

    #[test]
    fn content_lines_skips_blank_lines() {
        assert_eq!(content_lines("  a \n\n b\n"), ["a", "b"]);
    }
}
