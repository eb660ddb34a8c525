//! Builders for solution configuration XML documents.
//!
//! ```
//! use test_helpers::xml::{SolutionDoc, property};
//!
//! let xml = SolutionDoc::new()
//!     .section("com", "Blog", &property("label", "Blog & news"))
//!     .build();
//! assert!(xml.contains(r#"value="Blog &amp; news""#));
//! ```

/// One `SolutionConfig` section.
#[derive(Clone, Debug)]
struct Section {
    prefix: String,
    solution: String,
    body: String,
}

/// A `SolutionConfigurations` document assembled section by section.
#[derive(Clone, Debug, Default)]
pub struct SolutionDoc {
    sections: Vec<Section>,
}

impl SolutionDoc {
    /// Empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section whose children are the raw XML `body`.
    #[must_use]
    pub fn section(mut self, prefix: &str, solution: &str, body: &str) -> Self {
        self.sections.push(Section {
            prefix: prefix.to_owned(),
            solution: solution.to_owned(),
            body: body.to_owned(),
        });
        self
    }

    /// Render the document.
    #[must_use]
    pub fn build(&self) -> String {
        let mut out = String::from("<SolutionConfigurations>\n");
        for section in &self.sections {
            out.push_str(&format!(
                "  <SolutionConfig publisherPrefix=\"{}\" solutionName=\"{}\">\n",
                escape(&section.prefix),
                escape(&section.solution),
            ));
            for line in section.body.lines().filter(|l| !l.trim().is_empty()) {
                out.push_str("    ");
                out.push_str(line.trim_end());
                out.push('\n');
            }
            out.push_str("  </SolutionConfig>\n");
        }
        out.push_str("</SolutionConfigurations>\n");
        out
    }
}

/// `<property name=".." value=".."/>`
#[must_use]
pub fn property(name: &str, value: &str) -> String {
    format!(r#"<property name="{}" value="{}"/>"#, escape(name), escape(value))
}

/// A property holding a list of `<pvalue>` entries.
#[must_use]
pub fn list_property(name: &str, values: &[&str]) -> String {
    let items: String = values
        .iter()
        .map(|v| format!("<pvalue>{}</pvalue>", escape(v)))
        .collect();
    format!(
        r#"<property name="{}"><pvalues>{items}</pvalues></property>"#,
        escape(name)
    )
}

/// A named property set wrapping the raw XML `body`.
#[must_use]
pub fn property_set(name: &str, body: &str) -> String {
    format!(
        r#"<propertySet name="{}">{body}</propertySet>"#,
        escape(name)
    )
}

/// Single-section document of plain `name = value` properties.
#[must_use]
pub fn flat_document(prefix: &str, solution: &str, props: &[(&str, &str)]) -> String {
    let body: String = props
        .iter()
        .map(|(name, value)| property(name, value) + "\n")
        .collect();
    SolutionDoc::new().section(prefix, solution, &body).build()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::{flat_document, list_property};

    #[test]
    fn flat_document_wraps_properties_in_one_section() {
        let xml = flat_document("com", "Blog", &[("x", "1"), ("y", "<2>")]);
        assert_eq!(xml.matches("<SolutionConfig ").count(), 1);
        assert!(xml.contains(r#"<property name="x" value="1"/>"#));
        assert!(xml.contains(r#"value="&lt;2&gt;""#));
    }

    #[test]
    fn list_property_renders_each_value() {
        assert_eq!(
            list_property("tags", &["a", "b"]),
            r#"<property name="tags"><pvalues><pvalue>a</pvalue><pvalue>b</pvalue></pvalues></property>"#
        );
    }
}
