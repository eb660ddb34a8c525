//! Minimal indented XML writer shared by the denormaliser and exporters.

const NEWLINE: &str = "\n";
pub(crate) const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

pub(crate) fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub(crate) struct XmlWriter {
    buffer: String,
    indent: usize,
}

impl XmlWriter {
    pub(crate) fn new() -> Self {
        let mut writer = Self {
            buffer: String::new(),
            indent: 0,
        };
        writer.line(XML_DECLARATION);
        writer
    }

    pub(crate) const fn indent(&mut self) {
        self.indent += 1;
    }

    pub(crate) const fn outdent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub(crate) fn line(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.buffer.push_str("  ");
        }
        self.buffer.push_str(line);
        self.buffer.push_str(NEWLINE);
    }

    /// Writes `<tag attr="..">`, `<tag attr=".."/>` when `empty` is set.
    pub(crate) fn open(&mut self, tag: &str, attrs: &[(&str, &str)], empty: bool) {
        let mut line = format!("<{tag}");
        for (name, value) in attrs {
            line.push_str(&format!(" {name}=\"{}\"", escape_xml(value)));
        }
        line.push_str(if empty { "/>" } else { ">" });
        self.line(&line);
        if !empty {
            self.indent();
        }
    }

    pub(crate) fn close(&mut self, tag: &str) {
        self.outdent();
        self.line(&format!("</{tag}>"));
    }

    pub(crate) fn text_element(&mut self, tag: &str, text: &str) {
        self.line(&format!("<{tag}>{}</{tag}>", escape_xml(text)));
    }

    pub(crate) fn finish(self) -> String {
        self.buffer
    }
}
