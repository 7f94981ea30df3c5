// Minimal XML writer for the engine's input files. The schema is small and
// fixed, so elements are built as a tree and pretty-printed with two-space
// indentation, matching the layout the engine's own tooling produces.
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

/// A single XML element with attributes, text content and child elements.
#[derive(Debug, Clone)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Add an attribute. Attributes keep insertion order.
    pub fn attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push((name.into(), value.to_string()));
        self
    }

    /// Set text content. Mutually exclusive with children in this schema.
    pub fn text(mut self, text: impl ToString) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Render this element and its subtree as a complete XML document.
    pub fn to_document(&self) -> String {
        let mut out = String::from("<?xml version='1.0' encoding='utf-8'?>\n");
        self.write_into(&mut out, 0);
        out
    }

    fn write_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        let _ = write!(out, "<{}", self.name);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>\n");
            return;
        }
        if let Some(text) = &self.text {
            let _ = write!(out, ">{}</{}>\n", escape(text), self.name);
            return;
        }
        out.push_str(">\n");
        for child in &self.children {
            child.write_into(out, depth + 1);
        }
        for _ in 0..depth {
            out.push_str("  ");
        }
        let _ = write!(out, "</{}>\n", self.name);
    }
}

/// Escape the XML metacharacters in attribute values and text content.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Join numbers into the space-separated list form the schema uses for
/// vector-valued elements (mesh bounds, region coefficients, ...).
pub fn join_numbers<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write a document to `dir/filename`.
pub fn write_document(dir: &Path, filename: &str, root: &XmlElement) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(filename), root.to_document())
}
