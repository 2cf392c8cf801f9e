use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

/// An inline image reference `![caption](path)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef<'a> {
    pub caption: &'a str,
    pub source: &'a str,
    /// Byte range of the whole reference within the line.
    pub span: Range<usize>,
}

impl<'a> ImageRef<'a> {
    fn pattern() -> &'static Regex {
        static IMAGE: OnceLock<Regex> = OnceLock::new();
        IMAGE.get_or_init(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("Invalid image regex"))
    }

    /// First image reference on the line, if any.
    pub fn find(line: &'a str) -> Option<Self> {
        let caps = Self::pattern().captures(line)?;
        let whole = caps.get(0)?;
        Some(Self {
            caption: caps.get(1).map_or("", |m| m.as_str()),
            source: caps.get(2).map_or("", |m| m.as_str()),
            span: whole.range(),
        })
    }

    /// The text around this reference, joined by a single space.
    pub fn residual(&self, line: &str) -> String {
        let before = line[..self.span.start].trim();
        let after = line[self.span.end..].trim();
        match (before.is_empty(), after.is_empty()) {
            (true, _) => after.to_string(),
            (_, true) => before.to_string(),
            _ => format!("{before} {after}"),
        }
    }
}
