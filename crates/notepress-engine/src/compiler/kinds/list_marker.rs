use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn tag(self) -> &'static str {
        match self {
            ListKind::Ordered => "ol",
            ListKind::Unordered => "ul",
        }
    }
}

/// One buffered list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Count of leading whitespace characters.
    pub indent: usize,
    /// `-`, `*`, or digits followed by `.`.
    pub marker: String,
    pub text: String,
}

impl ListItem {
    pub fn kind(&self) -> ListKind {
        if self.marker.ends_with('.') {
            ListKind::Ordered
        } else {
            ListKind::Unordered
        }
    }
}

/// List item syntax: indentation, a bullet or `N.` marker, whitespace, content.
pub struct ListMarker;

impl ListMarker {
    fn pattern() -> &'static Regex {
        static LIST_ITEM: OnceLock<Regex> = OnceLock::new();
        LIST_ITEM.get_or_init(|| {
            Regex::new(r"^(\s*)([-*]|\d+\.)\s+(.*)").expect("Invalid list item regex")
        })
    }

    /// Parses an untrimmed line into a list item.
    pub fn parse(raw: &str) -> Option<ListItem> {
        let caps = Self::pattern().captures(raw)?;
        Some(ListItem {
            indent: caps[1].chars().count(),
            marker: caps[2].to_string(),
            text: caps[3].to_string(),
        })
    }
}
