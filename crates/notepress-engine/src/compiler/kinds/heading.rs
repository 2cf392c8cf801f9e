#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H2,
    H3,
}

impl HeadingLevel {
    pub fn tag(self) -> &'static str {
        match self {
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
        }
    }
}

/// ATX-style heading. The editor only knows two levels, so `#` and `##`
/// both map to `h2`.
pub struct Heading;

impl Heading {
    pub const H3_PREFIX: &'static str = "### ";
    pub const H2_PREFIXES: [&'static str; 2] = ["# ", "## "];

    pub fn level(trimmed: &str) -> Option<HeadingLevel> {
        if trimmed.starts_with(Self::H3_PREFIX) {
            Some(HeadingLevel::H3)
        } else if Self::H2_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            Some(HeadingLevel::H2)
        } else {
            None
        }
    }

    /// Strips leading `#` and spaces, then surrounding whitespace.
    pub fn strip_prefix(trimmed: &str) -> &str {
        trimmed.trim_start_matches(['#', ' ']).trim()
    }
}
