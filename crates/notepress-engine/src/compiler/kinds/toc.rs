/// Table-of-contents marker tokens, matched case-insensitively anywhere on a line.
pub struct TableOfContents;

impl TableOfContents {
    pub const TOKENS: [&'static str; 2] = ["<toc>", "<table of content>"];

    /// `lower` must already be lowercased.
    pub fn matches(lower: &str) -> bool {
        Self::TOKENS.iter().any(|t| lower.contains(t))
    }
}
