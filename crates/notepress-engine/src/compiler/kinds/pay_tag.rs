/// Paywall marker tokens. Callers pass the lowercased, trimmed line.
pub struct PayTag;

impl PayTag {
    pub const OPEN: &'static str = "<pay>";
    pub const LINE: &'static str = "<pay_line>";
    pub const CLOSE: &'static str = "</pay>";

    pub fn contains_close(lower: &str) -> bool {
        lower.contains(Self::CLOSE)
    }

    /// Whether the line mentions a paywall marker at all.
    pub fn mentioned(lower: &str) -> bool {
        lower.contains(Self::OPEN) || lower.contains(Self::LINE)
    }

    /// Only a line consisting of exactly `<pay>` splits the document.
    pub fn is_solitary(lower: &str) -> bool {
        lower == Self::OPEN
    }
}
