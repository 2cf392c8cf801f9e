/// Blockquote block type with owned delimiter constant.
///
/// Only single-level quotes are recognized; `>` characters after the first
/// prefix are stripped along with it.
pub struct BlockQuote;

impl BlockQuote {
    pub const PREFIX: &'static str = "> ";

    pub fn matches(trimmed: &str) -> bool {
        trimmed.starts_with(Self::PREFIX)
    }

    /// Strips every leading `>` and space, then surrounding whitespace.
    pub fn strip_prefix(trimmed: &str) -> &str {
        trimmed.trim_start_matches(['>', ' ']).trim()
    }
}
