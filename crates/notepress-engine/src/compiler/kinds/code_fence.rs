/// Fenced code block type with owned delimiter constant.
pub struct CodeFence;

impl CodeFence {
    pub const DELIMITER: &'static str = "```";

    /// Whether a trimmed line opens or closes a fence.
    pub fn is_delimiter(trimmed: &str) -> bool {
        trimmed.starts_with(Self::DELIMITER)
    }

    /// Language tag of an opening fence: everything after the backticks.
    pub fn language(trimmed: &str) -> &str {
        trimmed.trim_start_matches('`').trim()
    }
}
