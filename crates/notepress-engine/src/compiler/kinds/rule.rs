/// Horizontal rule. Any line starting with three dashes or asterisks.
pub struct Rule;

impl Rule {
    pub const MARKERS: [&'static str; 2] = ["---", "***"];

    pub fn matches(trimmed: &str) -> bool {
        Self::MARKERS.iter().any(|m| trimmed.starts_with(m))
    }
}
