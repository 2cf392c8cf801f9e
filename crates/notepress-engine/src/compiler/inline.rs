//! # Inline Formatting
//!
//! Rewrites links, bold, italic and strikethrough spans of a single line into
//! HTML. Substitutions run in a fixed order (link, bold, italic, strike), each
//! over the output of the previous one. Text is not escaped.

use std::sync::OnceLock;

use regex::Regex;

struct InlineRules {
    link: Regex,
    bold: Regex,
    italic: Regex,
    strike: Regex,
}

fn rules() -> &'static InlineRules {
    static RULES: OnceLock<InlineRules> = OnceLock::new();
    RULES.get_or_init(|| InlineRules {
        link: Regex::new(r"\[(.*?)\]\((.*?)\)").expect("Invalid link regex"),
        bold: Regex::new(r"\*\*(.+?)\*\*").expect("Invalid bold regex"),
        italic: Regex::new(r"\*(.+?)\*").expect("Invalid italic regex"),
        strike: Regex::new(r"~~(.+?)~~").expect("Invalid strikethrough regex"),
    })
}

pub fn format_inline(text: &str) -> String {
    let r = rules();
    let text = r.link.replace_all(text, r#"<a href="${2}">${1}</a>"#);
    let text = r.bold.replace_all(&text, "<strong>${1}</strong>");
    let text = r.italic.replace_all(&text, "<em>${1}</em>");
    let text = r.strike.replace_all(&text, "<s>${1}</s>");
    text.into_owned()
}
