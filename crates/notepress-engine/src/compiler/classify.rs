use super::kinds::{
    BlockQuote, CodeFence, Heading, HeadingLevel, ImageRef, ListItem, ListMarker, PayTag, Rule,
    TableOfContents,
};

/// What a single line means, given whether it sits inside a fence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Contains `</pay>`; rejected in every mode.
    ClosingPayTag,
    /// Opens or closes a fence. `language` is only meaningful when opening.
    FenceDelimiter { language: &'a str },
    /// A line inside a fence, kept verbatim.
    Code(&'a str),
    Blank,
    ListItem(ListItem),
    TableOfContents,
    PayTag,
    /// `<pay>` sharing its line with other content, or `<pay_line>`.
    MisplacedPayTag,
    Image { image: ImageRef<'a>, line: &'a str },
    Heading { level: HeadingLevel, text: &'a str },
    BlockQuote(&'a str),
    Rule,
    Paragraph(&'a str),
}

/// Classifies lines for the compiler.
///
/// Checks run in priority order; the first match wins. Only the `</pay>` check
/// and the fence delimiter check apply inside a fence.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    pub fn classify<'a>(&self, raw: &'a str, in_fence: bool) -> LineClass<'a> {
        let raw = raw.trim_end_matches(['\r', '\n']);
        let trimmed = raw.trim();
        let lower = trimmed.to_lowercase();

        if PayTag::contains_close(&lower) {
            return LineClass::ClosingPayTag;
        }

        if CodeFence::is_delimiter(trimmed) {
            return LineClass::FenceDelimiter {
                language: CodeFence::language(trimmed),
            };
        }

        if in_fence {
            return LineClass::Code(raw);
        }

        if trimmed.is_empty() {
            return LineClass::Blank;
        }

        if let Some(item) = ListMarker::parse(raw) {
            return LineClass::ListItem(item);
        }

        if TableOfContents::matches(&lower) {
            return LineClass::TableOfContents;
        }

        if PayTag::mentioned(&lower) {
            return if PayTag::is_solitary(&lower) {
                LineClass::PayTag
            } else {
                LineClass::MisplacedPayTag
            };
        }

        if let Some(image) = ImageRef::find(trimmed) {
            return LineClass::Image {
                image,
                line: trimmed,
            };
        }

        if let Some(level) = Heading::level(trimmed) {
            LineClass::Heading {
                level,
                text: Heading::strip_prefix(trimmed),
            }
        } else if BlockQuote::matches(trimmed) {
            LineClass::BlockQuote(BlockQuote::strip_prefix(trimmed))
        } else if Rule::matches(trimmed) {
            LineClass::Rule
        } else {
            LineClass::Paragraph(trimmed)
        }
    }
}
