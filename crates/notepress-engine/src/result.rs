use serde::Serialize;

use crate::ids::BlockId;

/// Output of one compilation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    free_html: String,
    pay_html: String,
    combined_html: String,
    image_keys: Vec<String>,
    separator_id: Option<BlockId>,
    has_pay: bool,
}

impl ParseResult {
    pub(crate) fn new(
        free_html: String,
        pay_html: String,
        image_keys: Vec<String>,
        separator_id: Option<BlockId>,
        has_pay: bool,
    ) -> Self {
        let combined_html = format!("{free_html}{pay_html}");
        Self {
            free_html,
            pay_html,
            combined_html,
            image_keys,
            separator_id,
            has_pay,
        }
    }

    pub fn free_html(&self) -> &str {
        &self.free_html
    }

    pub fn pay_html(&self) -> &str {
        &self.pay_html
    }

    /// `free_html` followed by `pay_html`.
    pub fn combined_html(&self) -> &str {
        &self.combined_html
    }

    /// Storage key stems of every image, in document order.
    pub fn image_keys(&self) -> &[String] {
        &self.image_keys
    }

    /// Identifier of the block right before the paywall split, if any.
    pub fn separator_id(&self) -> Option<&BlockId> {
        self.separator_id.as_ref()
    }

    pub fn has_pay(&self) -> bool {
        self.has_pay
    }
}
