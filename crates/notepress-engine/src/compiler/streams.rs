//! # Paywall Splitter
//!
//! Owns the free and pay output streams and the single, irreversible switch
//! between them.

use crate::error::PayTagViolation;
use crate::ids::BlockId;
use crate::result::ParseResult;

use super::html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Free,
    Pay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Block(String),
    /// Fence markup and code lines; each is followed by a newline when rendered.
    Code(String),
}

/// One output stream, kept as parts until rendering.
#[derive(Debug, Default, Clone)]
pub struct Stream {
    parts: Vec<Part>,
}

impl Stream {
    pub fn render(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Block(html) => out.push_str(html),
                Part::Code(line) => {
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        out
    }
}

#[derive(Debug)]
pub struct PaywallSplitter {
    current: StreamKind,
    free: Stream,
    pay: Stream,
    last_block: Option<BlockId>,
    separator: Option<BlockId>,
}

impl PaywallSplitter {
    pub fn new() -> Self {
        Self {
            current: StreamKind::Free,
            free: Stream::default(),
            pay: Stream::default(),
            last_block: None,
            separator: None,
        }
    }

    /// Appends a block and makes it the separator candidate.
    pub fn emit(&mut self, id: BlockId, html: String) {
        self.active().parts.push(Part::Block(html));
        self.last_block = Some(id);
    }

    /// Appends markup that never serves as the separator anchor.
    pub fn emit_untracked(&mut self, html: String) {
        self.active().parts.push(Part::Block(html));
    }

    /// Opens a fence; the `<pre>` counts as the last block.
    pub fn open_code(&mut self, id: BlockId, html: String) {
        self.active().parts.push(Part::Code(html));
        self.last_block = Some(id);
    }

    pub fn push_code(&mut self, line: &str) {
        self.active().parts.push(Part::Code(line.to_string()));
    }

    pub fn close_code(&mut self) {
        self.active().parts.push(Part::Code(html::FENCE_CLOSE.to_string()));
    }

    /// Switches to the pay stream, anchored by a zero-width span.
    pub fn switch_to_pay(&mut self) -> Result<(), PayTagViolation> {
        if self.current == StreamKind::Pay {
            return Err(PayTagViolation::Duplicate);
        }
        self.separator = self.last_block.take();
        self.current = StreamKind::Pay;

        let anchor = BlockId::generate();
        let html = html::pay_anchor(&anchor);
        self.emit(anchor, html);
        Ok(())
    }

    pub fn finish(self, image_keys: Vec<String>) -> ParseResult {
        let has_pay = self.current == StreamKind::Pay;
        ParseResult::new(
            self.free.render(),
            self.pay.render(),
            image_keys,
            self.separator,
            has_pay,
        )
    }

    fn active(&mut self) -> &mut Stream {
        match self.current {
            StreamKind::Free => &mut self.free,
            StreamKind::Pay => &mut self.pay,
        }
    }
}

impl Default for PaywallSplitter {
    fn default() -> Self {
        Self::new()
    }
}
