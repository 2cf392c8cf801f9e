//! # Markdown Compiler
//!
//! Single pass over a document's lines producing free and pay HTML.
//!
//! ## Phases per line
//!
//! 1. **Line Classification** (`classify`): a `LineClass` from local facts plus
//!    whether a fence is open
//! 2. **Dispatch** (`MarkdownCompiler::push`): list items are buffered into a
//!    run; anything else flushes the run (`lists`) and emits a block into the
//!    active stream (`streams`)
//!
//! ## Modules
//!
//! - **`kinds`**: syntax knowledge per block kind (delimiters, tokens, prefixes)
//! - **`classify`**: `MarkdownLineClassifier` producing `LineClass`
//! - **`lists`**: `ListBuilder`, nesting stack for one list run
//! - **`inline`**: link/bold/italic/strikethrough rewriting
//! - **`streams`**: `PaywallSplitter`, the free/pay streams and the separator anchor
//! - **`html`**: markup for each emitted block
//!
//! ## Key Invariants
//!
//! - A `</pay>` token anywhere aborts the compilation, even inside a fence
//! - Fenced code is a raw zone: no block or inline processing inside
//! - The list nesting stack is fully unwound before any other block is emitted
//! - The stream switches to pay at most once

pub mod classify;
pub mod html;
pub mod inline;
pub mod kinds;
pub mod lists;
pub mod streams;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{CompileError, PayTagViolation};
use crate::ids::BlockId;
use crate::images::{ImageBridge, ResolvedImage};
use crate::io::Document;
use crate::result::ParseResult;

use classify::{LineClass, MarkdownLineClassifier};
use inline::format_inline;
use kinds::{ImageRef, ListItem};
use lists::build_list;
use streams::PaywallSplitter;

/// Label of the heading emitted above a table of contents.
pub const DEFAULT_TOC_LABEL: &str = "目次";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub toc_label: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            toc_label: DEFAULT_TOC_LABEL.to_string(),
        }
    }
}

/// Compile a document with default options.
pub fn compile(doc: &Document, bridge: &mut dyn ImageBridge) -> Result<ParseResult, CompileError> {
    compile_with(doc, bridge, CompileOptions::default())
}

pub fn compile_with(
    doc: &Document,
    bridge: &mut dyn ImageBridge,
    options: CompileOptions,
) -> Result<ParseResult, CompileError> {
    let mut compiler = MarkdownCompiler::new(doc.path(), bridge, options);
    for (index, line) in doc.lines().iter().enumerate() {
        compiler.push(line, index + 1)?;
    }
    Ok(compiler.finish())
}

/// Compilation state for exactly one document.
pub struct MarkdownCompiler<'b> {
    document: PathBuf,
    classifier: MarkdownLineClassifier,
    bridge: &'b mut dyn ImageBridge,
    options: CompileOptions,
    resolved: HashMap<String, ResolvedImage>,
    list_run: Vec<ListItem>,
    in_fence: bool,
    streams: PaywallSplitter,
    image_keys: Vec<String>,
}

impl<'b> MarkdownCompiler<'b> {
    pub fn new(document: &Path, bridge: &'b mut dyn ImageBridge, options: CompileOptions) -> Self {
        Self {
            document: document.to_path_buf(),
            classifier: MarkdownLineClassifier,
            bridge,
            options,
            resolved: HashMap::new(),
            list_run: vec![],
            in_fence: false,
            streams: PaywallSplitter::new(),
            image_keys: vec![],
        }
    }

    /// Feeds one line; `line_no` is 1-based and only used in errors.
    pub fn push(&mut self, raw: &str, line_no: usize) -> Result<(), CompileError> {
        match self.classifier.classify(raw, self.in_fence) {
            LineClass::ClosingPayTag => {
                return Err(invalid_pay_tag(PayTagViolation::ClosingTag, line_no));
            }
            LineClass::FenceDelimiter { language } => {
                self.flush_list();
                if self.in_fence {
                    self.streams.close_code();
                } else {
                    let id = BlockId::generate();
                    let open = html::fence_open(&id, language);
                    self.streams.open_code(id, open);
                }
                self.in_fence = !self.in_fence;
            }
            LineClass::Code(line) => self.streams.push_code(line),
            LineClass::Blank => self.flush_list(),
            LineClass::ListItem(item) => self.list_run.push(item),
            other => {
                self.flush_list();
                self.emit(other, line_no)?;
            }
        }
        Ok(())
    }

    /// Flushes the pending list run and closes an unterminated fence.
    pub fn finish(mut self) -> ParseResult {
        self.flush_list();
        if self.in_fence {
            self.streams.close_code();
        }
        self.streams.finish(self.image_keys)
    }

    fn emit(&mut self, class: LineClass<'_>, line_no: usize) -> Result<(), CompileError> {
        match class {
            LineClass::TableOfContents => {
                let heading = html::element("h2", &BlockId::generate(), &self.options.toc_label);
                self.streams.emit_untracked(heading);
                let id = BlockId::generate();
                let toc = html::table_of_contents(&id);
                self.streams.emit(id, toc);
            }
            LineClass::PayTag => self
                .streams
                .switch_to_pay()
                .map_err(|violation| invalid_pay_tag(violation, line_no))?,
            LineClass::MisplacedPayTag => {
                return Err(invalid_pay_tag(PayTagViolation::NotAlone, line_no));
            }
            LineClass::Image { image, line } => self.emit_image(&image, line)?,
            LineClass::Heading { level, text } => self.emit_element(level.tag(), text),
            LineClass::BlockQuote(text) => self.emit_element("blockquote", text),
            LineClass::Rule => {
                let id = BlockId::generate();
                let hr = html::rule(&id);
                self.streams.emit(id, hr);
            }
            LineClass::Paragraph(text) => self.emit_element("p", text),
            // Handled in `push`.
            LineClass::FenceDelimiter { .. }
            | LineClass::Code(_)
            | LineClass::Blank
            | LineClass::ListItem(_)
            | LineClass::ClosingPayTag => {}
        }
        Ok(())
    }

    fn emit_element(&mut self, tag: &str, text: &str) {
        let id = BlockId::generate();
        let html = html::element(tag, &id, &format_inline(text));
        self.streams.emit(id, html);
    }

    fn emit_image(&mut self, image: &ImageRef<'_>, line: &str) -> Result<(), CompileError> {
        let resolved = self.resolve_image(image.source)?;

        let id = BlockId::generate();
        let figure = html::figure(&id, &resolved, image.caption);
        self.image_keys.push(resolved.key_stem().to_string());
        self.streams.emit(id, figure);

        // Anything else on the line, later images included, stays inline text.
        let residual = image.residual(line);
        if !residual.is_empty() {
            self.emit_element("p", &residual);
        }
        Ok(())
    }

    fn resolve_image(&mut self, source: &str) -> Result<ResolvedImage, CompileError> {
        if let Some(hit) = self.resolved.get(source) {
            return Ok(hit.clone());
        }
        let resolved = self
            .bridge
            .resolve(source)
            .map_err(|err| CompileError::ImageUpload {
                document: self.document.clone(),
                image: source.to_string(),
                source: err,
            })?;
        self.resolved.insert(source.to_string(), resolved.clone());
        Ok(resolved)
    }

    fn flush_list(&mut self) {
        let run = std::mem::take(&mut self.list_run);
        if let Some(block) = build_list(&run) {
            self.streams.emit(block.id, block.html);
        }
    }
}

fn invalid_pay_tag(violation: PayTagViolation, line: usize) -> CompileError {
    CompileError::InvalidPayTag { violation, line }
}
