//! # List Block Builder
//!
//! Compiles one list run into nested `<ul>`/`<ol>` markup using an explicit
//! indentation stack. Each `<li>` stays open until a sibling or shallower
//! item arrives, so deeper items nest inside their parent item.

use crate::ids::BlockId;

use super::{
    html,
    inline::format_inline,
    kinds::{ListItem, ListKind},
};

/// A frame in the nesting stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListFrame {
    indent: usize,
    kind: ListKind,
    /// Whether an `<li>` in this container still awaits its closing tag.
    item_open: bool,
}

/// A compiled list run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBlock {
    /// Identifier of the outermost container.
    pub id: BlockId,
    pub html: String,
}

pub struct ListBuilder {
    root_id: BlockId,
    /// The outermost frame; never popped before `finish`.
    root: ListFrame,
    /// Frames nested below the root, innermost last, indentation strictly increasing.
    nested: Vec<ListFrame>,
    out: String,
}

impl ListBuilder {
    /// Opens the root container with the type of the run's first item.
    pub fn new(first: &ListItem) -> Self {
        let root_id = BlockId::generate();
        let kind = first.kind();
        Self {
            out: html::list_open(kind, &root_id),
            root_id,
            root: ListFrame {
                indent: first.indent,
                kind,
                item_open: false,
            },
            nested: vec![],
        }
    }

    pub fn push(&mut self, item: &ListItem) {
        let kind = item.kind();
        let top = *self.top_mut();

        if item.indent > top.indent {
            let id = BlockId::generate();
            self.out.push_str(&html::list_open(kind, &id));
            self.nested.push(ListFrame {
                indent: item.indent,
                kind,
                item_open: false,
            });
        } else if item.indent < top.indent {
            while self.nested.last().is_some_and(|f| f.indent > item.indent) {
                if let Some(frame) = self.nested.pop() {
                    self.close_frame(frame);
                }
            }
            // Shallower than the root: the root absorbs the new indentation.
            if self.nested.is_empty() && self.root.indent > item.indent {
                self.root.indent = item.indent;
            }
            self.close_item();
        } else if kind != top.kind {
            self.close_item();
            self.out.push_str(&html::list_close(top.kind));
            let id = BlockId::generate();
            self.out.push_str(&html::list_open(kind, &id));
            self.top_mut().kind = kind;
        } else {
            self.close_item();
        }

        let paragraph_id = BlockId::generate();
        self.out
            .push_str(&html::list_item_open(&paragraph_id, &format_inline(&item.text)));
        self.top_mut().item_open = true;
    }

    pub fn finish(mut self) -> ListBlock {
        while let Some(frame) = self.nested.pop() {
            self.close_frame(frame);
        }
        let root = self.root;
        self.close_frame(root);
        ListBlock {
            id: self.root_id,
            html: self.out,
        }
    }

    fn top_mut(&mut self) -> &mut ListFrame {
        self.nested.last_mut().unwrap_or(&mut self.root)
    }

    fn close_item(&mut self) {
        let top = self.top_mut();
        if std::mem::take(&mut top.item_open) {
            self.out.push_str(html::LIST_ITEM_CLOSE);
        }
    }

    fn close_frame(&mut self, frame: ListFrame) {
        if frame.item_open {
            self.out.push_str(html::LIST_ITEM_CLOSE);
        }
        self.out.push_str(&html::list_close(frame.kind));
    }
}

/// Compiles a whole run; `None` for an empty run.
pub fn build_list(items: &[ListItem]) -> Option<ListBlock> {
    let first = items.first()?;
    let mut builder = ListBuilder::new(first);
    for item in items {
        builder.push(item);
    }
    Some(builder.finish())
}
