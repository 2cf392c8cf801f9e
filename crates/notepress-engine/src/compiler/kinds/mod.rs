//! # Block Kinds
//!
//! Every piece of syntax knowledge (delimiters, tokens, prefix rules) lives
//! with the kind it belongs to. The classifier asks these types; it never
//! hardcodes ```` ``` ````, `<pay>` or `### ` itself.

pub mod block_quote;
pub mod code_fence;
pub mod heading;
pub mod image;
pub mod list_marker;
pub mod pay_tag;
pub mod rule;
pub mod toc;

pub use block_quote::BlockQuote;
pub use code_fence::CodeFence;
pub use heading::{Heading, HeadingLevel};
pub use image::ImageRef;
pub use list_marker::{ListItem, ListKind, ListMarker};
pub use pay_tag::PayTag;
pub use rule::Rule;
pub use toc::TableOfContents;
