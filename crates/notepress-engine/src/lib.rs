//! # notepress-engine
//!
//! Compiles a line-oriented markdown document into the two HTML fragments
//! note.com's editor expects: a free part and a paywalled part.
//!
//! ```rust
//! use notepress_engine::{Document, LocalImageBridge, compile};
//!
//! let doc = Document::from_source("post.md", "# Hello\nfree\n<pay>\npaid");
//! let result = compile(&doc, &mut LocalImageBridge::default()).unwrap();
//! assert!(result.has_pay());
//! assert!(result.free_html().contains("free"));
//! assert!(result.pay_html().contains("paid"));
//! ```

pub mod compiler;
pub mod error;
pub mod ids;
pub mod images;
pub mod io;
pub mod result;

#[cfg(test)]
pub mod tests;

pub use compiler::{CompileOptions, MarkdownCompiler, compile, compile_with};
pub use error::{CompileError, PayTagViolation};
pub use ids::BlockId;
pub use images::{ImageBridge, ImageError, LocalImageBridge, ResolvedImage};
pub use io::{Document, IoError};
pub use result::ParseResult;
