use std::fmt;
use std::path::PathBuf;

use crate::images::ImageError;
use crate::io::IoError;

/// Ways a paywall tag can be misused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayTagViolation {
    /// A `</pay>` token appeared anywhere in the document.
    ClosingTag,
    /// `<pay>` (or `<pay_line>`) shared its line with other content.
    NotAlone,
    /// A second `<pay>` line after the stream already switched.
    Duplicate,
}

impl fmt::Display for PayTagViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PayTagViolation::ClosingTag => "</pay> is not allowed",
            PayTagViolation::NotAlone => "<pay> must be on its own line",
            PayTagViolation::Duplicate => "<pay> allowed only once",
        };
        f.write_str(msg)
    }
}

/// Terminal failure of a compilation. No partial HTML survives one of these.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Invalid pay tag on line {line}: {violation}")]
    InvalidPayTag {
        violation: PayTagViolation,
        line: usize,
    },

    #[error("Failed to upload image {image} referenced from {}: {source}", document.display())]
    ImageUpload {
        document: PathBuf,
        image: String,
        #[source]
        source: ImageError,
    },

    #[error(transparent)]
    Read(#[from] IoError),
}

impl CompileError {
    pub fn pay_tag_violation(&self) -> Option<PayTagViolation> {
        match self {
            CompileError::InvalidPayTag { violation, .. } => Some(*violation),
            _ => None,
        }
    }
}
