use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A markdown document loaded in full, split into lines.
///
/// `\r\n` and lone `\r` are treated as line breaks, and the breaks themselves
/// are not part of any line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    lines: Vec<String>,
}

impl Document {
    /// Read a markdown file and split it into lines
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| IoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_source(path, &content))
    }

    /// Build a document from in-memory content; `path` is only used for error reporting.
    pub fn from_source(path: impl Into<PathBuf>, content: &str) -> Self {
        let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
        Self {
            path: path.into(),
            lines: normalized.lines().map(str::to_string).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Directory relative image references are resolved against.
    pub fn base_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }
}
