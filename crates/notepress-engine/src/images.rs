use std::path::{Path, PathBuf};

/// A hosted image as returned by an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Public URL the figure links to.
    pub url: String,
    /// Storage key reported by the host, e.g. `img/1700000000-abc.png`.
    pub storage_key: String,
}

impl ResolvedImage {
    /// File stem of the storage key's last path segment.
    ///
    /// This is the form the publish API expects in `image_keys`.
    pub fn key_stem(&self) -> &str {
        Path::new(&self.storage_key)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.storage_key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Image not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read image {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Image transport failed{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed upload response: {detail}")]
    MalformedResponse { detail: String },
}

/// Turns a local image reference into a hosted URL and storage key.
///
/// The compiler memoizes results per source path for the duration of one
/// parse, so an implementation is called at most once per distinct path.
pub trait ImageBridge {
    fn resolve(&mut self, source: &str) -> Result<ResolvedImage, ImageError>;
}

/// Bridge that uploads nothing.
///
/// Checks that the image is a regular file and reports its path as the URL and its file
/// name as the storage key. Used for offline previews.
#[derive(Debug, Default, Clone)]
pub struct LocalImageBridge {
    base_dir: Option<PathBuf>,
}

impl LocalImageBridge {
    /// Resolve relative image paths against `base_dir` instead of the working directory.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }
}

impl ImageBridge for LocalImageBridge {
    fn resolve(&mut self, source: &str) -> Result<ResolvedImage, ImageError> {
        let path = resolve_path(self.base_dir.as_deref(), source);
        if !path.is_file() {
            return Err(ImageError::FileNotFound { path });
        }

        let storage_key = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.to_string());

        Ok(ResolvedImage {
            url: path.to_string_lossy().into_owned(),
            storage_key,
        })
    }
}

/// Joins a relative image reference onto `base_dir`; absolute references pass through.
pub fn resolve_path(base_dir: Option<&Path>, source: &str) -> PathBuf {
    let source = Path::new(source);
    match base_dir {
        Some(base) if source.is_relative() => base.join(source),
        _ => source.to_path_buf(),
    }
}
