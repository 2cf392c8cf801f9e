//! Shared helpers for the crate's unit tests.

use std::collections::HashMap;
use std::path::PathBuf;

use regex::{Captures, Regex};
use tempfile::TempDir;

use crate::images::{ImageBridge, ImageError, ResolvedImage};

pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Replaces every generated UUID with `ID1`, `ID2`, ... in order of first appearance.
pub fn normalize_ids(html: &str) -> String {
    let uuid = Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").unwrap();
    let mut seen: HashMap<String, usize> = HashMap::new();
    uuid.replace_all(html, |caps: &Captures| {
        let next = seen.len() + 1;
        let n = *seen.entry(caps[0].to_string()).or_insert(next);
        format!("ID{n}")
    })
    .into_owned()
}

/// Bridge serving canned uploads and counting calls per path.
#[derive(Debug, Default)]
pub struct StubBridge {
    uploads: HashMap<String, ResolvedImage>,
    pub calls: HashMap<String, usize>,
}

impl StubBridge {
    pub fn with(mut self, source: &str, url: &str, key: &str) -> Self {
        self.uploads.insert(
            source.to_string(),
            ResolvedImage {
                url: url.to_string(),
                storage_key: key.to_string(),
            },
        );
        self
    }
}

impl ImageBridge for StubBridge {
    fn resolve(&mut self, source: &str) -> Result<ResolvedImage, ImageError> {
        *self.calls.entry(source.to_string()).or_default() += 1;
        self.uploads
            .get(source)
            .cloned()
            .ok_or_else(|| ImageError::FileNotFound {
                path: PathBuf::from(source),
            })
    }
}
