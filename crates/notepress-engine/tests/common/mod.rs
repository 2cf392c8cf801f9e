use std::collections::HashMap;
use std::path::PathBuf;

use regex::{Captures, Regex};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR")))
}

/// Replaces generated UUIDs with `ID1`, `ID2`, ... in order of first appearance.
pub fn normalize_ids(html: &str) -> String {
    let uuid = Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").unwrap();
    let mut seen: HashMap<String, usize> = HashMap::new();
    uuid.replace_all(html, |caps: &Captures| {
        let next = seen.len() + 1;
        format!("ID{}", seen.entry(caps[0].to_string()).or_insert(next))
    })
    .into_owned()
}
