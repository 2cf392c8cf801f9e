use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Identifier of an emitted block, used as both its `id` and `name` attribute.
///
/// Generation is stateless: every call draws a fresh random v4 UUID, so
/// concurrent compilations never share a counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
