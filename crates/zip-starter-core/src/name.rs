//! Archive name resolution.

use std::fmt;

use crate::error::StarterError;
use crate::payload::{string_field, Payload};

/// Payload keys checked for an explicit archive name, highest precedence first.
const NAME_KEYS: [&str; 2] = ["uuid", "UUID"];

/// The base name shared by every named entry and by the downloaded file.
///
/// Always non-empty; only produced by [`resolve_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName(String);

impl ArchiveName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Entry name for the re-serialized payload.
    pub fn json_entry(&self) -> String {
        format!("{}.json", self.0)
    }

    /// Entry name for the fetched remote document.
    pub fn html_entry(&self) -> String {
        format!("{}.html", self.0)
    }

    /// Suggested filename for the finished archive.
    pub fn zip_filename(&self) -> String {
        format!("{}.zip", self.0)
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the archive name from the request path and payload.
///
/// A string `"uuid"` wins over a string `"UUID"`, which wins over the URL path
/// with its leading and trailing slashes removed. An empty result is rejected.
pub fn resolve_name(path: &str, payload: &Payload) -> Result<ArchiveName, StarterError> {
    let name = NAME_KEYS
        .iter()
        .find_map(|key| string_field(payload, key))
        .unwrap_or_else(|| path.trim_matches('/'));

    if name.is_empty() {
        return Err(StarterError::MissingName);
    }

    tracing::debug!(name, "resolved archive name");
    Ok(ArchiveName(name.to_string()))
}
