//! A single loaded document and its separator-delimited segments

use std::path::{Path, PathBuf};

/// A loaded text document
///
/// Immutable once built. `segments` is never empty: without any separator
/// occurrence it holds exactly one segment equal to `raw_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: String,
    path: PathBuf,
    raw_text: String,
    segments: Vec<String>,
}

impl Document {
    /// Build a document, splitting `raw_text` on `separator` when one is given
    pub fn new(
        id: impl Into<String>,
        path: impl Into<PathBuf>,
        raw_text: impl Into<String>,
        separator: Option<&str>,
    ) -> Self {
        let raw_text = raw_text.into();
        let segments = split_segments(&raw_text, separator);
        Self {
            id: id.into(),
            path: path.into(),
            raw_text,
            segments,
        }
    }

    /// Document id (the file stem)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Source file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full unparsed content
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Ordered segments; index 0 is the primary body
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The primary article body
    pub fn primary(&self) -> &str {
        &self.segments[0]
    }

    /// Related blocks appended after the primary body
    pub fn appended(&self) -> &[String] {
        &self.segments[1..]
    }

    /// Number of segments, always at least one
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Join the segments back together with `separator`
    pub fn rejoin(&self, separator: &str) -> String {
        self.segments.join(separator)
    }
}

/// Literal, byte-exact split; an empty or absent separator never splits
pub fn split_segments(raw_text: &str, separator: Option<&str>) -> Vec<String> {
    match separator {
        Some(sep) if !sep.is_empty() => raw_text.split(sep).map(str::to_owned).collect(),
        _ => vec![raw_text.to_owned()],
    }
}
