//! Separator token selection

use serde::{Deserialize, Serialize};

use super::error::{StoreError, StoreResult};
use super::file_system::SourceFile;

/// Marker prefix used by the content's related-document separator
pub const DEFAULT_PREFIX: &str = "<|RELATED_DOC_SEP";

/// Closing sequence of the separator marker
pub const DEFAULT_TERMINATOR: &str = "|>";

/// How the separator token is chosen for a load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Separator {
    /// Never split; every document is a single segment
    None,
    /// Split on exactly this token
    Literal(String),
    /// Take the first well-formed `prefix ... terminator` marker found in the
    /// documents and split every document on that exact token
    Discover { prefix: String, terminator: String },
}

impl Default for Separator {
    fn default() -> Self {
        Self::Discover {
            prefix: DEFAULT_PREFIX.to_string(),
            terminator: DEFAULT_TERMINATOR.to_string(),
        }
    }
}

impl Separator {
    /// Shorthand for [`Separator::Literal`]
    pub fn literal(token: impl Into<String>) -> Self {
        Self::Literal(token.into())
    }

    /// Check the rule itself before any file is touched
    pub fn validate(&self) -> StoreResult<()> {
        match self {
            Self::None => Ok(()),
            Self::Literal(token) if token.is_empty() => {
                Err(StoreError::InvalidSeparator("literal token is empty".into()))
            }
            Self::Literal(_) => Ok(()),
            Self::Discover { prefix, terminator } => {
                if prefix.is_empty() {
                    return Err(StoreError::InvalidSeparator(
                        "discovery prefix is empty".into(),
                    ));
                }
                if terminator.is_empty() {
                    return Err(StoreError::InvalidSeparator(
                        "discovery terminator is empty".into(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Resolve the token to split on, scanning `sources` in order for discovery
    pub fn resolve(&self, sources: &[SourceFile]) -> StoreResult<Option<String>> {
        self.validate()?;
        match self {
            Self::None => Ok(None),
            Self::Literal(token) => Ok(Some(token.clone())),
            Self::Discover { prefix, terminator } => {
                let found = sources.iter().find_map(|src| {
                    discover_token(&src.text, prefix, terminator).map(|token| (src, token))
                });
                match found {
                    Some((src, token)) => {
                        tracing::debug!(
                            "Discovered separator {:?} in {}",
                            token,
                            src.path.display()
                        );
                        Ok(Some(token.to_string()))
                    }
                    None => {
                        tracing::debug!("No separator marker found; documents stay whole");
                        Ok(None)
                    }
                }
            }
        }
    }

    /// A well-formed marker in `text` that is not the `resolved` token
    pub(crate) fn foreign_marker<'a>(
        &self,
        text: &'a str,
        resolved: Option<&str>,
    ) -> Option<&'a str> {
        match self {
            Self::Discover { prefix, terminator } => marker_tokens(text, prefix, terminator)
                .into_iter()
                .find(|token| Some(*token) != resolved),
            _ => None,
        }
    }
}

/// First well-formed marker in `text`
pub fn discover_token<'a>(text: &'a str, prefix: &str, terminator: &str) -> Option<&'a str> {
    text.match_indices(prefix)
        .find_map(|(start, _)| token_at(text, start, prefix, terminator))
}

/// Every well-formed marker in `text`, in order
pub fn marker_tokens<'a>(text: &'a str, prefix: &str, terminator: &str) -> Vec<&'a str> {
    text.match_indices(prefix)
        .filter_map(|(start, _)| token_at(text, start, prefix, terminator))
        .collect()
}

/// The marker starting at `start`, through the next `terminator` inclusive
///
/// A span holding whitespace or another `prefix` is prose mentioning the
/// marker, not a marker.
fn token_at<'a>(text: &'a str, start: usize, prefix: &str, terminator: &str) -> Option<&'a str> {
    let after = start + prefix.len();
    let len = text[after..].find(terminator)?;
    let body = &text[after..after + len];
    if body.chars().any(char::is_whitespace) || body.contains(prefix) {
        return None;
    }
    Some(&text[start..after + len + terminator.len()])
}
