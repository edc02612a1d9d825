//! Docstore - immutable in-memory store for a directory of segmented documents
//!
//! Each file directly under a content directory becomes a [`Document`] whose
//! text is split on a literal separator token into ordered segments.

pub mod core;

pub use crate::core::config::StoreConfig;
pub use crate::core::current::CurrentStore;
pub use crate::core::document::Document;
pub use crate::core::error::{StoreError, StoreResult};
pub use crate::core::separator::Separator;
pub use crate::core::store::{DocumentStore, LoadOptions};
pub use crate::core::watcher::StoreWatcher;
