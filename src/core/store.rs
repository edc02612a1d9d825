//! The immutable document store and its related-document relation

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::document::Document;
use super::error::{StoreError, StoreResult};
use super::file_system::{self, SourceFile};
use super::separator::Separator;

/// Options controlling a single load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Separator rule
    pub separator: Separator,
    /// Load dot-files too
    pub include_hidden: bool,
    /// Only load files with one of these extensions (empty = all files)
    pub extensions: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            separator: Separator::default(),
            include_hidden: false,
            extensions: Vec::new(),
        }
    }
}

impl LoadOptions {
    /// Options that split on an exact token
    pub fn with_separator(separator: Separator) -> Self {
        Self {
            separator,
            ..Self::default()
        }
    }
}

/// In-memory mapping from document id to [`Document`]
///
/// Built once by [`DocumentStore::load`] and never mutated. Documents keep
/// the loader's order, which is sorted by file name.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    root: PathBuf,
    separator: Option<String>,
    documents: IndexMap<String, Document>,
    /// Indices into `documents`, one sorted list per document
    related: Vec<Vec<usize>>,
}

impl DocumentStore {
    /// Load every file directly under `dir` with default options
    pub fn load(dir: impl AsRef<Path>) -> StoreResult<Self> {
        Self::load_with(dir, &LoadOptions::default())
    }

    /// Load every file directly under `dir`
    ///
    /// Either every file loads or the whole call fails.
    pub fn load_with(dir: impl AsRef<Path>, options: &LoadOptions) -> StoreResult<Self> {
        let dir = dir.as_ref();
        options.separator.validate()?;
        file_system::check_directory(dir)?;

        let paths = file_system::list_source_files(dir, options)?;

        // Reject id collisions before reading any content
        let mut seen: HashMap<String, PathBuf> = HashMap::with_capacity(paths.len());
        for path in &paths {
            let id = file_system::document_id(path)?;
            if let Some(first) = seen.get(&id) {
                return Err(StoreError::DuplicateId {
                    id,
                    first: first.clone(),
                    second: path.clone(),
                });
            }
            seen.insert(id, path.clone());
        }

        let sources = paths
            .iter()
            .map(|p| file_system::read_source(p))
            .collect::<StoreResult<Vec<_>>>()?;

        let separator = options.separator.resolve(&sources)?;
        let store = Self::from_sources(dir, sources, separator, &options.separator);

        tracing::info!(
            "Loaded {} documents from {} (separator: {:?})",
            store.len(),
            dir.display(),
            store.separator
        );
        Ok(store)
    }

    fn from_sources(
        root: &Path,
        sources: Vec<SourceFile>,
        separator: Option<String>,
        rule: &Separator,
    ) -> Self {
        let mut documents = IndexMap::with_capacity(sources.len());
        for src in sources {
            let doc = Document::new(src.id, src.path, src.text, separator.as_deref());
            if let Some(marker) = rule.foreign_marker(doc.raw_text(), separator.as_deref()) {
                tracing::warn!(
                    "{} contains separator marker {:?} that differs from {:?}; left unsplit",
                    doc.path().display(),
                    marker,
                    separator
                );
            }
            tracing::debug!(
                "Loaded: {} ({} segments, {} bytes)",
                doc.id(),
                doc.segment_count(),
                doc.raw_text().len()
            );
            documents.insert(doc.id().to_owned(), doc);
        }

        let related = relate(&documents);

        Self {
            root: root.to_path_buf(),
            separator,
            documents,
            related,
        }
    }

    /// Look up a document by id
    pub fn get(&self, id: &str) -> StoreResult<&Document> {
        self.documents
            .get(id)
            .ok_or_else(|| StoreError::UnknownId(id.to_owned()))
    }

    /// Segments of a document, in order
    pub fn segments_of(&self, id: &str) -> StoreResult<&[String]> {
        self.get(id).map(Document::segments)
    }

    /// Every loaded id
    pub fn list_ids(&self) -> BTreeSet<&str> {
        self.documents.keys().map(String::as_str).collect()
    }

    /// Ids in load order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// Documents in load order
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Documents sharing at least one identical, non-blank segment with `id`
    pub fn related(&self, id: &str) -> StoreResult<Vec<&str>> {
        let index = self
            .documents
            .get_index_of(id)
            .ok_or_else(|| StoreError::UnknownId(id.to_owned()))?;
        Ok(self.related[index]
            .iter()
            .filter_map(|&i| self.documents.get_index(i))
            .map(|(id, _)| id.as_str())
            .collect())
    }

    /// True when a document with this id was loaded
    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Number of loaded documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when the directory held no loadable files
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Separator token used for this load, if any
    pub fn separator(&self) -> Option<&str> {
        self.separator.as_deref()
    }

    /// Directory this store was loaded from
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PartialEq for DocumentStore {
    /// Equal when the same documents appear in the same order
    fn eq(&self, other: &Self) -> bool {
        self.separator == other.separator && self.iter().eq(other.iter())
    }
}

impl Eq for DocumentStore {}

fn relate(documents: &IndexMap<String, Document>) -> Vec<Vec<usize>> {
    let mut by_segment: HashMap<&str, BTreeSet<usize>> = HashMap::new();
    for (index, doc) in documents.values().enumerate() {
        for segment in doc.segments() {
            if segment.trim().is_empty() {
                continue;
            }
            by_segment.entry(segment.as_str()).or_default().insert(index);
        }
    }

    let mut related = vec![BTreeSet::new(); documents.len()];
    for owners in by_segment.values().filter(|o| o.len() > 1) {
        for &a in owners {
            related[a].extend(owners.iter().copied().filter(|&b| b != a));
        }
    }

    related
        .into_iter()
        .map(|set| set.into_iter().collect())
        .collect()
}
