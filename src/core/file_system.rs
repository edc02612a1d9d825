//! Content directory enumeration and file reading

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::{StoreError, StoreResult};
use super::store::LoadOptions;

/// A file read from the content directory, before splitting
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: String,
    pub path: PathBuf,
    pub text: String,
}

/// Fail unless `dir` exists and is a directory
pub fn check_directory(dir: &Path) -> StoreResult<()> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(StoreError::NotADirectory(dir.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(StoreError::DirectoryNotFound(dir.to_path_buf()))
        }
        Err(e) => Err(StoreError::read(dir, e)),
    }
}

/// List the regular files directly under `dir`, sorted by file name
pub fn list_source_files(dir: &Path, options: &LoadOptions) -> StoreResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            StoreError::read(path, e.into())
        })?;

        if !entry.file_type().is_file() {
            tracing::debug!("Skipping non-file entry: {}", entry.path().display());
            continue;
        }

        let path = entry.path();
        if !options.include_hidden && is_hidden(path) {
            tracing::debug!("Skipping hidden file: {}", path.display());
            continue;
        }
        if !matches_extension(path, &options.extensions) {
            tracing::debug!("Skipping filtered file: {}", path.display());
            continue;
        }

        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Derive a document id from the file name without its extension
pub fn document_id(path: &Path) -> StoreResult<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_owned)
        .ok_or_else(|| {
            StoreError::read(
                path,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "file name is not valid UTF-8",
                ),
            )
        })
}

/// Read a file as UTF-8 text
pub fn read_source(path: &Path) -> StoreResult<SourceFile> {
    let id = document_id(path)?;
    let text = std::fs::read_to_string(path).map_err(|e| StoreError::read(path, e))?;
    Ok(SourceFile {
        id,
        path: path.to_path_buf(),
        text,
    })
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.') == ext)
        })
        .unwrap_or(false)
}
