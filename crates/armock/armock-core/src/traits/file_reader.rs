//! Source reading capability.
//!
//! Schema and model sources are fetched through a `FileReader` so tests can
//! substitute in-memory sources for the filesystem.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::errors::ReadError;

/// Fetches the text behind a logical path.
pub trait FileReader: Send + Sync {
    /// Read the full contents of `path`, failing with `ReadError::NotFound`
    /// when the path does not resolve.
    fn read(&self, path: &Path) -> Result<String, ReadError>;
}

/// Reads from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read(&self, path: &Path) -> Result<String, ReadError> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ReadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ReadError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })
    }
}

/// Returns the same text for every path.
#[derive(Debug, Clone)]
pub struct StringReader {
    text: String,
}

impl StringReader {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl FileReader for StringReader {
    fn read(&self, _path: &Path) -> Result<String, ReadError> {
        Ok(self.text.clone())
    }
}

/// In-memory path → text lookup. Unknown paths are `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct MapReader {
    files: FxHashMap<PathBuf, String>,
}

impl MapReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }
}

impl FileReader for MapReader {
    fn read(&self, path: &Path) -> Result<String, ReadError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ReadError::NotFound {
                path: path.to_path_buf(),
            })
    }
}

impl<R: FileReader + ?Sized> FileReader for std::sync::Arc<R> {
    fn read(&self, path: &Path) -> Result<String, ReadError> {
        (**self).read(path)
    }
}
