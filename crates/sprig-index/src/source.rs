//! Where the pipeline reads file contents from.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use sprig_core::FileUri;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("no source text for {0}")]
    Missing(FileUri),
    #[error("{uri} is not a file URI")]
    NotAFile { uri: FileUri },
    #[error("failed to read {uri}: {source}")]
    Io {
        uri: FileUri,
        #[source]
        source: std::io::Error,
    },
}

pub trait SourceStore: Send + Sync {
    fn read(&self, uri: &FileUri) -> Result<Arc<str>, SourceError>;
}

/// Open documents held in memory, e.g. by an editor integration or in tests.
#[derive(Debug, Default)]
pub struct MemorySourceStore {
    files: RwLock<HashMap<FileUri, Arc<str>>>,
}

impl MemorySourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, uri: FileUri, text: impl Into<Arc<str>>) {
        self.files.write().insert(uri, text.into());
    }

    pub fn remove(&self, uri: &FileUri) -> Option<Arc<str>> {
        self.files.write().remove(uri)
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl SourceStore for MemorySourceStore {
    fn read(&self, uri: &FileUri) -> Result<Arc<str>, SourceError> {
        self.files
            .read()
            .get(uri)
            .cloned()
            .ok_or_else(|| SourceError::Missing(uri.clone()))
    }
}

/// Reads `file://` URIs from disk on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSourceStore;

impl FsSourceStore {
    pub fn path_of(uri: &FileUri) -> Option<PathBuf> {
        let path = uri.as_str().strip_prefix("file://")?;
        // `file:///C:/src/A.java`
        let path = match path.as_bytes() {
            [b'/', drive, b':', ..] if drive.is_ascii_alphabetic() => &path[1..],
            _ => path,
        };
        Some(PathBuf::from(path))
    }
}

impl SourceStore for FsSourceStore {
    fn read(&self, uri: &FileUri) -> Result<Arc<str>, SourceError> {
        let path = Self::path_of(uri).ok_or_else(|| SourceError::NotAFile { uri: uri.clone() })?;
        std::fs::read_to_string(&path)
            .map(Arc::from)
            .map_err(|source| SourceError::Io {
                uri: uri.clone(),
                source,
            })
    }
}
