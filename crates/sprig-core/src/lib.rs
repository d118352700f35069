//! Core shared types for Sprig.
//!
//! Everything here is plain data: file identities, spans, positions, and the [`Location`]
//! records that index elements and query results carry around.

mod text;

use std::any::Any;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

pub use text::{LineIndex, Position, Range, Span, TextRange, TextSize};

/// Identity of an indexed file (`file:///...`).
///
/// Cheap to clone; the index stores one per element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FileUri(Arc<str>);

impl FileUri {
    pub fn new(uri: impl AsRef<str>) -> Self {
        Self(Arc::from(uri.as_ref()))
    }

    /// Build a `file://` URI from a filesystem path. The path is canonicalized when possible.
    pub fn from_path(path: &Path) -> Self {
        let path = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let mut text = path.to_string_lossy().replace('\\', "/");
        if !text.starts_with('/') {
            text.insert(0, '/');
        }
        Self::new(format!("file://{text}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` if this URI lives under `root` (a URI or plain path prefix).
    pub fn starts_with(&self, root: &str) -> bool {
        let root = root.trim_end_matches('/');
        match self.0.strip_prefix(root) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl fmt::Display for FileUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileUri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A place in a source file: byte span plus its LSP range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Location {
    pub uri: FileUri,
    pub span: Span,
    pub range: Range,
}

impl Location {
    pub fn new(uri: FileUri, span: Span, range: Range) -> Self {
        Self { uri, span, range }
    }
}

/// Best-effort rendering of a `catch_unwind` payload.
pub fn panic_payload_to_str(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "<non-string panic payload>".to_string()
}
