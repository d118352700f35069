use serde::Serialize;
use sprig_core::FileUri;

use crate::element::{Bean, ElementTree, IndexedSymbol, Variant};

/// Everything the pipeline produced for one version of one file.
///
/// Snapshots are immutable once published; a changed file gets a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileIndexSnapshot {
    pub uri: FileUri,
    /// Modification stamp of the source text the snapshot was built from.
    pub last_modified: u64,
    pub project: Option<String>,
    pub symbols: Vec<IndexedSymbol>,
    pub elements: Vec<ElementTree>,
    /// Number of passes the file was visited in.
    pub passes: u8,
    /// The file still asked for another pass when the pass limit was reached.
    pub deferral_exhausted: bool,
}

impl FileIndexSnapshot {
    /// Every element of the file, pre-order.
    pub fn walk(&self) -> impl Iterator<Item = &ElementTree> {
        self.elements.iter().flat_map(ElementTree::walk)
    }

    pub fn all_of<T: Variant>(&self) -> impl Iterator<Item = (&ElementTree, &T)> {
        self.walk()
            .filter_map(|tree| tree.variant::<T>().map(|value| (tree, value)))
    }

    pub fn beans(&self) -> impl Iterator<Item = (&ElementTree, &Bean)> {
        self.all_of::<Bean>()
    }
}
