use std::collections::BTreeMap;
use std::sync::Arc;

use sprig_core::{FileUri, Location};

use crate::element::{Bean, ElementTree, IndexedSymbol, InjectionPoint, Variant};
use crate::snapshot::FileIndexSnapshot;

/// Read-only view over the snapshots published at one point in time.
///
/// Cloning is cheap and the view never changes; indexing that finishes later publishes a new
/// view instead.
#[derive(Debug, Clone, Default)]
pub struct IndexView {
    files: BTreeMap<FileUri, Arc<FileIndexSnapshot>>,
}

impl IndexView {
    pub fn new(files: BTreeMap<FileUri, Arc<FileIndexSnapshot>>) -> Self {
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> impl Iterator<Item = &FileIndexSnapshot> {
        self.files.values().map(|snapshot| &**snapshot)
    }

    pub fn file(&self, uri: &FileUri) -> Option<&FileIndexSnapshot> {
        self.files.get(uri).map(|snapshot| &**snapshot)
    }

    /// Top-level elements of `uri`; empty when the file is unknown.
    pub fn elements(&self, uri: &FileUri) -> &[ElementTree] {
        self.file(uri)
            .map(|snapshot| snapshot.elements.as_slice())
            .unwrap_or(&[])
    }

    pub fn symbols(&self) -> impl Iterator<Item = &IndexedSymbol> {
        self.files().flat_map(|snapshot| snapshot.symbols.iter())
    }

    /// Every element of variant `T` in every file, files in URI order.
    pub fn all_of<T: Variant>(&self) -> impl Iterator<Item = (&ElementTree, &T)> {
        self.files().flat_map(|snapshot| snapshot.all_of::<T>())
    }

    pub fn beans(&self) -> impl Iterator<Item = BeanRef<'_>> {
        self.files().flat_map(|snapshot| {
            snapshot.beans().map(move |(tree, bean)| BeanRef {
                project: snapshot.project.as_deref(),
                tree,
                bean,
            })
        })
    }
}

/// A bean together with the element carrying it.
#[derive(Debug, Clone, Copy)]
pub struct BeanRef<'v> {
    pub project: Option<&'v str>,
    pub tree: &'v ElementTree,
    pub bean: &'v Bean,
}

impl<'v> BeanRef<'v> {
    pub fn name(&self) -> &'v str {
        &self.bean.name
    }

    pub fn type_name(&self) -> Option<&'v str> {
        self.tree.element.type_name.as_deref()
    }

    pub fn location(&self) -> &'v Location {
        &self.tree.element.location
    }

    pub fn label(&self) -> &'v str {
        &self.tree.element.label
    }

    pub fn is_assignable_to(&self, type_name: &str) -> bool {
        self.tree.element.is_assignable_to(type_name)
    }

    pub fn injection_points(&self) -> impl Iterator<Item = (&'v ElementTree, &'v InjectionPoint)> {
        self.tree.children_of::<InjectionPoint>()
    }
}
