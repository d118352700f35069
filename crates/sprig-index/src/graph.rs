use indexmap::IndexMap;
use sprig_core::FileUri;

use crate::element::{ElementTree, IndexElement, Variant};

/// Handle to an element in an [`ElementGraph`]. Only meaningful for the graph that issued it;
/// handles of removed elements may be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("element {0:?} does not exist")]
    Missing(ElementId),
    #[error("element {child:?} is already attached to {parent:?}")]
    AlreadyAttached { child: ElementId, parent: ElementId },
    #[error("element {0:?} has no parent")]
    NotAttached(ElementId),
    #[error("{child:?} and {parent:?} belong to different files")]
    CrossFile { child: ElementId, parent: ElementId },
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { child: ElementId, parent: ElementId },
}

#[derive(Debug)]
struct Slot {
    element: IndexElement,
    file: FileUri,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// The mutable result graph.
///
/// Elements belong to one file. Each element is either a top-level element (a *root*) of its
/// file or the child of exactly one parent in the same file; removing an element removes its
/// whole subtree.
#[derive(Debug, Default)]
pub struct ElementGraph {
    slots: Vec<Option<Slot>>,
    free: Vec<u32>,
    roots: IndexMap<FileUri, Vec<ElementId>>,
    len: usize,
}

impl ElementGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn slot(&self, id: ElementId) -> Result<&Slot, GraphError> {
        self.slots
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(GraphError::Missing(id))
    }

    fn slot_mut(&mut self, id: ElementId) -> Result<&mut Slot, GraphError> {
        self.slots
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(GraphError::Missing(id))
    }

    fn alloc(&mut self, slot: Slot) -> ElementId {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(slot);
                ElementId(index)
            }
            None => {
                self.slots.push(Some(slot));
                ElementId((self.slots.len() - 1) as u32)
            }
        }
    }

    /// Add a top-level element to `file`.
    pub fn insert_root(&mut self, file: &FileUri, element: IndexElement) -> ElementId {
        let id = self.alloc(Slot {
            element,
            file: file.clone(),
            parent: None,
            children: Vec::new(),
        });
        self.roots.entry(file.clone()).or_default().push(id);
        id
    }

    /// Add a new element as the last child of `parent`.
    pub fn insert_child(
        &mut self,
        parent: ElementId,
        element: IndexElement,
    ) -> Result<ElementId, GraphError> {
        let file = self.slot(parent)?.file.clone();
        let id = self.alloc(Slot {
            element,
            file,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.slot_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Attach the top-level element `child` under `parent`.
    ///
    /// An element that already has a parent must be detached first
    /// ([`ElementGraph::remove_from_parent`]) or moved with [`ElementGraph::reparent`].
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), GraphError> {
        if let Some(current) = self.slot(child)?.parent {
            return Err(GraphError::AlreadyAttached {
                child,
                parent: current,
            });
        }
        self.check_attachable(parent, child)?;

        let file = self.slot(child)?.file.clone();
        if let Some(roots) = self.roots.get_mut(&file) {
            roots.retain(|id| *id != child);
        }
        self.slot_mut(parent)?.children.push(child);
        self.slot_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn check_attachable(&self, parent: ElementId, child: ElementId) -> Result<(), GraphError> {
        let child_slot = self.slot(child)?;
        let parent_slot = self.slot(parent)?;
        if child_slot.file != parent_slot.file {
            return Err(GraphError::CrossFile { child, parent });
        }
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(GraphError::Cycle { child, parent });
            }
            cursor = self.slot(id)?.parent;
        }
        Ok(())
    }

    /// Detach `child` from its parent; it becomes a top-level element of its file.
    pub fn remove_from_parent(&mut self, child: ElementId) -> Result<(), GraphError> {
        let slot = self.slot(child)?;
        let parent = slot.parent.ok_or(GraphError::NotAttached(child))?;
        let file = slot.file.clone();

        self.slot_mut(parent)?.children.retain(|id| *id != child);
        self.slot_mut(child)?.parent = None;
        self.roots.entry(file).or_default().push(child);
        Ok(())
    }

    /// Move `child` (attached or not) under `new_parent`. Nothing changes on error.
    pub fn reparent(&mut self, new_parent: ElementId, child: ElementId) -> Result<(), GraphError> {
        self.check_attachable(new_parent, child)?;
        if self.slot(child)?.parent == Some(new_parent) {
            return Ok(());
        }
        if self.slot(child)?.parent.is_some() {
            self.remove_from_parent(child)?;
        }
        self.add_child(new_parent, child)
    }

    /// Remove `id` and its subtree. Returns the number of elements removed.
    pub fn remove(&mut self, id: ElementId) -> Result<usize, GraphError> {
        let slot = self.slot(id)?;
        let file = slot.file.clone();
        let parent = slot.parent;
        match parent {
            Some(parent) => self.slot_mut(parent)?.children.retain(|c| *c != id),
            None => {
                if let Some(roots) = self.roots.get_mut(&file) {
                    roots.retain(|c| *c != id);
                }
            }
        }
        Ok(self.free_subtree(id))
    }

    /// Remove every element of `file`. Returns the number of elements removed.
    pub fn remove_file(&mut self, file: &FileUri) -> usize {
        let roots = self.roots.shift_remove(file).unwrap_or_default();
        roots.into_iter().map(|id| self.free_subtree(id)).sum()
    }

    fn free_subtree(&mut self, id: ElementId) -> usize {
        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(slot) = self.slots.get_mut(next.0 as usize).and_then(Option::take) {
                stack.extend(slot.children);
                self.free.push(next.0);
                removed += 1;
            }
        }
        self.len -= removed;
        removed
    }

    pub fn get(&self, id: ElementId) -> Option<&IndexElement> {
        self.slot(id).ok().map(|slot| &slot.element)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut IndexElement> {
        self.slot_mut(id).ok().map(|slot| &mut slot.element)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.slot(id).ok().and_then(|slot| slot.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.slot(id)
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn file_of(&self, id: ElementId) -> Option<&FileUri> {
        self.slot(id).ok().map(|slot| &slot.file)
    }

    /// Top-level elements of `file`, in insertion order.
    pub fn roots(&self, file: &FileUri) -> &[ElementId] {
        self.roots.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn files(&self) -> impl Iterator<Item = &FileUri> {
        self.roots.keys()
    }

    /// Elements of `file` in pre-order (roots in insertion order, children in order).
    pub fn descendants_of_file(&self, file: &FileUri) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.roots(file).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    /// Every element of variant `T`, file by file in pre-order.
    pub fn all_of<T: Variant>(&self) -> Vec<(ElementId, &IndexElement, &T)> {
        self.files()
            .flat_map(|file| self.descendants_of_file(file))
            .filter_map(|id| {
                let element = self.get(id)?;
                element.variant::<T>().map(|v| (id, element, v))
            })
            .collect()
    }

    /// Like [`ElementGraph::all_of`], restricted to one file.
    pub fn all_of_in<T: Variant>(&self, file: &FileUri) -> Vec<(ElementId, &IndexElement, &T)> {
        self.descendants_of_file(file)
            .into_iter()
            .filter_map(|id| {
                let element = self.get(id)?;
                element.variant::<T>().map(|v| (id, element, v))
            })
            .collect()
    }

    pub fn tree(&self, id: ElementId) -> Option<ElementTree> {
        let element = self.get(id)?.clone();
        let children = self
            .children(id)
            .iter()
            .filter_map(|child| self.tree(*child))
            .collect();
        Some(ElementTree { element, children })
    }

    pub fn file_trees(&self, file: &FileUri) -> Vec<ElementTree> {
        self.roots(file)
            .iter()
            .filter_map(|id| self.tree(*id))
            .collect()
    }
}
