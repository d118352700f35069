//! Annotation meta-hierarchies.
//!
//! An annotation type may itself be annotated; following those "annotated by" edges forms a
//! (possibly cyclic) graph. [`AnnotationHierarchies`] walks that graph on top of a
//! [`TypeResolver`], and [`HierarchyAwareRegistry`] binds values to annotation types so a
//! lookup for a concrete annotation also reaches everything bound to its super-annotations.

mod closure;
mod registry;

pub use closure::{AnnotationHierarchies, TransitiveSupers, DEFAULT_IGNORED_PREFIXES};
pub use registry::{HierarchyAwareRegistry, RegistryError};

use std::collections::HashMap;

/// Failure of the type-resolution collaborator. Never fatal to callers of this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("type `{0}` could not be resolved")]
    UnknownType(String),
    #[error("resolving `{name}` failed: {message}")]
    Failed { name: String, message: String },
}

/// The capability the closure engine consumes: "which annotations sit on this type?".
///
/// Implementations are not required to be reentrant; [`AnnotationHierarchies`] serializes
/// every call.
pub trait TypeResolver {
    /// Qualified names of the annotations declared directly on `type_name`.
    fn annotations_of(&self, type_name: &str) -> Result<Vec<String>, ResolutionError>;
}

/// Direct super-annotation edges, as consumed by [`HierarchyAwareRegistry::get`].
pub trait SuperAnnotations {
    fn direct_super_annotations(&self, annotation: &str) -> Vec<String>;
}

impl TypeResolver for HashMap<String, Vec<String>> {
    fn annotations_of(&self, type_name: &str) -> Result<Vec<String>, ResolutionError> {
        self.get(type_name)
            .cloned()
            .ok_or_else(|| ResolutionError::UnknownType(type_name.to_string()))
    }
}
