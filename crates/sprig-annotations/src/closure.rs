use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use parking_lot::Mutex;
use sprig_core::panic_payload_to_str;

use crate::{ResolutionError, SuperAnnotations, TypeResolver};

/// Namespaces whose types never carry program-defined super-annotations.
pub const DEFAULT_IGNORED_PREFIXES: &[&str] = &["java."];

/// Closure engine over the "annotated by" graph.
///
/// The resolver sits behind one coarse lock: every resolver call from every thread goes
/// through [`AnnotationHierarchies::with_resolver`] or a walk step, one at a time. The lock
/// is held only for the duration of a single resolver call, never across a whole walk.
pub struct AnnotationHierarchies<R> {
    resolver: Mutex<R>,
    ignored_prefixes: Vec<String>,
}

impl<R: TypeResolver> AnnotationHierarchies<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver: Mutex::new(resolver),
            ignored_prefixes: DEFAULT_IGNORED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    pub fn with_ignored_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Run `f` with exclusive access to the resolver.
    ///
    /// `f` must not call back into `self`; the lock is not reentrant.
    pub fn with_resolver<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        let mut resolver = self.resolver.lock();
        f(&mut resolver)
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }

    /// Annotations declared directly on `name`, minus ignored namespaces.
    ///
    /// Resolution failures (errors or panics in the resolver) are logged and read as "no
    /// super-annotations".
    pub fn direct_super_annotations(&self, name: &str) -> Vec<String> {
        let result = {
            let resolver = self.resolver.lock();
            catch_unwind(AssertUnwindSafe(|| resolver.annotations_of(name)))
        };

        let supers = match result {
            Ok(Ok(supers)) => supers,
            Ok(Err(err)) => {
                tracing::debug!(
                    target: "sprig.annotations",
                    annotation = %name,
                    error = %err,
                    "could not resolve super-annotations"
                );
                return Vec::new();
            }
            Err(panic) => {
                let err = ResolutionError::Failed {
                    name: name.to_string(),
                    message: panic_payload_to_str(&*panic),
                };
                tracing::debug!(
                    target: "sprig.annotations",
                    annotation = %name,
                    error = %err,
                    "resolver panicked"
                );
                return Vec::new();
            }
        };

        supers
            .into_iter()
            .filter(|super_name| !self.is_ignored(super_name))
            .collect()
    }

    /// Every annotation type reachable from `name`, `name` itself first.
    ///
    /// Lazy and deduplicated; cycles terminate. Only the first item has a guaranteed
    /// position.
    pub fn transitive_supers(&self, name: &str) -> TransitiveSupers<'_, R> {
        TransitiveSupers {
            hierarchies: self,
            stack: vec![name.to_string()],
            seen: HashSet::from([name.to_string()]),
        }
    }

    /// Super-annotations of `name` (excluding `name`) that satisfy `pred`.
    pub fn meta_annotations(&self, name: &str, pred: impl Fn(&str) -> bool) -> Vec<String> {
        self.transitive_supers(name)
            .skip(1)
            .filter(|candidate| pred(candidate))
            .collect()
    }

    /// `true` if `name` is `target` or reaches it through meta-annotations.
    pub fn is_annotated_with(&self, name: &str, target: &str) -> bool {
        self.transitive_supers(name).any(|candidate| candidate == target)
    }

    /// `true` if `target` is a strict meta-annotation of `name`.
    pub fn is_meta_annotation(&self, name: &str, target: &str) -> bool {
        name != target && self.transitive_supers(name).skip(1).any(|c| c == target)
    }
}

impl<R: TypeResolver> SuperAnnotations for AnnotationHierarchies<R> {
    fn direct_super_annotations(&self, annotation: &str) -> Vec<String> {
        AnnotationHierarchies::direct_super_annotations(self, annotation)
    }
}

/// Pre-order walk returned by [`AnnotationHierarchies::transitive_supers`].
pub struct TransitiveSupers<'a, R> {
    hierarchies: &'a AnnotationHierarchies<R>,
    stack: Vec<String>,
    seen: HashSet<String>,
}

impl<R: TypeResolver> Iterator for TransitiveSupers<'_, R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let current = self.stack.pop()?;
        let supers = self.hierarchies.direct_super_annotations(&current);
        for super_name in supers.into_iter().rev() {
            if self.seen.insert(super_name.clone()) {
                self.stack.push(super_name);
            }
        }
        Some(current)
    }
}
