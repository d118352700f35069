use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::SuperAnnotations;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two registrations for one annotation type. This is a setup bug and should abort
    /// initialization.
    #[error("annotation type `{key}` is already bound")]
    DuplicateBinding { key: String },
}

struct Binding<V: ?Sized> {
    value: Arc<V>,
    overriding: bool,
}

/// Values keyed by annotation type, looked up through the meta-annotation hierarchy.
///
/// A lookup for a concrete annotation yields the value bound to it and then, unless that
/// binding is *overriding*, keeps climbing to the values bound on its super-annotations.
pub struct HierarchyAwareRegistry<V: ?Sized> {
    bindings: IndexMap<String, Binding<V>>,
}

impl<V: ?Sized> Default for HierarchyAwareRegistry<V> {
    fn default() -> Self {
        Self {
            bindings: IndexMap::new(),
        }
    }
}

impl<V: ?Sized> HierarchyAwareRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(
        &mut self,
        key: impl Into<String>,
        value: Arc<V>,
        overriding: bool,
    ) -> Result<(), RegistryError> {
        let key = key.into();
        if self.bindings.contains_key(&key) {
            return Err(RegistryError::DuplicateBinding { key });
        }
        self.bindings.insert(key, Binding { value, overriding });
        Ok(())
    }

    /// Values applicable to an instance of `concrete`, most specific first.
    pub fn get(&self, hierarchy: &dyn SuperAnnotations, concrete: &str) -> Vec<Arc<V>> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![concrete.to_string()];

        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }

            let climb = match self.bindings.get(&current) {
                Some(binding) => {
                    found.push(binding.value.clone());
                    !binding.overriding
                }
                None => true,
            };
            if !climb {
                continue;
            }

            let supers = hierarchy.direct_super_annotations(&current);
            stack.extend(supers.into_iter().rev().filter(|s| !seen.contains(s)));
        }

        found
    }

    /// Every bound value once, in registration order. Values registered under several keys
    /// are reported once.
    pub fn get_all(&self) -> Vec<Arc<V>> {
        let mut out: Vec<Arc<V>> = Vec::new();
        for binding in self.bindings.values() {
            let ptr = Arc::as_ptr(&binding.value) as *const ();
            if !out.iter().any(|v| Arc::as_ptr(v) as *const () == ptr) {
                out.push(binding.value.clone());
            }
        }
        out
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
