use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use sprig_annotations::{ResolutionError, TypeResolver};
use sprig_core::FileUri;

use crate::library::library_type;
use crate::model::{JavaUnit, TypeDecl, TypeKind};
use crate::names;
use crate::scope::ImportScope;

#[derive(Debug, Clone)]
struct SourceType {
    file: FileUri,
    kind: TypeKind,
    annotations: Vec<String>,
    supertypes: Vec<String>,
    scope: Arc<ImportScope>,
}

/// Every type the indexer can name: workspace sources plus a built-in table of framework and
/// JDK declarations. Source declarations shadow built-ins with the same name.
#[derive(Debug, Default)]
pub struct TypeIndex {
    source: HashMap<String, SourceType>,
    files: HashMap<FileUri, Vec<String>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever `uri` declared before with the types of `unit`.
    pub fn register_unit(&mut self, uri: &FileUri, unit: &JavaUnit) {
        self.remove_file(uri);

        let scope = Arc::new(ImportScope::for_unit(unit));
        let mut declared = Vec::new();
        for ty in unit.all_types() {
            declared.push(ty.qualified_name.clone());
            self.source.insert(
                ty.qualified_name.clone(),
                SourceType {
                    file: uri.clone(),
                    kind: ty.kind,
                    annotations: ty.annotations.iter().map(|a| a.name.clone()).collect(),
                    supertypes: written_supertypes(ty),
                    scope: scope.clone(),
                },
            );
        }
        self.files.insert(uri.clone(), declared);
    }

    pub fn remove_file(&mut self, uri: &FileUri) {
        for name in self.files.remove(uri).unwrap_or_default() {
            if self.source.get(&name).is_some_and(|ty| &ty.file == uri) {
                self.source.remove(&name);
            }
        }
    }

    pub fn contains(&self, qualified: &str) -> bool {
        self.source.contains_key(qualified) || library_type(qualified).is_some()
    }

    pub fn kind_of(&self, qualified: &str) -> Option<TypeKind> {
        match self.source.get(qualified) {
            Some(ty) => Some(ty.kind),
            None => library_type(qualified).map(|ty| ty.kind),
        }
    }

    pub fn file_of(&self, qualified: &str) -> Option<&FileUri> {
        self.source.get(qualified).map(|ty| &ty.file)
    }

    /// Qualified name for `name` as written in a unit with `scope`. Type arguments and array
    /// dimensions are ignored. Unknown qualified names are returned unchanged; unknown simple
    /// names resolve to `None`.
    pub fn resolve(&self, scope: &ImportScope, name: &str) -> Option<String> {
        let base = name
            .split(|c| c == '<' || c == '[')
            .next()
            .unwrap_or(name)
            .trim();
        if base.is_empty() {
            return None;
        }

        match base.split_once('.') {
            Some((head, rest)) => {
                if self.contains(base) {
                    return Some(base.to_string());
                }
                if let Some(outer) = self.resolve_simple(scope, head) {
                    let nested = format!("{outer}.{rest}");
                    if self.contains(&nested) {
                        return Some(nested);
                    }
                }
                Some(base.to_string())
            }
            None => self.resolve_simple(scope, base),
        }
    }

    /// [`TypeIndex::resolve`], falling back to the name as written.
    pub fn resolve_or_written(&self, scope: &ImportScope, name: &str) -> String {
        self.resolve(scope, name).unwrap_or_else(|| {
            name.split(|c| c == '<' || c == '[')
                .next()
                .unwrap_or(name)
                .trim()
                .to_string()
        })
    }

    fn resolve_simple(&self, scope: &ImportScope, simple: &str) -> Option<String> {
        if let Some(local) = scope.local(simple) {
            return Some(local.to_string());
        }
        if let Some(imported) = scope.single_import(simple) {
            return Some(imported.to_string());
        }
        let same_package = scope.in_package(simple);
        if self.contains(&same_package) {
            return Some(same_package);
        }
        for package in scope.wildcards() {
            let candidate = format!("{package}.{simple}");
            if self.contains(&candidate) {
                return Some(candidate);
            }
        }
        let lang = format!("java.lang.{simple}");
        self.contains(&lang).then_some(lang)
    }

    pub fn scope_of(&self, qualified: &str) -> Option<Arc<ImportScope>> {
        self.source.get(qualified).map(|ty| ty.scope.clone())
    }

    /// Direct supertypes, qualified where resolvable.
    pub fn direct_supertypes(&self, qualified: &str) -> Vec<String> {
        if let Some(ty) = self.source.get(qualified) {
            return ty
                .supertypes
                .iter()
                .map(|written| self.resolve_or_written(&ty.scope, written))
                .collect();
        }
        library_type(qualified)
            .map(|ty| ty.supertypes.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default()
    }

    /// All ancestors of `qualified` (excluding itself), nearest first, `java.lang.Object`
    /// last.
    pub fn supertype_closure(&self, qualified: &str) -> Vec<String> {
        let mut seen = HashSet::from([qualified.to_string()]);
        let mut queue = VecDeque::from([qualified.to_string()]);
        let mut out = Vec::new();
        while let Some(current) = queue.pop_front() {
            for super_name in self.direct_supertypes(&current) {
                if super_name != names::OBJECT && seen.insert(super_name.clone()) {
                    out.push(super_name.clone());
                    queue.push_back(super_name);
                }
            }
        }
        if qualified != names::OBJECT {
            out.push(names::OBJECT.to_string());
        }
        out
    }

    pub fn is_subtype_of(&self, qualified: &str, target: &str) -> bool {
        qualified == target || self.supertype_closure(qualified).iter().any(|s| s == target)
    }

    /// Qualified names of every workspace source type.
    pub fn source_types(&self) -> impl Iterator<Item = &str> {
        self.source.keys().map(String::as_str)
    }
}

fn written_supertypes(ty: &TypeDecl) -> Vec<String> {
    ty.declared_supertypes()
        .map(|t| t.base().to_string())
        .collect()
}

impl TypeResolver for TypeIndex {
    fn annotations_of(&self, type_name: &str) -> Result<Vec<String>, ResolutionError> {
        if let Some(ty) = self.source.get(type_name) {
            return Ok(ty
                .annotations
                .iter()
                .map(|written| self.resolve_or_written(&ty.scope, written))
                .collect());
        }
        library_type(type_name)
            .map(|ty| ty.annotations.iter().map(|a| a.to_string()).collect())
            .ok_or_else(|| ResolutionError::UnknownType(type_name.to_string()))
    }
}
