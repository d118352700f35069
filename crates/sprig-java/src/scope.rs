use std::collections::HashMap;

use crate::model::{JavaUnit, TypeDecl};

/// Names visible in one compilation unit: its package, imports and own declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportScope {
    package: Option<String>,
    single: HashMap<String, String>,
    wildcards: Vec<String>,
    local: HashMap<String, String>,
}

impl ImportScope {
    pub fn for_unit(unit: &JavaUnit) -> Self {
        let mut scope = ImportScope {
            package: unit.package.clone(),
            ..ImportScope::default()
        };

        for import in unit.imports.iter().filter(|i| !i.is_static) {
            if import.wildcard {
                scope.wildcards.push(import.path.clone());
            } else if let Some(simple) = import.path.rsplit('.').next() {
                scope
                    .single
                    .insert(simple.to_string(), import.path.clone());
            }
        }

        fn declare(scope: &mut ImportScope, ty: &TypeDecl) {
            scope
                .local
                .entry(ty.name.clone())
                .or_insert_with(|| ty.qualified_name.clone());
            for nested in ty.nested_types() {
                declare(scope, nested);
            }
        }
        for ty in &unit.types {
            declare(&mut scope, ty);
        }

        scope
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /// Declared in this unit (including nested types).
    pub fn local(&self, simple: &str) -> Option<&str> {
        self.local.get(simple).map(String::as_str)
    }

    pub fn single_import(&self, simple: &str) -> Option<&str> {
        self.single.get(simple).map(String::as_str)
    }

    pub fn wildcards(&self) -> &[String] {
        &self.wildcards
    }

    /// Qualify a simple name with the unit's package.
    pub fn in_package(&self, simple: &str) -> String {
        match &self.package {
            Some(package) => format!("{package}.{simple}"),
            None => simple.to_string(),
        }
    }
}
