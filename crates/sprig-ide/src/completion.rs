use std::cmp::Reverse;

use serde::Serialize;
use sprig_core::{FileUri, Location};
use sprig_fuzzy::{FuzzyMatcher, MatchKind};
use sprig_index::BeanRef;
use sprig_java::{names, parse_unit, ImportScope, ParseMode, TypeDecl};

use crate::SpringIde;

/// The declaration a completion is requested in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionContext {
    /// Qualified name of the enclosing type.
    pub declaring_type: Option<String>,
    /// Qualified types of the fields the enclosing type already declares.
    pub field_types: Vec<String>,
    /// Only beans of this project are offered. `None` offers beans of every project.
    pub project: Option<String>,
}

impl CompletionContext {
    pub fn new(declaring_type: impl Into<String>) -> Self {
        Self {
            declaring_type: Some(declaring_type.into()),
            field_types: Vec::new(),
            project: None,
        }
    }

    pub fn with_field_types<I, S>(mut self, field_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_types = field_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    fn admits(&self, bean: &BeanRef<'_>) -> bool {
        !self.excludes(bean.type_name())
            && self
                .project
                .as_deref()
                .map_or(true, |project| bean.project == Some(project))
    }

    fn excludes(&self, type_name: Option<&str>) -> bool {
        let Some(type_name) = type_name else {
            return false;
        };
        self.declaring_type.as_deref() == Some(type_name)
            || self.field_types.iter().any(|field| field == type_name)
    }
}

/// A bean suggested for injection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCandidate {
    pub name: String,
    pub type_name: Option<String>,
    pub label: String,
    pub location: Location,
    /// `true` when `name` starts with the typed prefix.
    pub is_prefix: bool,
    pub score: i32,
}

impl SpringIde {
    /// Beans to inject at `context`, best match first.
    ///
    /// The enclosing type's own bean, beans of a type already held in a field and beans of
    /// other projects are left out. Equal scores keep discovery order.
    pub fn provide_completions(
        &self,
        prefix: &str,
        context: &CompletionContext,
    ) -> Vec<RankedCandidate> {
        let mut matcher = FuzzyMatcher::new(prefix);
        let mut candidates: Vec<_> = self
            .view
            .beans()
            .filter(|bean| context.admits(bean))
            .filter_map(|bean| {
                let score = matcher.score(bean.name())?;
                (score.score > 0).then(|| {
                    let candidate = RankedCandidate {
                        name: bean.name().to_string(),
                        type_name: bean.type_name().map(str::to_string),
                        label: bean.label().to_string(),
                        location: bean.location().clone(),
                        is_prefix: score.kind == MatchKind::Prefix,
                        score: score.score,
                    };
                    (score.rank_key(), candidate)
                })
            })
            .collect();

        candidates.sort_by_key(|(rank, _)| Reverse(*rank));
        candidates
            .into_iter()
            .map(|(_, candidate)| candidate)
            .collect()
    }

    /// Completion context for the innermost type declaration around `offset` in `source`, the
    /// text of `uri`.
    ///
    /// `None` when `source` does not parse, `offset` is outside every type, or that type is not
    /// a Spring component. Once `uri` is indexed the context is limited to its project.
    pub fn completion_context_at(
        &self,
        uri: &FileUri,
        source: &str,
        offset: usize,
    ) -> Option<CompletionContext> {
        let unit = match parse_unit(source, ParseMode::Declarations) {
            Ok(unit) => unit,
            Err(err) => {
                tracing::debug!(target: "sprig.ide", file = %uri, error = %err, "no completion context");
                return None;
            }
        };
        let ty = unit
            .all_types()
            .into_iter()
            .filter(|ty| ty.span.contains(offset))
            .min_by_key(|ty| ty.span.len())?;

        let scope = ImportScope::for_unit(&unit);
        if !self.is_component(ty, &scope) {
            tracing::debug!(target: "sprig.ide", file = %uri, ty = %ty.qualified_name, "not a component");
            return None;
        }
        Some(CompletionContext {
            declaring_type: Some(ty.qualified_name.clone()),
            field_types: self.field_types(ty, &scope),
            project: self.view.file(uri).and_then(|file| file.project.clone()),
        })
    }

    /// `@Component`, or an annotation meta-annotated with it, is on `ty`.
    fn is_component(&self, ty: &TypeDecl, scope: &ImportScope) -> bool {
        let annotations: Vec<String> = self.hierarchies().with_resolver(|types| {
            ty.annotations
                .iter()
                .map(|annotation| types.resolve_or_written(scope, &annotation.name))
                .collect()
        });
        annotations
            .iter()
            .any(|annotation| self.hierarchies().is_annotated_with(annotation, names::COMPONENT))
    }

    fn field_types(&self, ty: &TypeDecl, scope: &ImportScope) -> Vec<String> {
        self.hierarchies().with_resolver(|types| {
            ty.fields()
                .map(|field| types.resolve_or_written(scope, &field.ty.text))
                .collect()
        })
    }
}
