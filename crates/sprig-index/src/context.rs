use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use sprig_annotations::AnnotationHierarchies;
use sprig_core::{FileUri, LineIndex, Location, Span};
use sprig_java::{names, Annotation, ArgValueKind, ImportScope, JavaUnit, TypeIndex, TypeRef};
use sprig_scheduler::CancellationToken;

use crate::element::{
    AnnotationMetadata, AttributeValue, Bean, EventListener, IndexElement, IndexedSymbol,
    SymbolKind,
};
use crate::graph::{ElementGraph, ElementId, GraphError};

/// Closure engine over the workspace type index.
pub type Hierarchies = AnnotationHierarchies<TypeIndex>;

/// Ordinal of an indexing pass, starting at one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Pass(u8);

impl Pass {
    /// Structural discovery: types, annotations, beans, injection points.
    pub const ONE: Pass = Pass(1);
    /// Behavior discovery that needs full method bodies or pass-one results.
    pub const TWO: Pass = Pass(2);

    pub fn new(number: u8) -> Option<Pass> {
        (number > 0).then_some(Pass(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn is_first(self) -> bool {
        self == Pass::ONE
    }

    pub fn next(self) -> Pass {
        Pass(self.0.saturating_add(1))
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pass {}", self.0)
    }
}

/// Mutable state handed to providers while one file is visited in one pass.
///
/// Providers only add to the graph and the symbol list; the single exception is moving
/// already created event listeners under their owning bean ([`PassContext::adopt_listeners`]).
pub struct PassContext<'a> {
    pass: Pass,
    file: &'a FileUri,
    source: &'a str,
    line_index: &'a LineIndex,
    unit: &'a JavaUnit,
    scope: &'a ImportScope,
    hierarchies: &'a Hierarchies,
    graph: &'a mut ElementGraph,
    symbols: &'a mut Vec<IndexedSymbol>,
    token: &'a CancellationToken,
    deferral: Option<String>,
    added: Vec<ElementId>,
    symbols_mark: usize,
}

pub(crate) struct FileInput<'a> {
    pub file: &'a FileUri,
    pub source: &'a str,
    pub line_index: &'a LineIndex,
    pub unit: &'a JavaUnit,
    pub scope: &'a ImportScope,
}

impl<'a> PassContext<'a> {
    pub(crate) fn new(
        pass: Pass,
        input: FileInput<'a>,
        hierarchies: &'a Hierarchies,
        graph: &'a mut ElementGraph,
        symbols: &'a mut Vec<IndexedSymbol>,
        token: &'a CancellationToken,
    ) -> Self {
        Self {
            pass,
            file: input.file,
            source: input.source,
            line_index: input.line_index,
            unit: input.unit,
            scope: input.scope,
            hierarchies,
            graph,
            symbols,
            token,
            deferral: None,
            added: Vec::new(),
            symbols_mark: 0,
        }
    }

    pub fn pass(&self) -> Pass {
        self.pass
    }

    pub fn file(&self) -> &'a FileUri {
        self.file
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn unit(&self) -> &'a JavaUnit {
        self.unit
    }

    pub fn hierarchies(&self) -> &'a Hierarchies {
        self.hierarchies
    }

    pub fn graph(&self) -> &ElementGraph {
        self.graph
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn location(&self, span: Span) -> Location {
        Location::new(
            self.file.clone(),
            span,
            self.line_index.range(self.source, span),
        )
    }

    /// Qualified name of a type written in this file, if it can be resolved.
    pub fn resolve(&self, written: &str) -> Option<String> {
        self.hierarchies
            .with_resolver(|types| types.resolve(self.scope, written))
    }

    /// Qualified name of `ty`, or its written base name when unresolvable.
    pub fn resolve_type(&self, ty: &TypeRef) -> String {
        self.resolve_name(ty.base())
    }

    pub fn resolve_name(&self, written: &str) -> String {
        self.hierarchies
            .with_resolver(|types| types.resolve_or_written(self.scope, written))
    }

    pub fn resolve_annotation(&self, annotation: &Annotation) -> String {
        self.resolve_name(&annotation.name)
    }

    /// Ancestors of `qualified`, nearest first.
    pub fn supertypes(&self, qualified: &str) -> Vec<String> {
        self.hierarchies
            .with_resolver(|types| types.supertype_closure(qualified))
    }

    pub fn is_subtype_of(&self, qualified: &str, target: &str) -> bool {
        self.hierarchies
            .with_resolver(|types| types.is_subtype_of(qualified, target))
    }

    /// First annotation in `annotations` that is `target` or meta-annotated with it.
    pub fn find_annotated<'b>(
        &self,
        annotations: &'b [Annotation],
        target: &str,
    ) -> Option<&'b Annotation> {
        annotations.iter().find(|annotation| {
            let resolved = self.resolve_annotation(annotation);
            self.hierarchies.is_annotated_with(&resolved, target)
        })
    }

    /// First annotation in `annotations` whose resolved type is exactly `target`.
    pub fn find_exact<'b>(
        &self,
        annotations: &'b [Annotation],
        target: &str,
    ) -> Option<&'b Annotation> {
        annotations
            .iter()
            .find(|annotation| self.resolve_annotation(annotation) == target)
    }

    /// Qualifier name from `@Qualifier("..")` or `@Named("..")`.
    pub fn qualifier(&self, annotations: &[Annotation]) -> Option<String> {
        annotations
            .iter()
            .filter(|annotation| {
                matches!(
                    self.resolve_annotation(annotation).as_str(),
                    names::QUALIFIER | names::NAMED_JAKARTA | names::NAMED_JAVAX
                )
            })
            .find_map(|annotation| {
                annotation
                    .values(&["value"])
                    .first()
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
    }

    /// Metadata for annotations written on a declaration.
    pub fn annotation_metadata(&self, annotations: &[Annotation]) -> Vec<AnnotationMetadata> {
        annotations
            .iter()
            .map(|annotation| {
                let mut attributes = BTreeMap::new();
                for arg in &annotation.args {
                    let values = arg
                        .values
                        .iter()
                        .map(|value| AttributeValue {
                            name: match &value.kind {
                                ArgValueKind::Str(s) | ArgValueKind::Class(s) => s.clone(),
                                _ => value.text.clone(),
                            },
                            location: self.location(value.span),
                        })
                        .collect();
                    attributes.insert(arg.name.clone(), values);
                }
                AnnotationMetadata {
                    annotation_type: self.resolve_annotation(annotation),
                    is_meta: false,
                    attributes,
                    location: Some(self.location(annotation.span)),
                }
            })
            .collect()
    }

    pub fn add_symbol(&mut self, label: impl Into<String>, kind: SymbolKind, span: Span) {
        let location = self.location(span);
        self.symbols.push(IndexedSymbol {
            label: label.into(),
            kind,
            location,
        });
    }

    pub fn add_root(&mut self, element: IndexElement) -> ElementId {
        let id = self.graph.insert_root(self.file, element);
        self.added.push(id);
        id
    }

    pub fn add_child(
        &mut self,
        parent: ElementId,
        element: IndexElement,
    ) -> Result<ElementId, GraphError> {
        let id = self.graph.insert_child(parent, element)?;
        self.added.push(id);
        Ok(id)
    }

    /// A bean of this file whose declared type is `qualified`.
    pub fn bean_for_type(&self, qualified: &str) -> Option<ElementId> {
        self.graph
            .all_of_in::<Bean>(self.file)
            .into_iter()
            .find(|(_, element, _)| element.type_name.as_deref() == Some(qualified))
            .map(|(id, _, _)| id)
    }

    /// Move this file's top-level event listeners declared by the bean's type under `bean`.
    pub fn adopt_listeners(&mut self, bean: ElementId) -> Result<usize, GraphError> {
        let Some(bean_type) = self.graph.get(bean).and_then(|e| e.type_name.clone()) else {
            return Ok(0);
        };
        let orphans: Vec<ElementId> = self
            .graph
            .roots(self.file)
            .iter()
            .copied()
            .filter(|id| {
                self.graph
                    .get(*id)
                    .and_then(|e| e.variant::<EventListener>())
                    .is_some_and(|listener| listener.container_type == bean_type)
            })
            .collect();
        for orphan in &orphans {
            self.graph.reparent(bean, *orphan)?;
        }
        Ok(orphans.len())
    }

    /// Ask for this file to be visited again in the next pass.
    pub fn request_next_pass(&mut self, reason: impl Into<String>) {
        if self.deferral.is_none() {
            self.deferral = Some(reason.into());
        }
    }

    pub fn deferral(&self) -> Option<&str> {
        self.deferral.as_deref()
    }

    pub(crate) fn take_deferral(&mut self) -> Option<String> {
        self.deferral.take()
    }

    pub(crate) fn begin_invocation(&mut self) {
        self.added.clear();
        self.symbols_mark = self.symbols.len();
    }

    /// Drop everything added since [`PassContext::begin_invocation`].
    pub(crate) fn rollback_invocation(&mut self) {
        let added: Vec<ElementId> = self.added.drain(..).collect();
        for id in added.iter().rev() {
            // Adopted elements predate this invocation and survive it.
            let adopted: Vec<ElementId> = self
                .graph
                .children(*id)
                .iter()
                .copied()
                .filter(|child| !added.contains(child))
                .collect();
            for child in adopted {
                let _ = self.graph.remove_from_parent(child);
            }
            let _ = self.graph.remove(*id);
        }
        self.symbols.truncate(self.symbols_mark);
    }

    /// Adopt every remaining orphan listener whose bean exists in this file.
    pub(crate) fn reconcile_orphans(&mut self) {
        let orphans: Vec<(ElementId, String)> = self
            .graph
            .roots(self.file)
            .iter()
            .filter_map(|id| {
                let listener = self.graph.get(*id)?.variant::<EventListener>()?;
                Some((*id, listener.container_type.clone()))
            })
            .collect();
        for (orphan, container) in orphans {
            if let Some(bean) = self.bean_for_type(&container) {
                if let Err(err) = self.graph.reparent(bean, orphan) {
                    tracing::debug!(
                        target: "sprig.index",
                        file = %self.file,
                        error = %err,
                        "could not adopt event listener"
                    );
                }
            }
        }
    }
}
