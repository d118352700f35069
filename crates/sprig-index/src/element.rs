//! Index element model.
//!
//! Every node in the element graph is an [`IndexElement`]: a label, a location, optional type
//! information and a variant payload ([`ElementKind`]). Parent/child composition lives in
//! [`crate::ElementGraph`]; a finished file is exported as a forest of [`ElementTree`]s.

use std::collections::BTreeMap;

use serde::Serialize;
use sprig_core::Location;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexElement {
    pub label: String,
    pub location: Location,
    /// Declared (bean), required (injection point) or event type, qualified when resolvable.
    pub type_name: Option<String>,
    /// Every ancestor of `type_name`, nearest first.
    pub supertypes: Vec<String>,
    pub annotations: Vec<AnnotationMetadata>,
    pub kind: ElementKind,
}

impl IndexElement {
    pub fn new(kind: impl Into<ElementKind>, label: impl Into<String>, location: Location) -> Self {
        Self {
            label: label.into(),
            location,
            type_name: None,
            supertypes: Vec::new(),
            annotations: Vec::new(),
            kind: kind.into(),
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>, supertypes: Vec<String>) -> Self {
        self.type_name = Some(type_name.into());
        self.supertypes = supertypes;
        self
    }

    pub fn with_annotations(mut self, annotations: Vec<AnnotationMetadata>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn variant<T: Variant>(&self) -> Option<&T> {
        T::of(&self.kind)
    }

    pub fn as_bean(&self) -> Option<&Bean> {
        self.variant()
    }

    /// `true` if `type_name` is the element's type or one of its supertypes.
    pub fn is_assignable_to(&self, type_name: &str) -> bool {
        self.type_name.as_deref() == Some(type_name)
            || self.supertypes.iter().any(|s| s == type_name)
    }

    pub fn annotation(&self, annotation_type: &str) -> Option<&AnnotationMetadata> {
        self.annotations
            .iter()
            .find(|a| a.annotation_type == annotation_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Bean(Bean),
    InjectionPoint(InjectionPoint),
    EventListener(EventListener),
    EventPublisher(EventPublisher),
    RouteHandler(RouteHandler),
    PlainSymbol(PlainSymbol),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bean {
    pub name: String,
    pub is_configuration: bool,
}

/// A dependency slot. The required type is the element's `type_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectionPoint {
    pub name: String,
    pub qualifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventListener {
    pub event_type: Option<String>,
    /// Type declaring the listener method.
    pub container_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventPublisher {
    pub event_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteHandler {
    pub path: String,
    pub http_methods: Vec<String>,
    pub accept_types: Vec<String>,
    pub content_types: Vec<String>,
    pub handler_type: Option<String>,
    pub handler_method: Option<String>,
}

impl RouteHandler {
    /// `@/path -- GET,POST - Accept: text/plain - Content-Type: application/json`
    pub fn label(&self) -> String {
        let mut label = format!("@{}", self.path);
        if !self.http_methods.is_empty() {
            label.push_str(" -- ");
            label.push_str(&self.http_methods.join(","));
        }
        if !self.accept_types.is_empty() {
            label.push_str(" - Accept: ");
            label.push_str(&self.accept_types.join(","));
        }
        if !self.content_types.is_empty() {
            label.push_str(" - Content-Type: ");
            label.push_str(&self.content_types.join(","));
        }
        label
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlainSymbol {}

macro_rules! variants {
    ($($name:ident),* $(,)?) => {
        $(
            impl From<$name> for ElementKind {
                fn from(value: $name) -> Self {
                    ElementKind::$name(value)
                }
            }

            impl Variant for $name {
                fn of(kind: &ElementKind) -> Option<&Self> {
                    match kind {
                        ElementKind::$name(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )*
    };
}

/// Typed access to one [`ElementKind`] payload, used by `all_of::<T>()` style queries.
pub trait Variant: Sized + 'static {
    fn of(kind: &ElementKind) -> Option<&Self>;
}

variants!(
    Bean,
    InjectionPoint,
    EventListener,
    EventPublisher,
    RouteHandler,
    PlainSymbol
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationMetadata {
    pub annotation_type: String,
    /// Reached through the meta-annotation hierarchy rather than written on the declaration.
    pub is_meta: bool,
    pub attributes: BTreeMap<String, Vec<AttributeValue>>,
    pub location: Option<Location>,
}

impl AnnotationMetadata {
    pub fn meta(annotation_type: impl Into<String>) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            is_meta: true,
            attributes: BTreeMap::new(),
            location: None,
        }
    }

    pub fn attribute(&self, name: &str) -> &[AttributeValue] {
        self.attributes.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeValue {
    /// String literal contents, otherwise the value's source text.
    pub name: String,
    pub location: Location,
}

/// An outward-facing symbol (workspace symbol search).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedSymbol {
    pub label: String,
    pub kind: SymbolKind,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Bean,
    Route,
    Event,
    Method,
    Annotation,
}

/// An element and its owned children, detached from the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementTree {
    pub element: IndexElement,
    pub children: Vec<ElementTree>,
}

impl ElementTree {
    /// Pre-order traversal, this node first.
    pub fn walk(&self) -> impl Iterator<Item = &ElementTree> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    pub fn variant<T: Variant>(&self) -> Option<&T> {
        self.element.variant()
    }

    /// Direct children of variant `T`.
    pub fn children_of<T: Variant>(&self) -> impl Iterator<Item = (&ElementTree, &T)> {
        self.children
            .iter()
            .filter_map(|child| child.variant::<T>().map(|v| (child, v)))
    }
}
