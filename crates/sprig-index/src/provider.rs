use std::collections::HashSet;
use std::sync::Arc;

use sprig_annotations::{HierarchyAwareRegistry, RegistryError, SuperAnnotations};
use sprig_java::{names, Annotation, FieldDecl, MethodDecl, Param, TypeDecl};

use crate::context::PassContext;
use crate::graph::GraphError;
use crate::providers::{
    ApplicationListenerProvider, BeanMethodProvider, ComponentProvider, DataRepositoryProvider,
    EventListenerProvider, FunctionBeanProvider, RequestMappingProvider,
};

/// A fault raised by a provider for one occurrence. The occurrence's output is discarded and
/// indexing continues.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("cannot resolve {0}")]
    Unresolved(String),
    #[error("{0}")]
    Other(String),
}

/// The declaration an annotation occurrence sits on.
#[derive(Debug, Clone, Copy)]
pub enum SiteTarget<'a> {
    Type,
    Field(&'a FieldDecl),
    Method(&'a MethodDecl),
    Constructor(&'a MethodDecl),
    Parameter {
        method: &'a MethodDecl,
        param: &'a Param,
    },
}

impl SiteTarget<'_> {
    pub fn describe(&self) -> &'static str {
        match self {
            SiteTarget::Type => "type",
            SiteTarget::Field(_) => "field",
            SiteTarget::Method(_) => "method",
            SiteTarget::Constructor(_) => "constructor",
            SiteTarget::Parameter { .. } => "parameter",
        }
    }
}

/// One annotation occurrence as seen by a provider.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationSite<'a> {
    pub annotation: &'a Annotation,
    /// Resolved type of `annotation`.
    pub concrete_type: &'a str,
    /// Meta-annotations of `concrete_type` in discovery order, `concrete_type` excluded.
    pub meta_annotations: &'a [String],
    pub target: SiteTarget<'a>,
    /// Innermost type declaring the annotated element (the type itself for [`SiteTarget::Type`]).
    pub declaring_type: &'a TypeDecl,
}

/// Produces index elements and symbols for annotation occurrences or declaration shapes.
///
/// Providers are shared across files and threads and keep no per-file state; everything they
/// produce goes through the [`PassContext`].
pub trait IndexProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Called for every occurrence of an annotation the provider is registered for, including
    /// annotations that reach the registered one through their meta-annotations.
    fn on_annotation(
        &self,
        _site: &AnnotationSite<'_>,
        _cx: &mut PassContext<'_>,
    ) -> Result<(), ProviderError> {
        Ok(())
    }

    /// Called once per type declaration for declaration-shape providers.
    fn on_type_declaration(
        &self,
        _ty: &TypeDecl,
        _cx: &mut PassContext<'_>,
    ) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Providers keyed by annotation type plus the declaration-shape providers.
pub struct ProviderRegistry {
    annotations: HierarchyAwareRegistry<dyn IndexProvider>,
    declarations: Vec<Arc<dyn IndexProvider>>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            annotations: HierarchyAwareRegistry::new(),
            declarations: Vec::new(),
        }
    }

    /// The built-in Spring providers.
    pub fn with_defaults() -> Result<Self, RegistryError> {
        let mut registry = Self::new();

        let component: Arc<dyn IndexProvider> = Arc::new(ComponentProvider);
        registry.register_annotation(names::COMPONENT, component.clone(), false)?;
        registry.register_annotation(names::NAMED_JAKARTA, component.clone(), false)?;
        registry.register_annotation(names::NAMED_JAVAX, component, false)?;
        registry.register_annotation(names::BEAN, Arc::new(BeanMethodProvider), false)?;
        registry.register_annotation(
            names::REQUEST_MAPPING,
            Arc::new(RequestMappingProvider),
            false,
        )?;
        registry.register_annotation(
            names::EVENT_LISTENER,
            Arc::new(EventListenerProvider),
            false,
        )?;

        registry.register_declaration(Arc::new(ApplicationListenerProvider));
        registry.register_declaration(Arc::new(FunctionBeanProvider));
        registry.register_declaration(Arc::new(DataRepositoryProvider));
        Ok(registry)
    }

    /// Bind `provider` to `annotation`. Binding one annotation type twice is an error.
    pub fn register_annotation(
        &mut self,
        annotation: impl Into<String>,
        provider: Arc<dyn IndexProvider>,
        overriding: bool,
    ) -> Result<(), RegistryError> {
        self.annotations.put(annotation, provider, overriding)
    }

    pub fn register_declaration(&mut self, provider: Arc<dyn IndexProvider>) {
        self.declarations.push(provider);
    }

    /// Providers for an occurrence of `concrete`, most specific first.
    pub fn annotation_providers(
        &self,
        hierarchy: &dyn SuperAnnotations,
        concrete: &str,
    ) -> Vec<Arc<dyn IndexProvider>> {
        self.annotations.get(hierarchy, concrete)
    }

    pub fn declaration_providers(&self) -> &[Arc<dyn IndexProvider>] {
        &self.declarations
    }

    pub fn contains_annotation(&self, annotation: &str) -> bool {
        self.annotations.contains_key(annotation)
    }

    pub fn annotation_keys(&self) -> impl Iterator<Item = &str> {
        self.annotations.keys()
    }

    /// Every distinct provider, each once.
    pub fn all(&self) -> Vec<Arc<dyn IndexProvider>> {
        let mut seen = HashSet::new();
        self.annotations
            .get_all()
            .into_iter()
            .chain(self.declarations.iter().cloned())
            .filter(|provider| seen.insert(Arc::as_ptr(provider) as *const ()))
            .collect()
    }
}
