//! Built-in Spring providers.

mod beans;
mod component;
mod data;
mod events;
mod injection;
mod request_mapping;
mod webflux;

pub use beans::{BeanMethodProvider, FunctionBeanProvider};
pub use component::ComponentProvider;
pub use data::DataRepositoryProvider;
pub use events::{ApplicationListenerProvider, EventListenerProvider};
pub use request_mapping::RequestMappingProvider;

use sprig_java::{Annotation, MethodDecl, TypeDecl, TypeRef};

/// `@+ 'name' (@Service <: @Component) CustomerService`; `@>` marks function beans.
pub(crate) fn bean_label(function: bool, name: &str, markers: &str, type_name: &str) -> String {
    let prefix = if function { '>' } else { '+' };
    if markers.is_empty() {
        format!("@{prefix} '{name}' {type_name}")
    } else {
        format!("@{prefix} '{name}' ({markers}) {type_name}")
    }
}

/// Source text of `annotation` with whitespace runs collapsed: `@Qualifier("fast")`.
pub(crate) fn annotation_text(source: &str, annotation: &Annotation) -> String {
    match source.get(annotation.span.start..annotation.span.end) {
        Some(text) => text.split_whitespace().collect::<Vec<_>>().join(" "),
        None => format!("@{}", annotation.name),
    }
}

pub(crate) fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// `java.util.function.Function<String,String>` as `Function<String,String>`.
pub(crate) fn display_type(ty: &TypeRef) -> String {
    let suffix = ty.text.strip_prefix(ty.base()).unwrap_or_default();
    format!("{}{suffix}", ty.simple_name())
}

/// Declared type of a local, parameter or field visible in `method`.
pub(crate) fn declared_type_of<'t>(
    name: &str,
    method: &'t MethodDecl,
    ty: &'t TypeDecl,
) -> Option<&'t TypeRef> {
    let name = name.strip_prefix("this.").unwrap_or(name);
    method
        .body
        .as_ref()
        .and_then(|body| body.local(name))
        .map(|local| &local.ty)
        .or_else(|| method.param(name).map(|param| &param.ty))
        .or_else(|| ty.field_type(name))
}
