use sprig_java::{names, ArgValueKind, Expr, MethodDecl, TypeDecl, TypeKind};

use super::{declared_type_of, simple_name};
use crate::context::PassContext;
use crate::element::{EventListener, IndexElement, SymbolKind};
use crate::provider::{AnnotationSite, IndexProvider, ProviderError, SiteTarget};

/// `@EventListener` methods and annotations meta-annotated with it.
pub struct EventListenerProvider;

impl IndexProvider for EventListenerProvider {
    fn name(&self) -> &'static str {
        "event-listener"
    }

    fn on_annotation(
        &self,
        site: &AnnotationSite<'_>,
        cx: &mut PassContext<'_>,
    ) -> Result<(), ProviderError> {
        if !cx.pass().is_first() {
            return Ok(());
        }
        let SiteTarget::Method(method) = site.target else {
            return Ok(());
        };

        let declared = site
            .annotation
            .values(&["classes", "value"])
            .into_iter()
            .find_map(|value| match &value.kind {
                ArgValueKind::Class(name) => Some(cx.resolve_name(name)),
                _ => None,
            });
        let event_type = declared.or_else(|| method.params.first().map(|p| cx.resolve_type(&p.ty)));
        add_listener(cx, site.declaring_type, method, event_type)
    }
}

/// Types implementing `ApplicationListener<E>` with an `onApplicationEvent` method.
pub struct ApplicationListenerProvider;

impl IndexProvider for ApplicationListenerProvider {
    fn name(&self) -> &'static str {
        "application-listener"
    }

    fn on_type_declaration(
        &self,
        ty: &TypeDecl,
        cx: &mut PassContext<'_>,
    ) -> Result<(), ProviderError> {
        if !cx.pass().is_first() || matches!(ty.kind, TypeKind::Interface | TypeKind::Annotation) {
            return Ok(());
        }
        if !cx.is_subtype_of(&ty.qualified_name, names::APPLICATION_LISTENER) {
            return Ok(());
        }
        let Some(handler) = ty
            .methods()
            .find(|m| m.name == "onApplicationEvent" && m.params.len() == 1)
        else {
            return Ok(());
        };

        let event_type = cx.resolve_type(&handler.params[0].ty);
        add_listener(cx, ty, handler, Some(event_type))
    }
}

/// Listener element under the bean of `ty` when it already exists, otherwise top level until
/// the bean shows up.
fn add_listener(
    cx: &mut PassContext<'_>,
    ty: &TypeDecl,
    method: &MethodDecl,
    event_type: Option<String>,
) -> Result<(), ProviderError> {
    let label = match &event_type {
        Some(event) => format!("@EventListener ({})", simple_name(event)),
        None => "@EventListener".to_string(),
    };
    let mut element = IndexElement::new(
        EventListener {
            event_type: event_type.clone(),
            container_type: ty.qualified_name.clone(),
        },
        label.clone(),
        cx.location(method.name_span),
    )
    .with_annotations(cx.annotation_metadata(&method.annotations));
    if let Some(event) = event_type {
        let supertypes = cx.supertypes(&event);
        element = element.with_type(event, supertypes);
    }

    match cx.bean_for_type(&ty.qualified_name) {
        Some(bean) => {
            cx.add_child(bean, element)?;
        }
        None => {
            cx.add_root(element);
        }
    }
    cx.add_symbol(label, SymbolKind::Event, method.name_span);
    Ok(())
}

/// Static type of an event argument: `new T(..)`, or a local, parameter or field.
pub(crate) fn expression_type(
    expr: &Expr,
    method: &MethodDecl,
    ty: &TypeDecl,
    cx: &PassContext<'_>,
) -> Option<String> {
    match expr {
        Expr::New { ty: created, .. } => Some(cx.resolve_type(created)),
        Expr::Name { name, .. } => {
            let local = method
                .body
                .as_ref()
                .and_then(|body| body.local(name.strip_prefix("this.").unwrap_or(name)));
            if let Some(local) = local.filter(|l| l.ty.text == "var") {
                return match &local.initializer {
                    Some(Expr::New { ty: created, .. }) => Some(cx.resolve_type(created)),
                    _ => None,
                };
            }
            declared_type_of(name, method, ty).map(|declared| cx.resolve_type(declared))
        }
        _ => None,
    }
}
