use sprig_java::{decapitalize, names, Annotation, Expr, MethodDecl, TypeDecl};

use super::events::expression_type;
use super::injection::type_injection_points;
use super::{annotation_text, bean_label, declared_type_of, simple_name};
use crate::context::{Pass, PassContext};
use crate::element::{
    AnnotationMetadata, Bean, EventPublisher, IndexElement, PlainSymbol, SymbolKind,
};
use crate::provider::{AnnotationSite, IndexProvider, ProviderError, SiteTarget};

/// `@Component` and everything meta-annotated with it, plus `@Named`.
///
/// Pass one creates the bean with its injection points. A bean that injects an
/// `ApplicationEventPublisher` asks for pass two, where its `publishEvent(..)` calls become
/// publisher children.
pub struct ComponentProvider;

impl IndexProvider for ComponentProvider {
    fn name(&self) -> &'static str {
        "component"
    }

    fn on_annotation(
        &self,
        site: &AnnotationSite<'_>,
        cx: &mut PassContext<'_>,
    ) -> Result<(), ProviderError> {
        if !matches!(site.target, SiteTarget::Type) {
            if cx.pass().is_first() && is_named(site.concrete_type) {
                named_symbol(site, cx);
            }
            return Ok(());
        }
        if !is_first_component_annotation(site, cx) {
            return Ok(());
        }

        match cx.pass() {
            Pass::ONE => create_bean(site, cx),
            Pass::TWO => index_publishers(site.declaring_type, cx),
            _ => Ok(()),
        }
    }
}

fn is_named(annotation: &str) -> bool {
    annotation == names::NAMED_JAKARTA || annotation == names::NAMED_JAVAX
}

/// Several stereotypes on one type still make one bean.
fn is_first_component_annotation(site: &AnnotationSite<'_>, cx: &PassContext<'_>) -> bool {
    let first = site.declaring_type.annotations.iter().find(|annotation| {
        let resolved = cx.resolve_annotation(annotation);
        is_named(&resolved) || cx.hierarchies().is_annotated_with(&resolved, names::COMPONENT)
    });
    first.is_some_and(|first| std::ptr::eq(first, site.annotation))
}

fn bean_name(annotation: &Annotation, ty: &TypeDecl) -> String {
    annotation
        .values(&["value"])
        .first()
        .and_then(|value| value.as_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| decapitalize(&ty.name))
}

fn create_bean(site: &AnnotationSite<'_>, cx: &mut PassContext<'_>) -> Result<(), ProviderError> {
    let ty = site.declaring_type;
    let name = bean_name(site.annotation, ty);

    let stereotypes: Vec<String> = site
        .meta_annotations
        .iter()
        .filter(|meta| cx.hierarchies().is_annotated_with(meta, names::COMPONENT))
        .map(|meta| format!("@{}", simple_name(meta)))
        .collect();
    let mut markers = format!("@{}", simple_name(site.concrete_type));
    if !stereotypes.is_empty() {
        markers.push_str(" <: ");
        markers.push_str(&stereotypes.join(", "));
    }
    let label = bean_label(false, &name, &markers, &ty.name);

    let is_configuration = site.concrete_type == names::CONFIGURATION
        || site.meta_annotations.iter().any(|m| m == names::CONFIGURATION);

    let mut annotations = cx.annotation_metadata(&ty.annotations);
    annotations.extend(site.meta_annotations.iter().map(AnnotationMetadata::meta));

    let element = IndexElement::new(
        Bean {
            name,
            is_configuration,
        },
        label.clone(),
        cx.location(site.annotation.span),
    )
    .with_type(ty.qualified_name.clone(), cx.supertypes(&ty.qualified_name))
    .with_annotations(annotations);

    let points = type_injection_points(ty, cx);
    let publishes = points
        .iter()
        .any(|point| point.type_name.as_deref() == Some(names::APPLICATION_EVENT_PUBLISHER));

    let bean = cx.add_root(element);
    for point in points {
        cx.add_child(bean, point)?;
    }
    cx.adopt_listeners(bean)?;
    cx.add_symbol(label, SymbolKind::Bean, site.annotation.span);

    if publishes {
        cx.request_next_pass("event publisher injection needs method bodies");
    }
    Ok(())
}

fn index_publishers(ty: &TypeDecl, cx: &mut PassContext<'_>) -> Result<(), ProviderError> {
    let Some(bean) = cx.bean_for_type(&ty.qualified_name) else {
        return Ok(());
    };

    for method in ty.methods().chain(ty.constructors()) {
        let Some(body) = &method.body else {
            continue;
        };
        for call in &body.invocations {
            if call.name != "publishEvent" || call.args.len() != 1 {
                continue;
            }
            if !receiver_is_publisher(call.receiver.as_deref(), method, ty, cx) {
                continue;
            }
            let Some(event_type) = expression_type(&call.args[0], method, ty, cx) else {
                continue;
            };

            let label = format!("@EventPublisher ({})", simple_name(&event_type));
            let supertypes = cx.supertypes(&event_type);
            let element = IndexElement::new(
                EventPublisher {
                    event_type: event_type.clone(),
                },
                label.clone(),
                cx.location(call.span),
            )
            .with_type(event_type, supertypes);
            cx.add_child(bean, element)?;
            cx.add_symbol(label, SymbolKind::Event, call.span);
        }
    }
    Ok(())
}

fn receiver_is_publisher(
    receiver: Option<&Expr>,
    method: &MethodDecl,
    ty: &TypeDecl,
    cx: &PassContext<'_>,
) -> bool {
    let publisher = names::APPLICATION_EVENT_PUBLISHER;
    match receiver {
        None => cx.is_subtype_of(&ty.qualified_name, publisher),
        Some(Expr::Name { name, .. }) => declared_type_of(name, method, ty)
            .map(|declared| cx.resolve_type(declared))
            .is_some_and(|declared| cx.is_subtype_of(&declared, publisher)),
        Some(_) => false,
    }
}

/// `@Named` on a member is recorded as a plain symbol.
fn named_symbol(site: &AnnotationSite<'_>, cx: &mut PassContext<'_>) {
    let span = site.annotation.span;
    let label = annotation_text(cx.source(), site.annotation);
    let element = IndexElement::new(PlainSymbol {}, label.clone(), cx.location(span))
        .with_annotations(cx.annotation_metadata(std::slice::from_ref(site.annotation)));
    cx.add_root(element);
    cx.add_symbol(label, SymbolKind::Annotation, span);
}
