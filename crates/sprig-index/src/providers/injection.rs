use sprig_core::Span;
use sprig_java::{names, Annotation, MethodDecl, TypeDecl, TypeRef};

use crate::context::PassContext;
use crate::element::{IndexElement, InjectionPoint};

const INJECTING: [&str; 3] = [names::AUTOWIRED, names::INJECT_JAKARTA, names::INJECT_JAVAX];

fn is_injecting(cx: &PassContext<'_>, annotations: &[Annotation]) -> bool {
    INJECTING
        .iter()
        .any(|target| cx.find_exact(annotations, target).is_some())
}

/// Injection points of a component type: injected fields, parameters of the injecting (or
/// sole) constructor and parameters of injecting methods, in that order.
pub(crate) fn type_injection_points(ty: &TypeDecl, cx: &PassContext<'_>) -> Vec<IndexElement> {
    let mut points = Vec::new();

    for field in ty.fields() {
        if !is_injecting(cx, &field.annotations) {
            continue;
        }
        for declarator in &field.declarators {
            points.push(injection_point(
                cx,
                &declarator.name,
                declarator.name_span,
                &field.ty,
                &field.annotations,
            ));
        }
    }

    let constructors: Vec<&MethodDecl> = ty.constructors().collect();
    let injecting = constructors
        .iter()
        .find(|ctor| is_injecting(cx, &ctor.annotations))
        .or_else(|| match constructors.as_slice() {
            [sole] => Some(sole),
            _ => None,
        });
    if let Some(ctor) = injecting {
        points.extend(parameter_injection_points(ctor, cx));
    }

    for method in ty.methods() {
        if is_injecting(cx, &method.annotations) {
            points.extend(parameter_injection_points(method, cx));
        }
    }

    points
}

pub(crate) fn parameter_injection_points(
    method: &MethodDecl,
    cx: &PassContext<'_>,
) -> Vec<IndexElement> {
    method
        .params
        .iter()
        .map(|param| {
            injection_point(cx, &param.name, param.name_span, &param.ty, &param.annotations)
        })
        .collect()
}

fn injection_point(
    cx: &PassContext<'_>,
    name: &str,
    span: Span,
    ty: &TypeRef,
    annotations: &[Annotation],
) -> IndexElement {
    IndexElement::new(
        InjectionPoint {
            name: name.to_string(),
            qualifier: cx.qualifier(annotations),
        },
        name,
        cx.location(span),
    )
    .with_type(cx.resolve_type(ty), Vec::new())
    .with_annotations(cx.annotation_metadata(annotations))
}
