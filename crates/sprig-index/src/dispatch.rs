//! Walks one parsed unit and hands every declaration and annotation occurrence to the
//! providers registered for it.
//!
//! Order within a file is fixed: for each type, the declaration-shape providers, then the
//! type's annotations, then its members in source order, then nested types where they are
//! declared. For one occurrence, providers run in registry order (most specific first).

use std::panic::{self, AssertUnwindSafe};

use sprig_core::panic_payload_to_str;
use sprig_java::{Annotation, JavaUnit, Member, MethodDecl, TypeDecl};

use crate::context::PassContext;
use crate::provider::{AnnotationSite, ProviderError, ProviderRegistry, SiteTarget};

pub(crate) fn index_unit(registry: &ProviderRegistry, unit: &JavaUnit, cx: &mut PassContext<'_>) {
    for ty in &unit.types {
        if cx.is_cancelled() {
            return;
        }
        visit_type(registry, ty, cx);
    }
    cx.reconcile_orphans();
}

fn visit_type(registry: &ProviderRegistry, ty: &TypeDecl, cx: &mut PassContext<'_>) {
    for provider in registry.declaration_providers() {
        invoke(cx, provider.name(), ty, None, |cx| {
            provider.on_type_declaration(ty, cx)
        });
    }
    for annotation in &ty.annotations {
        dispatch(registry, cx, ty, annotation, SiteTarget::Type);
    }

    for member in &ty.members {
        if cx.is_cancelled() {
            return;
        }
        match member {
            Member::Field(field) => {
                for annotation in &field.annotations {
                    dispatch(registry, cx, ty, annotation, SiteTarget::Field(field));
                }
            }
            Member::Method(method) => {
                for annotation in &method.annotations {
                    dispatch(registry, cx, ty, annotation, SiteTarget::Method(method));
                }
                visit_params(registry, cx, ty, method);
            }
            Member::Constructor(ctor) => {
                for annotation in &ctor.annotations {
                    dispatch(registry, cx, ty, annotation, SiteTarget::Constructor(ctor));
                }
                visit_params(registry, cx, ty, ctor);
            }
            Member::Type(nested) => visit_type(registry, nested, cx),
        }
    }
}

fn visit_params(
    registry: &ProviderRegistry,
    cx: &mut PassContext<'_>,
    ty: &TypeDecl,
    method: &MethodDecl,
) {
    for param in &method.params {
        for annotation in &param.annotations {
            dispatch(
                registry,
                cx,
                ty,
                annotation,
                SiteTarget::Parameter { method, param },
            );
        }
    }
}

fn dispatch(
    registry: &ProviderRegistry,
    cx: &mut PassContext<'_>,
    ty: &TypeDecl,
    annotation: &Annotation,
    target: SiteTarget<'_>,
) {
    if cx.is_cancelled() {
        return;
    }
    let concrete = cx.resolve_annotation(annotation);
    let hierarchies = cx.hierarchies();
    let providers = registry.annotation_providers(hierarchies, &concrete);
    if providers.is_empty() {
        return;
    }
    let meta_annotations = hierarchies.meta_annotations(&concrete, |_| true);

    let site = AnnotationSite {
        annotation,
        concrete_type: &concrete,
        meta_annotations: &meta_annotations,
        target,
        declaring_type: ty,
    };
    for provider in providers {
        invoke(cx, provider.name(), ty, Some(&concrete), |cx| {
            provider.on_annotation(&site, cx)
        });
    }
}

/// Run one provider call. Errors and panics discard what the call added and are logged;
/// they never stop the walk.
fn invoke(
    cx: &mut PassContext<'_>,
    provider: &str,
    ty: &TypeDecl,
    annotation: Option<&str>,
    call: impl FnOnce(&mut PassContext<'_>) -> Result<(), ProviderError>,
) {
    if cx.is_cancelled() {
        return;
    }
    cx.begin_invocation();
    let fault = match panic::catch_unwind(AssertUnwindSafe(|| call(&mut *cx))) {
        Ok(Ok(())) => return,
        Ok(Err(err)) => err.to_string(),
        Err(payload) => format!("panicked: {}", panic_payload_to_str(&*payload)),
    };
    cx.rollback_invocation();
    tracing::error!(
        target: "sprig.index",
        file = %cx.file(),
        declaration = %ty.qualified_name,
        annotation = annotation.unwrap_or("-"),
        provider,
        pass = cx.pass().number(),
        error = %fault,
        "index provider failed; its output for this occurrence is dropped"
    );
}
