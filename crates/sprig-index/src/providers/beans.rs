use sprig_core::Span;
use sprig_java::{decapitalize, names, TypeDecl, TypeKind};

use super::injection::{parameter_injection_points, type_injection_points};
use super::webflux::router_routes;
use super::{annotation_text, bean_label, display_type};
use crate::context::{Pass, PassContext};
use crate::element::{Bean, IndexElement, SymbolKind};
use crate::provider::{AnnotationSite, IndexProvider, ProviderError, SiteTarget};

const FUNCTION_TYPES: [&str; 3] = [names::FUNCTION, names::CONSUMER, names::SUPPLIER];

/// `@Bean` factory methods.
///
/// Router function beans need their method body, which the first pass does not interpret:
/// they are deferred to pass two and produced there together with their routes.
pub struct BeanMethodProvider;

impl IndexProvider for BeanMethodProvider {
    fn name(&self) -> &'static str {
        "bean-method"
    }

    fn on_annotation(
        &self,
        site: &AnnotationSite<'_>,
        cx: &mut PassContext<'_>,
    ) -> Result<(), ProviderError> {
        let SiteTarget::Method(method) = site.target else {
            return Ok(());
        };
        if method.modifiers.is_abstract || !method.has_body {
            return Ok(());
        }
        let Some(return_type) = &method.return_type else {
            return Ok(());
        };
        let bean_type = cx.resolve_type(return_type);

        let is_router = cx.is_subtype_of(&bean_type, names::ROUTER_FUNCTION);
        let routes = match (is_router, cx.pass()) {
            (true, Pass::ONE) => {
                cx.request_next_pass("router function bean needs its method body");
                return Ok(());
            }
            (true, Pass::TWO) => router_routes(method, site.declaring_type, cx),
            (false, Pass::ONE) => Vec::new(),
            _ => return Ok(()),
        };

        let explicit: Vec<(String, Span)> = site
            .annotation
            .values(&["name", "value"])
            .into_iter()
            .filter_map(|value| {
                value
                    .as_str()
                    .filter(|name| !name.is_empty())
                    .map(|name| (name.to_string(), value.span))
            })
            .collect();
        let bean_names = if explicit.is_empty() {
            vec![(method.name.clone(), site.annotation.name_span)]
        } else {
            explicit
        };

        let mut markers = String::from("@Bean");
        for other in &method.annotations {
            if cx.resolve_annotation(other) != names::BEAN {
                markers.push(' ');
                markers.push_str(&annotation_text(cx.source(), other));
            }
        }
        let is_function = FUNCTION_TYPES.contains(&bean_type.as_str());
        let supertypes = cx.supertypes(&bean_type);
        let annotations = cx.annotation_metadata(&method.annotations);
        let type_label = display_type(return_type);

        for (name, span) in bean_names {
            let label = bean_label(is_function, &name, &markers, &type_label);
            let element = IndexElement::new(
                Bean {
                    name,
                    is_configuration: false,
                },
                label.clone(),
                cx.location(span),
            )
            .with_type(bean_type.clone(), supertypes.clone())
            .with_annotations(annotations.clone());

            let bean = cx.add_root(element);
            for point in parameter_injection_points(method, cx) {
                cx.add_child(bean, point)?;
            }
            for route in &routes {
                let label = route.handler.label();
                let element =
                    IndexElement::new(route.handler.clone(), label, cx.location(route.span));
                cx.add_child(bean, element)?;
            }
            cx.adopt_listeners(bean)?;
            cx.add_symbol(label, SymbolKind::Bean, span);
        }
        for route in &routes {
            cx.add_symbol(route.handler.label(), SymbolKind::Route, route.span);
        }
        Ok(())
    }
}

/// Classes implementing `Function`, `Consumer` or `Supplier` are beans by shape.
pub struct FunctionBeanProvider;

impl IndexProvider for FunctionBeanProvider {
    fn name(&self) -> &'static str {
        "function-bean"
    }

    fn on_type_declaration(
        &self,
        ty: &TypeDecl,
        cx: &mut PassContext<'_>,
    ) -> Result<(), ProviderError> {
        if !cx.pass().is_first() || ty.kind != TypeKind::Class || ty.modifiers.is_abstract {
            return Ok(());
        }
        // Stereotyped classes are already beans.
        if cx.find_annotated(&ty.annotations, names::COMPONENT).is_some() {
            return Ok(());
        }
        let Some(function) = ty
            .declared_supertypes()
            .find(|declared| FUNCTION_TYPES.contains(&cx.resolve_type(declared).as_str()))
        else {
            return Ok(());
        };

        let name = decapitalize(&ty.name);
        let label = bean_label(true, &name, "", &display_type(function));
        let element = IndexElement::new(
            Bean {
                name,
                is_configuration: false,
            },
            label.clone(),
            cx.location(ty.name_span),
        )
        .with_type(ty.qualified_name.clone(), cx.supertypes(&ty.qualified_name))
        .with_annotations(cx.annotation_metadata(&ty.annotations));

        let points = type_injection_points(ty, cx);
        let bean = cx.add_root(element);
        for point in points {
            cx.add_child(bean, point)?;
        }
        cx.adopt_listeners(bean)?;
        cx.add_symbol(label, SymbolKind::Bean, ty.name_span);
        Ok(())
    }
}
