use sprig_java::{names, Annotation, ArgValue, ArgValueKind, TypeDecl};

use crate::context::PassContext;
use crate::element::{IndexElement, RouteHandler, SymbolKind};
use crate::provider::{AnnotationSite, IndexProvider, ProviderError, SiteTarget};

const SHORTCUTS: [(&str, &str); 5] = [
    (names::GET_MAPPING, "GET"),
    (names::POST_MAPPING, "POST"),
    (names::PUT_MAPPING, "PUT"),
    (names::DELETE_MAPPING, "DELETE"),
    (names::PATCH_MAPPING, "PATCH"),
];

/// `@RequestMapping` and its specialisations on handler methods.
pub struct RequestMappingProvider;

impl IndexProvider for RequestMappingProvider {
    fn name(&self) -> &'static str {
        "request-mapping"
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
        let ty = site.declaring_type;

        let paths = non_empty(mapping_paths(site.annotation, ty));
        let prefixes = non_empty(
            cx.find_exact(&ty.annotations, names::REQUEST_MAPPING)
                .map(|class_mapping| mapping_paths(class_mapping, ty))
                .unwrap_or_default(),
        );
        let http_methods = http_methods(site);
        let accept_types = strings(site.annotation.values(&["consumes"]));
        let content_types = strings(site.annotation.values(&["produces"]));

        let bean = cx.bean_for_type(&ty.qualified_name);
        let annotations = cx.annotation_metadata(&method.annotations);
        let span = site.annotation.span;
        for prefix in &prefixes {
            for path in &paths {
                let handler = RouteHandler {
                    path: join_paths(prefix, path),
                    http_methods: http_methods.clone(),
                    accept_types: accept_types.clone(),
                    content_types: content_types.clone(),
                    handler_type: Some(ty.qualified_name.clone()),
                    handler_method: Some(method.name.clone()),
                };
                let label = handler.label();
                let element = IndexElement::new(handler, label.clone(), cx.location(span))
                    .with_annotations(annotations.clone());
                match bean {
                    Some(bean) => {
                        cx.add_child(bean, element)?;
                    }
                    None => {
                        cx.add_root(element);
                    }
                }
                cx.add_symbol(label, SymbolKind::Route, span);
            }
        }
        Ok(())
    }
}

fn non_empty(paths: Vec<String>) -> Vec<String> {
    if paths.is_empty() {
        vec![String::new()]
    } else {
        paths
    }
}

/// `value`/`path` entries; constants declared in `ty` are substituted.
fn mapping_paths(annotation: &Annotation, ty: &TypeDecl) -> Vec<String> {
    annotation
        .values(&["value", "path"])
        .into_iter()
        .filter_map(|value| match &value.kind {
            ArgValueKind::Str(path) => Some(path.clone()),
            ArgValueKind::Name(name) => {
                let simple = name.rsplit('.').next().unwrap_or(name);
                ty.string_constant(simple)
            }
            _ => None,
        })
        .collect()
}

fn http_methods(site: &AnnotationSite<'_>) -> Vec<String> {
    let shortcut = std::iter::once(site.concrete_type)
        .chain(site.meta_annotations.iter().map(String::as_str))
        .find_map(|annotation| {
            SHORTCUTS
                .iter()
                .find(|(name, _)| *name == annotation)
                .map(|(_, method)| *method)
        });
    match shortcut {
        Some(method) => vec![method.to_string()],
        None => site
            .annotation
            .values(&["method"])
            .into_iter()
            .filter_map(|value| match &value.kind {
                ArgValueKind::Name(name) => name.rsplit('.').next().map(str::to_string),
                _ => None,
            })
            .collect(),
    }
}

fn strings(values: Vec<&ArgValue>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|value| value.as_str().map(str::to_string))
        .collect()
}

/// Join path segments with single slashes; the empty path is `/`.
pub(crate) fn join_paths(prefix: &str, path: &str) -> String {
    let mut joined = String::new();
    for part in [prefix, path] {
        let part = part.trim_matches('/');
        if !part.is_empty() {
            joined.push('/');
            joined.push_str(part);
        }
    }
    if joined.is_empty() {
        joined.push('/');
    }
    joined
}
