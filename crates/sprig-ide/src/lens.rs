use serde::Serialize;
use sprig_core::{FileUri, LineIndex, Location, Range, Span};
use sprig_index::{ElementTree, RouteHandler};
use sprig_java::{parse_unit, MethodDecl, ParseMode, TypeDecl};

use crate::SpringIde;

/// A route pointing at a handler method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeLens {
    /// Span of the handler method's name.
    pub span: Span,
    pub range: Range,
    /// `GET /hello - Accept: text/plain`
    pub title: String,
    /// Where the route is declared.
    pub target: Location,
}

impl SpringIde {
    /// Lenses for the handler methods in `source` that routes declared elsewhere point at.
    pub fn code_lenses(&self, uri: &FileUri, source: &str) -> Vec<CodeLens> {
        let unit = match parse_unit(source, ParseMode::Declarations) {
            Ok(unit) => unit,
            Err(err) => {
                tracing::debug!(target: "sprig.ide", file = %uri, error = %err, "no code lenses");
                return Vec::new();
            }
        };
        let lines = LineIndex::new(source);

        let mut lenses = Vec::new();
        for ty in unit.all_types() {
            for method in ty.methods() {
                for (tree, route) in self.routes_to(uri, ty, method) {
                    lenses.push(CodeLens {
                        span: method.name_span,
                        range: lines.range(source, method.name_span),
                        title: title(route),
                        target: tree.element.location.clone(),
                    });
                }
            }
        }
        lenses
    }

    fn routes_to<'a>(
        &'a self,
        uri: &'a FileUri,
        ty: &'a TypeDecl,
        method: &'a MethodDecl,
    ) -> impl Iterator<Item = (&'a ElementTree, &'a RouteHandler)> + 'a {
        self.view.all_of::<RouteHandler>().filter(move |(tree, route)| {
            let location = &tree.element.location;
            let declared_on_method =
                &location.uri == uri && method.span.contains(location.span.start);
            !declared_on_method
                && route.handler_type.as_deref() == Some(ty.qualified_name.as_str())
                && route.handler_method.as_deref() == Some(method.name.as_str())
        })
    }
}

fn title(route: &RouteHandler) -> String {
    let mut title = String::new();
    if !route.http_methods.is_empty() {
        title.push_str(&route.http_methods.join(","));
        title.push(' ');
    }
    title.push_str(&route.path);
    if !route.accept_types.is_empty() {
        title.push_str(" - Accept: ");
        title.push_str(&route.accept_types.join(","));
    }
    if !route.content_types.is_empty() {
        title.push_str(" - Content-Type: ");
        title.push_str(&route.content_types.join(","));
    }
    title
}
