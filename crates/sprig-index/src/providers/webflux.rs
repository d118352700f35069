//! Routes declared by functional Webflux router beans.
//!
//! Two styles are recognised in the returned expression:
//! `route(GET("/a").and(accept(TEXT_PLAIN)), handler::a).andRoute(..)` and the builder form
//! `route().GET("/a", handler::a).build()`, including `nest(path("/p"), ..)` prefixes.

use sprig_core::Span;
use sprig_java::{Expr, Invocation, MethodDecl, TypeDecl};

use super::declared_type_of;
use super::request_mapping::join_paths;
use crate::context::PassContext;
use crate::element::RouteHandler;

const HTTP_METHODS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

pub(crate) struct Route {
    pub handler: RouteHandler,
    pub span: Span,
}

/// Routes of a router bean method with an interpreted body, in source order.
pub(crate) fn router_routes(
    method: &MethodDecl,
    ty: &TypeDecl,
    cx: &PassContext<'_>,
) -> Vec<Route> {
    let Some(body) = &method.body else {
        return Vec::new();
    };
    let mut walker = Walker {
        method,
        ty,
        cx,
        routes: Vec::new(),
    };
    for returned in &body.returns {
        walker.expr(returned, "");
    }
    walker.routes
}

#[derive(Debug, Default)]
struct Predicate {
    path: Option<String>,
    methods: Vec<String>,
    accept: Vec<String>,
    content: Vec<String>,
}

impl Predicate {
    fn merge(&mut self, other: Predicate) {
        if other.path.is_some() {
            self.path = other.path;
        }
        self.methods.extend(other.methods);
        self.accept.extend(other.accept);
        self.content.extend(other.content);
    }
}

struct Walker<'w, 'c> {
    method: &'w MethodDecl,
    ty: &'w TypeDecl,
    cx: &'w PassContext<'c>,
    routes: Vec<Route>,
}

impl Walker<'_, '_> {
    fn expr(&mut self, expr: &Expr, prefix: &str) {
        if let Expr::Call(call) = expr {
            self.call(call, prefix);
        }
    }

    fn call(&mut self, call: &Invocation, prefix: &str) {
        if let Some(receiver) = &call.receiver {
            self.expr(receiver, prefix);
        }

        let name = call.name.as_str();
        match name {
            "route" | "andRoute" if call.args.len() == 2 => {
                let predicate = predicate(&call.args[0]);
                self.push(predicate, &call.args[1], call.args[0].span(), prefix);
            }
            "nest" | "andNest" if call.args.len() == 2 => {
                let nested = predicate(&call.args[0]);
                let prefix = join_paths(prefix, nested.path.as_deref().unwrap_or_default());
                self.expr(&call.args[1], &prefix);
            }
            _ if HTTP_METHODS.contains(&name)
                && call.receiver.is_some()
                && matches!(call.args.last(), Some(Expr::MethodRef { .. })) =>
            {
                let mut predicate = Predicate {
                    methods: vec![name.to_string()],
                    ..Predicate::default()
                };
                let Some((handler, mut rest)) = call.args.split_last() else {
                    return;
                };
                if let Some((Expr::Str { value, .. }, tail)) = rest.split_first() {
                    predicate.path = Some(value.clone());
                    rest = tail;
                }
                for arg in rest {
                    predicate.merge(self::predicate(arg));
                }
                let span = call.args.first().map(Expr::span).unwrap_or(call.name_span);
                self.push(predicate, handler, span, prefix);
            }
            _ => {
                for arg in &call.args {
                    self.expr(arg, prefix);
                }
            }
        }
    }

    fn push(&mut self, predicate: Predicate, handler: &Expr, span: Span, prefix: &str) {
        let (handler_type, handler_method) = match handler {
            Expr::MethodRef {
                receiver, method, ..
            } => (Some(self.handler_type(receiver)), Some(method.clone())),
            _ => (None, None),
        };
        self.routes.push(Route {
            handler: RouteHandler {
                path: join_paths(prefix, predicate.path.as_deref().unwrap_or_default()),
                http_methods: predicate.methods,
                accept_types: predicate.accept,
                content_types: predicate.content,
                handler_type,
                handler_method,
            },
            span,
        });
    }

    fn handler_type(&self, receiver: &str) -> String {
        if receiver == "this" {
            return self.ty.qualified_name.clone();
        }
        match declared_type_of(receiver, self.method, self.ty) {
            Some(declared) => self.cx.resolve_type(declared),
            None => self.cx.resolve_name(receiver),
        }
    }
}

fn predicate(expr: &Expr) -> Predicate {
    let mut out = Predicate::default();
    let Expr::Call(call) = expr else {
        return out;
    };
    if let Some(receiver) = &call.receiver {
        out.merge(predicate(receiver));
    }

    let name = call.name.as_str();
    let first_str = match call.args.first() {
        Some(Expr::Str { value, .. }) => Some(value.clone()),
        _ => None,
    };
    match name {
        _ if HTTP_METHODS.contains(&name) => {
            out.methods.push(name.to_string());
            if first_str.is_some() {
                out.path = first_str;
            }
        }
        "path" => out.path = first_str,
        "method" => out.methods.extend(call.args.iter().filter_map(constant_name)),
        "accept" => out.accept.extend(call.args.iter().filter_map(media_type)),
        "contentType" => out.content.extend(call.args.iter().filter_map(media_type)),
        "and" => {
            for arg in &call.args {
                out.merge(predicate(arg));
            }
        }
        _ => {}
    }
    out
}

fn constant_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Name { name, .. } => name.rsplit('.').next().map(str::to_string),
        _ => None,
    }
}

/// `MediaType.TEXT_PLAIN` as `text/plain`.
fn media_type(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Str { value, .. } => Some(value.clone()),
        Expr::Name { .. } => {
            let constant = constant_name(expr)?;
            let constant = constant.strip_suffix("_VALUE").unwrap_or(&constant);
            let lower = constant.to_ascii_lowercase();
            let (kind, subtype) = lower.split_once('_')?;
            Some(format!("{kind}/{}", subtype.replace('_', "-")))
        }
        _ => None,
    }
}
