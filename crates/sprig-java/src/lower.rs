//! Syntax tree to declaration model.

use tree_sitter::Node;

use crate::model::*;
use crate::syntax::{
    compact_type_text, find_named_child, modifier_node, named_children, node_text, parse_java,
    span, unquote, visit_nodes,
};
use crate::ParseError;

/// Parse one compilation unit.
pub fn parse_unit(source: &str, mode: ParseMode) -> Result<JavaUnit, ParseError> {
    let tree = parse_java(source)?;
    if tree.root_node().has_error() {
        tracing::trace!(target: "sprig.java", "syntax errors present, lowering what parsed");
    }
    let lower = Lower { source, mode };

    let mut package = None;
    let mut imports = Vec::new();
    let mut types = Vec::new();
    for child in named_children(tree.root_node()) {
        match child.kind() {
            "package_declaration" => {
                package = named_children(child)
                    .into_iter()
                    .find(|n| matches!(n.kind(), "scoped_identifier" | "identifier"))
                    .map(|n| compact_type_text(node_text(source, n)));
            }
            "import_declaration" => {
                if let Some(import) = lower.import(child) {
                    imports.push(import);
                }
            }
            kind if is_type_declaration(kind) => {
                if let Some(ty) = lower.type_decl(child, package.as_deref()) {
                    types.push(ty);
                }
            }
            _ => {}
        }
    }

    Ok(JavaUnit {
        mode,
        package,
        imports,
        types,
    })
}

fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration"
    )
}

fn is_comment(node: Node<'_>) -> bool {
    node.kind().ends_with("comment")
}

fn code_children(node: Node<'_>) -> Vec<Node<'_>> {
    named_children(node)
        .into_iter()
        .filter(|child| !is_comment(*child))
        .collect()
}

struct Lower<'s> {
    source: &'s str,
    mode: ParseMode,
}

impl<'s> Lower<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        node_text(self.source, node)
    }

    fn import(&self, node: Node<'_>) -> Option<Import> {
        let text = self.text(node).trim();
        let body = text.strip_prefix("import")?.trim().trim_end_matches(';').trim();
        let (is_static, body) = match body.strip_prefix("static") {
            Some(rest) if rest.starts_with(char::is_whitespace) => (true, rest.trim()),
            _ => (false, body),
        };
        let path = compact_type_text(body).replace(' ', "");
        let (path, wildcard) = match path.strip_suffix(".*") {
            Some(prefix) => (prefix.to_string(), true),
            None => (path, false),
        };
        Some(Import {
            path,
            is_static,
            wildcard,
        })
    }

    fn type_decl(&self, node: Node<'_>, container: Option<&str>) -> Option<TypeDecl> {
        let kind = match node.kind() {
            "class_declaration" => TypeKind::Class,
            "interface_declaration" => TypeKind::Interface,
            "enum_declaration" => TypeKind::Enum,
            "record_declaration" => TypeKind::Record,
            "annotation_type_declaration" => TypeKind::Annotation,
            _ => return None,
        };
        let name_node = node.child_by_field_name("name")?;
        let name = self.text(name_node).to_string();
        let qualified_name = match container {
            Some(container) if !container.is_empty() => format!("{container}.{name}"),
            _ => name.clone(),
        };
        let (modifiers, annotations) = self.modifiers(node);

        let mut super_class = None;
        let mut interfaces = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "superclass" => {
                    super_class = code_children(child).first().map(|t| self.type_ref(*t));
                }
                "super_interfaces" | "extends_interfaces" => {
                    let list = named_children(child)
                        .into_iter()
                        .find(|n| n.kind().ends_with("type_list"))
                        .unwrap_or(child);
                    interfaces.extend(code_children(list).into_iter().map(|t| self.type_ref(t)));
                }
                _ => {}
            }
        }

        let mut members = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            self.members(body, &qualified_name, &mut members);
        }

        Some(TypeDecl {
            name,
            qualified_name,
            kind,
            span: span(node),
            name_span: span(name_node),
            modifiers,
            annotations,
            super_class,
            interfaces,
            members,
        })
    }

    fn members(&self, body: Node<'_>, owner: &str, out: &mut Vec<Member>) {
        for child in code_children(body) {
            match child.kind() {
                "field_declaration" | "constant_declaration" => {
                    if let Some(field) = self.field(child) {
                        out.push(Member::Field(field));
                    }
                }
                "method_declaration" => {
                    if let Some(method) = self.method(child) {
                        out.push(Member::Method(method));
                    }
                }
                "constructor_declaration" | "compact_constructor_declaration" => {
                    if let Some(ctor) = self.method(child) {
                        out.push(Member::Constructor(ctor));
                    }
                }
                "enum_body_declarations" => self.members(child, owner, out),
                kind if is_type_declaration(kind) => {
                    if let Some(ty) = self.type_decl(child, Some(owner)) {
                        out.push(Member::Type(ty));
                    }
                }
                _ => {}
            }
        }
    }

    fn modifiers(&self, node: Node<'_>) -> (Modifiers, Vec<Annotation>) {
        let mut modifiers = Modifiers::default();
        let mut annotations = Vec::new();
        let Some(list) = modifier_node(node) else {
            return (modifiers, annotations);
        };

        let mut cursor = list.walk();
        for child in list.children(&mut cursor) {
            match child.kind() {
                "public" => modifiers.is_public = true,
                "static" => modifiers.is_static = true,
                "abstract" => modifiers.is_abstract = true,
                "final" => modifiers.is_final = true,
                "annotation" | "marker_annotation" => {
                    if let Some(annotation) = self.annotation(child) {
                        annotations.push(annotation);
                    }
                }
                _ => {}
            }
        }
        (modifiers, annotations)
    }

    fn annotation(&self, node: Node<'_>) -> Option<Annotation> {
        let name_node = node.child_by_field_name("name")?;
        let mut args = Vec::new();
        if let Some(list) = node.child_by_field_name("arguments") {
            for child in code_children(list) {
                if child.kind() == "element_value_pair" {
                    let (Some(key), Some(value)) = (
                        child.child_by_field_name("key"),
                        child.child_by_field_name("value"),
                    ) else {
                        continue;
                    };
                    args.push(AnnotationArg {
                        name: self.text(key).to_string(),
                        span: span(child),
                        values: self.element_values(value),
                    });
                } else {
                    args.push(AnnotationArg {
                        name: "value".to_string(),
                        span: span(child),
                        values: self.element_values(child),
                    });
                }
            }
        }

        Some(Annotation {
            name: compact_type_text(self.text(name_node)).replace(' ', ""),
            span: span(node),
            name_span: span(name_node),
            args,
        })
    }

    fn element_values(&self, node: Node<'_>) -> Vec<ArgValue> {
        if node.kind() == "element_value_array_initializer" {
            return code_children(node)
                .into_iter()
                .map(|value| self.element_value(value))
                .collect();
        }
        vec![self.element_value(node)]
    }

    fn element_value(&self, node: Node<'_>) -> ArgValue {
        let text = self.text(node).to_string();
        let kind = match node.kind() {
            "class_literal" => {
                let ty = code_children(node)
                    .first()
                    .map(|t| compact_type_text(self.text(*t)))
                    .unwrap_or_else(|| text.trim_end_matches(".class").to_string());
                ArgValueKind::Class(ty)
            }
            "identifier" | "field_access" | "scoped_identifier" => {
                ArgValueKind::Name(compact_type_text(&text).replace(' ', ""))
            }
            _ => match self.expr(node) {
                Expr::Str { value, .. } => ArgValueKind::Str(value),
                Expr::Concat(parts) => {
                    let literal: Option<Vec<String>> = parts
                        .into_iter()
                        .map(|part| match part {
                            Expr::Str { value, .. } => Some(value),
                            _ => None,
                        })
                        .collect();
                    literal
                        .map(|parts| ArgValueKind::Str(parts.concat()))
                        .unwrap_or(ArgValueKind::Other)
                }
                _ => ArgValueKind::Other,
            },
        };
        ArgValue {
            text,
            span: span(node),
            kind,
        }
    }

    fn field(&self, node: Node<'_>) -> Option<FieldDecl> {
        let ty = self.type_ref(node.child_by_field_name("type")?);
        let (modifiers, annotations) = self.modifiers(node);
        let declarators = named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "variable_declarator")
            .filter_map(|declarator| {
                let name = declarator.child_by_field_name("name")?;
                Some(VarDeclarator {
                    name: self.text(name).to_string(),
                    name_span: span(name),
                    initializer: declarator
                        .child_by_field_name("value")
                        .map(|value| self.expr(value)),
                })
            })
            .collect();

        Some(FieldDecl {
            ty,
            span: span(node),
            modifiers,
            annotations,
            declarators,
        })
    }

    fn method(&self, node: Node<'_>) -> Option<MethodDecl> {
        let name_node = node.child_by_field_name("name")?;
        let (modifiers, annotations) = self.modifiers(node);
        let return_type = node
            .child_by_field_name("type")
            .map(|ty| self.type_ref(ty));
        let params = node
            .child_by_field_name("parameters")
            .map(|list| {
                code_children(list)
                    .into_iter()
                    .filter_map(|param| self.param(param))
                    .collect()
            })
            .unwrap_or_default();

        let body_node = node
            .child_by_field_name("body")
            .or_else(|| find_named_child(node, "constructor_body"));
        let body = match (self.mode, body_node) {
            (ParseMode::Full, Some(body)) => Some(self.body(body)),
            _ => None,
        };

        Some(MethodDecl {
            name: self.text(name_node).to_string(),
            name_span: span(name_node),
            span: span(node),
            return_type,
            params,
            modifiers,
            annotations,
            has_body: body_node.is_some(),
            body,
        })
    }

    fn param(&self, node: Node<'_>) -> Option<Param> {
        let (ty_node, name_node) = match node.kind() {
            "formal_parameter" => (
                node.child_by_field_name("type")?,
                node.child_by_field_name("name")?,
            ),
            "spread_parameter" => {
                let children = code_children(node);
                let ty = children
                    .iter()
                    .find(|c| c.kind() != "modifiers" && c.kind() != "variable_declarator")?;
                let declarator = children.iter().find(|c| c.kind() == "variable_declarator")?;
                (*ty, declarator.child_by_field_name("name")?)
            }
            _ => return None,
        };
        let (_, annotations) = self.modifiers(node);
        Some(Param {
            name: self.text(name_node).to_string(),
            name_span: span(name_node),
            span: span(node),
            ty: self.type_ref(ty_node),
            annotations,
        })
    }

    fn body(&self, node: Node<'_>) -> MethodBody {
        let mut body = MethodBody::default();
        visit_nodes(node, &mut |n| match n.kind() {
            "method_invocation" => body.invocations.push(self.invocation(n)),
            "local_variable_declaration" => {
                let Some(ty) = n.child_by_field_name("type") else {
                    return;
                };
                let ty = self.type_ref(ty);
                for declarator in named_children(n) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    let Some(name) = declarator.child_by_field_name("name") else {
                        continue;
                    };
                    body.locals.push(LocalVar {
                        name: self.text(name).to_string(),
                        ty: ty.clone(),
                        initializer: declarator
                            .child_by_field_name("value")
                            .map(|value| self.expr(value)),
                    });
                }
            }
            "return_statement" => {
                if let Some(value) = code_children(n).first() {
                    body.returns.push(self.expr(*value));
                }
            }
            _ => {}
        });
        body
    }

    fn invocation(&self, node: Node<'_>) -> Invocation {
        let name = node.child_by_field_name("name");
        Invocation {
            receiver: node
                .child_by_field_name("object")
                .map(|object| Box::new(self.expr(object))),
            name: name.map(|n| self.text(n).to_string()).unwrap_or_default(),
            name_span: name.map(span).unwrap_or_else(|| span(node)),
            args: node
                .child_by_field_name("arguments")
                .map(|args| {
                    code_children(args)
                        .into_iter()
                        .map(|arg| self.expr(arg))
                        .collect()
                })
                .unwrap_or_default(),
            span: span(node),
        }
    }

    fn expr(&self, node: Node<'_>) -> Expr {
        let node_span = span(node);
        match node.kind() {
            "string_literal" | "text_block" => Expr::Str {
                value: unquote(self.text(node)),
                span: node_span,
            },
            "object_creation_expression" => match node.child_by_field_name("type") {
                Some(ty) => Expr::New {
                    ty: self.type_ref(ty),
                    span: node_span,
                },
                None => self.other(node),
            },
            "identifier" | "field_access" | "this" | "scoped_identifier" => Expr::Name {
                name: compact_type_text(self.text(node)).replace(' ', ""),
                span: node_span,
            },
            "method_invocation" => Expr::Call(Box::new(self.invocation(node))),
            "method_reference" => {
                let children = code_children(node);
                let receiver = children
                    .first()
                    .map(|r| compact_type_text(self.text(*r)))
                    .unwrap_or_default();
                let method = children
                    .iter()
                    .skip(1)
                    .rev()
                    .find(|c| c.kind() == "identifier")
                    .map(|m| self.text(*m).to_string())
                    .unwrap_or_else(|| "new".to_string());
                Expr::MethodRef {
                    receiver,
                    method,
                    span: node_span,
                }
            }
            "binary_expression" => {
                let operator = node
                    .child_by_field_name("operator")
                    .map(|op| self.text(op))
                    .unwrap_or_default();
                match (
                    operator,
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) {
                    ("+", Some(left), Some(right)) => {
                        let mut parts = Vec::new();
                        for side in [self.expr(left), self.expr(right)] {
                            match side {
                                Expr::Concat(inner) => parts.extend(inner),
                                other => parts.push(other),
                            }
                        }
                        Expr::Concat(parts)
                    }
                    _ => self.other(node),
                }
            }
            "parenthesized_expression" => match code_children(node).first() {
                Some(inner) => self.expr(*inner),
                None => self.other(node),
            },
            "cast_expression" => match node.child_by_field_name("value") {
                Some(value) => self.expr(value),
                None => self.other(node),
            },
            _ => self.other(node),
        }
    }

    fn other(&self, node: Node<'_>) -> Expr {
        Expr::Other {
            text: self.text(node).to_string(),
            span: span(node),
        }
    }

    fn type_ref(&self, node: Node<'_>) -> TypeRef {
        let args = if node.kind() == "generic_type" {
            find_named_child(node, "type_arguments")
                .map(|list| {
                    code_children(list)
                        .into_iter()
                        .map(|arg| self.type_ref(arg))
                        .collect()
                })
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        TypeRef {
            text: compact_type_text(self.text(node)),
            span: span(node),
            args,
        }
    }
}
