//! Declaration model handed to the indexer.
//!
//! Everything is owned data so a parsed unit can outlive the syntax tree it came from.

use serde::Serialize;
use sprig_core::Span;

/// How much of a compilation unit to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParseMode {
    /// Declarations only; method bodies are recorded as present but left uninterpreted.
    Declarations,
    /// Declarations plus method-body expressions.
    Full,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JavaUnit {
    pub mode: ParseMode,
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub types: Vec<TypeDecl>,
}

impl JavaUnit {
    /// All type declarations including nested ones, outermost first.
    pub fn all_types(&self) -> Vec<&TypeDecl> {
        fn collect<'a>(ty: &'a TypeDecl, out: &mut Vec<&'a TypeDecl>) {
            out.push(ty);
            for nested in ty.nested_types() {
                collect(nested, out);
            }
        }

        let mut out = Vec::new();
        for ty in &self.types {
            collect(ty, &mut out);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    pub is_static: bool,
    pub wildcard: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub is_public: bool,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub qualified_name: String,
    pub kind: TypeKind,
    pub span: Span,
    pub name_span: Span,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub super_class: Option<TypeRef>,
    /// `implements` for classes, enums and records; `extends` for interfaces.
    pub interfaces: Vec<TypeRef>,
    pub members: Vec<Member>,
}

impl TypeDecl {
    /// Declared supertypes as written (superclass first).
    pub fn declared_supertypes(&self) -> impl Iterator<Item = &TypeRef> {
        self.super_class.iter().chain(self.interfaces.iter())
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Constructor(ctor) => Some(ctor),
            _ => None,
        })
    }

    pub fn nested_types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Type(ty) => Some(ty),
            _ => None,
        })
    }

    /// Type of the field named `name`, if declared here.
    pub fn field_type(&self, name: &str) -> Option<&TypeRef> {
        self.fields()
            .find(|f| f.declarators.iter().any(|d| d.name == name))
            .map(|f| &f.ty)
    }

    /// Value of a `static final` string constant declared in this type.
    pub fn string_constant(&self, name: &str) -> Option<String> {
        self.string_constant_guarded(name, 0)
    }

    fn string_constant_guarded(&self, name: &str, depth: usize) -> Option<String> {
        if depth > 8 {
            return None;
        }
        let initializer = self
            .fields()
            .filter(|f| f.modifiers.is_static && f.modifiers.is_final)
            .flat_map(|f| f.declarators.iter())
            .find(|d| d.name == name)?
            .initializer
            .as_ref()?;
        self.eval_string(initializer, depth + 1)
    }

    fn eval_string(&self, expr: &Expr, depth: usize) -> Option<String> {
        match expr {
            Expr::Str { value, .. } => Some(value.clone()),
            Expr::Name { name, .. } => {
                let simple = name.rsplit('.').next().unwrap_or(name);
                self.string_constant_guarded(simple, depth)
            }
            Expr::Concat(parts) => parts
                .iter()
                .map(|part| self.eval_string(part, depth))
                .collect::<Option<Vec<_>>>()
                .map(|parts| parts.concat()),
            _ => None,
        }
    }

    pub fn annotation(&self, simple_or_qualified: &str) -> Option<&Annotation> {
        find_annotation(&self.annotations, simple_or_qualified)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Constructor(MethodDecl),
    Type(TypeDecl),
}

/// A type as written at a use site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Source text with insignificant whitespace removed (`Map<String,Long>`).
    pub text: String,
    pub span: Span,
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    /// Text without type arguments or array dimensions.
    pub fn base(&self) -> &str {
        let end = self
            .text
            .find(|c| c == '<' || c == '[')
            .unwrap_or(self.text.len());
        self.text[..end].trim()
    }

    pub fn simple_name(&self) -> &str {
        let base = self.base();
        base.rsplit('.').next().unwrap_or(base)
    }

    pub fn is_array(&self) -> bool {
        self.text.ends_with(']')
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Name as written: `Service` or `org.springframework.stereotype.Service`.
    pub name: String,
    pub span: Span,
    pub name_span: Span,
    pub args: Vec<AnnotationArg>,
}

impl Annotation {
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn arg(&self, name: &str) -> Option<&AnnotationArg> {
        self.args.iter().find(|arg| arg.name == name)
    }

    /// Values of the first present attribute among `names`.
    pub fn values(&self, names: &[&str]) -> Vec<&ArgValue> {
        names
            .iter()
            .find_map(|name| self.arg(name))
            .map(|arg| arg.values.iter().collect())
            .unwrap_or_default()
    }
}

pub(crate) fn find_annotation<'a>(
    annotations: &'a [Annotation],
    name: &str,
) -> Option<&'a Annotation> {
    let simple = name.rsplit('.').next().unwrap_or(name);
    annotations
        .iter()
        .find(|a| a.name == name || a.simple_name() == simple)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationArg {
    /// `value` for a single positional argument.
    pub name: String,
    pub span: Span,
    /// One entry for scalars, one per element for `{...}` arrays.
    pub values: Vec<ArgValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgValue {
    pub text: String,
    pub span: Span,
    pub kind: ArgValueKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgValueKind {
    /// Unquoted string literal contents.
    Str(String),
    /// `Foo.class`, holding `Foo`.
    Class(String),
    /// Identifier or qualified name such as `RequestMethod.GET` or a constant.
    Name(String),
    Other,
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ArgValueKind::Str(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub ty: TypeRef,
    pub span: Span,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub declarators: Vec<VarDeclarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: String,
    pub name_span: Span,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub name_span: Span,
    pub span: Span,
    /// `None` for constructors.
    pub return_type: Option<TypeRef>,
    pub params: Vec<Param>,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    /// A body exists in source, whether or not it was interpreted.
    pub has_body: bool,
    /// Interpreted body; only populated by [`ParseMode::Full`].
    pub body: Option<MethodBody>,
}

impl MethodDecl {
    pub fn annotation(&self, simple_or_qualified: &str) -> Option<&Annotation> {
        find_annotation(&self.annotations, simple_or_qualified)
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub name_span: Span,
    pub span: Span,
    pub ty: TypeRef,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodBody {
    pub locals: Vec<LocalVar>,
    /// Every method invocation in the body, in source order (outer calls before the calls
    /// nested in their arguments or receivers).
    pub invocations: Vec<Invocation>,
    pub returns: Vec<Expr>,
}

impl MethodBody {
    pub fn local(&self, name: &str) -> Option<&LocalVar> {
        self.locals.iter().rev().find(|l| l.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalVar {
    pub name: String,
    pub ty: TypeRef,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub receiver: Option<Box<Expr>>,
    pub name: String,
    pub name_span: Span,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str { value: String, span: Span },
    New { ty: TypeRef, span: Span },
    Name { name: String, span: Span },
    Call(Box<Invocation>),
    MethodRef { receiver: String, method: String, span: Span },
    Concat(Vec<Expr>),
    Other { text: String, span: Span },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Str { span, .. }
            | Expr::New { span, .. }
            | Expr::Name { span, .. }
            | Expr::MethodRef { span, .. }
            | Expr::Other { span, .. } => *span,
            Expr::Call(call) => call.span,
            Expr::Concat(parts) => match (parts.first(), parts.last()) {
                (Some(first), Some(last)) => Span::new(first.span().start, last.span().end),
                _ => Span::new(0, 0),
            },
        }
    }

    pub fn as_call(&self) -> Option<&Invocation> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }
}
