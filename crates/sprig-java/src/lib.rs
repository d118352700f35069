//! Java front end for the indexer.
//!
//! [`parse_unit`] turns source text into an owned declaration model ([`JavaUnit`]) using
//! `tree-sitter-java`. [`TypeIndex`] resolves the names written in those units to qualified
//! names and answers "which annotations sit on this type?" for the annotation closure engine.

mod library;
mod lower;
mod model;
pub mod names;
mod scope;
mod syntax;
mod types;

pub use lower::parse_unit;
pub use model::{
    Annotation, AnnotationArg, ArgValue, ArgValueKind, Expr, FieldDecl, Import, Invocation,
    JavaUnit, LocalVar, Member, MethodBody, MethodDecl, Modifiers, Param, ParseMode, TypeDecl,
    TypeKind, TypeRef, VarDeclarator,
};
pub use scope::ImportScope;
pub use types::TypeIndex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("tree-sitter parser is already in use on this thread")]
    ParserBusy,
    #[error("{0}")]
    Language(String),
    #[error("tree-sitter failed to produce a syntax tree")]
    NoTree,
}

/// Java bean naming: `CustomerService` -> `customerService`, but `URLService` stays as is.
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some_and(char::is_uppercase) && first.is_uppercase() {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len());
    out.extend(first.to_lowercase());
    out.push_str(&name[first.len_utf8()..]);
    out
}
