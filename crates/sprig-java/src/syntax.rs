//! Thin tree-sitter plumbing.

use std::cell::RefCell;

use sprig_core::Span;
use tree_sitter::{Node, Parser, Tree};

use crate::ParseError;

thread_local! {
    static JAVA_PARSER: RefCell<Result<Parser, String>> = RefCell::new({
        let mut parser = Parser::new();
        match parser.set_language(tree_sitter_java::language()) {
            Ok(()) => Ok(parser),
            Err(_) => Err("tree-sitter-java language load failed".to_string()),
        }
    });
}

pub(crate) fn parse_java(source: &str) -> Result<Tree, ParseError> {
    JAVA_PARSER.with(|parser_cell| {
        let mut parser = parser_cell
            .try_borrow_mut()
            .map_err(|_| ParseError::ParserBusy)?;
        let parser = match parser.as_mut() {
            Ok(parser) => parser,
            Err(err) => return Err(ParseError::Language(err.clone())),
        };

        parser.parse(source, None).ok_or(ParseError::NoTree)
    })
}

/// Visit a node and all its descendants in pre-order.
pub(crate) fn visit_nodes<'a, F: FnMut(Node<'a>)>(node: Node<'a>, f: &mut F) {
    f(node);
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        visit_nodes(child, f);
    }
}

pub(crate) fn find_named_child<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let result = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == kind);
    result
}

pub(crate) fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node.named_children(&mut cursor).collect();
    children
}

pub(crate) fn modifier_node(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("modifiers")
        .or_else(|| find_named_child(node, "modifiers"))
}

pub(crate) fn node_text<'a>(source: &'a str, node: Node<'_>) -> &'a str {
    &source[node.byte_range()]
}

pub(crate) fn span(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

/// Type text with whitespace dropped around `<`, `>`, `,`, `[` and `]` and collapsed elsewhere.
pub(crate) fn compact_type_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    let chars: Vec<char> = collapsed.chars().collect();
    for (idx, &ch) in chars.iter().enumerate() {
        if ch == ' ' {
            let prev = idx.checked_sub(1).map(|i| chars[i]);
            let next = chars.get(idx + 1).copied();
            let tight = |c: Option<char>| matches!(c, Some('<' | '>' | ',' | '[' | ']'));
            if tight(prev) || tight(next) {
                continue;
            }
        }
        out.push(ch);
    }
    out
}

/// Strip quotes from a Java string literal (including text blocks). Escapes are kept.
pub(crate) fn unquote(text: &str) -> String {
    let text = text.trim();
    if let Some(inner) = text
        .strip_prefix("\"\"\"")
        .and_then(|rest| rest.strip_suffix("\"\"\""))
    {
        return inner.trim().to_string();
    }
    text.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(text)
        .to_string()
}
