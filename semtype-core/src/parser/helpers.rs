//! Helper functions for tree-sitter AST navigation.

use tree_sitter::Node;

use crate::types::{Fragment, Token, TokenKind};

/// Node kinds whose full text is one literal token.
const LITERAL_KINDS: &[&str] = &[
    "interpreted_string_literal",
    "raw_string_literal",
    "rune_literal",
    "int_literal",
    "float_literal",
    "imaginary_literal",
];

/// Get the text content of a node.
pub fn get_node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    let start = node.start_byte();
    let end = node.end_byte();
    if start < source.len() && end <= source.len() && start < end {
        &source[start..end]
    } else {
        ""
    }
}

/// Find the first child of a specific type.
#[allow(clippy::manual_find)]
pub fn find_child_by_type<'a>(node: &Node<'a>, type_name: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == type_name {
            return Some(child);
        }
    }
    None
}

/// Get line number (1-indexed) from a node.
pub fn get_start_line(node: &Node) -> u32 {
    node.start_position().row as u32 + 1
}

/// Find the first `ERROR` or `MISSING` node in a subtree.
pub fn find_error_node<'a>(node: &Node<'a>) -> Option<Node<'a>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_error_node(&child) {
            return Some(found);
        }
    }
    None
}

/// Member lists whose entries are separated by terminators in the source.
const MEMBER_LISTS: &[&str] = &["interface_type", "field_declaration_list"];

/// Entries of a member list.
const MEMBER_KINDS: &[&str] = &[
    "method_elem",
    "method_spec",
    "type_elem",
    "constraint_elem",
    "struct_elem",
    "field_declaration",
];

/// Whether a child in `field` of a `parent` node is separated from the
/// preceding identifier by a space (`a []int`, `func() (int, error)`).
fn is_spaced_field(parent: &str, field: Option<&str>) -> bool {
    matches!(
        (parent, field),
        (
            "parameter_declaration" | "variadic_parameter_declaration" | "field_declaration",
            Some("type")
        ) | (
            "function_type" | "method_elem" | "method_spec" | "function_declaration"
                | "method_declaration",
            Some("result")
        )
    )
}

/// Lowers a syntax subtree into its token sequence.
///
/// Comments and source terminators are dropped. Members of interfaces and
/// struct field lists get exactly one `;` between them, whatever the
/// layout. Error or missing nodes become [`TokenKind::Invalid`] tokens.
pub struct TokenCollector<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    pending_space: bool,
}

impl<'s> TokenCollector<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            pending_space: false,
        }
    }

    pub fn finish(self) -> Fragment {
        Fragment::new(self.tokens)
    }

    /// Collect a whole node.
    pub fn collect(&mut self, node: &Node) {
        let kind = node.kind();

        if kind == "comment" {
            return;
        }

        if node.is_error() || node.is_missing() {
            let text = get_node_text(node, self.source);
            let text = if text.is_empty() { kind } else { text };
            self.push(TokenKind::Invalid, text.to_string());
            return;
        }

        if LITERAL_KINDS.contains(&kind) {
            let text = get_node_text(node, self.source).to_string();
            self.push(TokenKind::Literal, text);
            return;
        }

        if node.child_count() == 0 {
            self.push_leaf(node);
            return;
        }

        let separates_members = MEMBER_LISTS.contains(&kind);
        let mut seen_member = false;

        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                if separates_members && MEMBER_KINDS.contains(&cursor.node().kind()) {
                    if seen_member {
                        self.push(TokenKind::Punct, ";".to_string());
                    }
                    seen_member = true;
                }
                if is_spaced_field(kind, cursor.field_name()) {
                    self.pending_space = true;
                }
                let child = cursor.node();
                self.collect(&child);
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
    }

    /// Collect every child of `node` except those in `skip_field`.
    pub fn collect_children_except(&mut self, node: &Node, skip_field: &str) {
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                if cursor.field_name() != Some(skip_field) {
                    let child = cursor.node();
                    self.collect(&child);
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
    }

    fn push_leaf(&mut self, node: &Node) {
        let kind = node.kind();
        if kind == "\n" || kind == ";" {
            return;
        }

        let text = get_node_text(node, self.source);
        if text.is_empty() {
            // Zero-width tokens (implicit terminators at EOF) carry nothing.
            return;
        }

        let is_word = text
            .chars()
            .next()
            .map(|c| c.is_alphabetic() || c == '_')
            .unwrap_or(false);
        let token_kind = if is_word {
            TokenKind::Word
        } else {
            TokenKind::Punct
        };
        self.push(token_kind, text.to_string());
    }

    fn push(&mut self, kind: TokenKind, text: String) {
        let mut token = Token::new(kind, text);
        token.spaced = std::mem::take(&mut self.pending_space);
        self.tokens.push(token);
    }
}

/// Collect a node into a standalone fragment.
pub fn fragment_of(node: &Node, source: &str) -> Fragment {
    let mut collector = TokenCollector::new(source);
    collector.collect(node);
    collector.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn test_get_node_text() {
        let source = "package main\n";
        let tree = parse(source);
        let clause = find_child_by_type(&tree.root_node(), "package_clause").unwrap();
        assert_eq!(get_node_text(&clause, source), "package main");
        assert_eq!(get_start_line(&clause), 1);
    }

    #[test]
    fn test_collector_drops_comments() {
        let source = "package main\ntype T map[string] /* values */ int\n";
        let tree = parse(source);
        let decl = find_child_by_type(&tree.root_node(), "type_declaration").unwrap();
        let fragment = fragment_of(&decl, source);
        let texts: Vec<&str> = fragment.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["type", "T", "map", "[", "string", "]", "int"]);
    }

    fn texts_of(source: &str) -> Vec<String> {
        let tree = parse(source);
        let decl = find_child_by_type(&tree.root_node(), "type_declaration").unwrap();
        fragment_of(&decl, source)
            .tokens
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_collector_separates_members_once() {
        let one_line = texts_of("package main\ntype I interface { M(); N() }\n");
        let multi_line = texts_of(
            "package main\ntype I interface {\n\tM() // first\n\n\tN()\n}\n",
        );
        assert_eq!(one_line, multi_line);
        assert_eq!(
            multi_line,
            vec!["type", "I", "interface", "{", "M", "(", ")", ";", "N", "(", ")", "}"]
        );

        let fields = texts_of("package main\ntype S struct {\n\tA B\n\tC\n}\n");
        assert_eq!(fields, vec!["type", "S", "struct", "{", "A", "B", ";", "C", "}"]);
    }

    #[test]
    fn test_find_error_node() {
        let source = "package main\nfunc (\n";
        let tree = parse(source);
        assert!(find_error_node(&tree.root_node()).is_some());

        let source = "package main\nfunc F() {}\n";
        let tree = parse(source);
        assert!(find_error_node(&tree.root_node()).is_none());
    }
}
