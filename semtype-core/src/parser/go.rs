//! Go declaration extractor using tree-sitter.

use std::path::Path;
use tree_sitter::{Node, Parser};

use super::helpers::{
    find_child_by_type, find_error_node, fragment_of, get_node_text, get_start_line,
    TokenCollector,
};
use crate::error::{Result, SemtypeError};
use crate::types::{
    Declaration, FieldDecl, FunctionDecl, ParsedFile, Receiver, TypeBody, TypeDecl,
};

/// Parse Go source code into its tracked top-level declarations.
///
/// A file containing any syntax error is rejected as a whole.
pub fn parse(source: &str, file_path: &Path) -> Result<ParsedFile> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_go::LANGUAGE.into())?;

    let tree = parser.parse(source, None).ok_or_else(|| SemtypeError::Parse {
        path: file_path.to_path_buf(),
        line: 1,
        message: "Failed to parse Go source".to_string(),
    })?;
    let root = tree.root_node();

    if let Some(bad) = find_error_node(&root) {
        let message = if bad.is_missing() {
            format!("missing {}", bad.kind())
        } else {
            format!("syntax error near `{}`", first_line(get_node_text(&bad, source)))
        };
        return Err(SemtypeError::Parse {
            path: file_path.to_path_buf(),
            line: get_start_line(&bad),
            message,
        });
    }

    let mut parsed = ParsedFile {
        path: file_path.to_path_buf(),
        ..Default::default()
    };

    // Process top-level declarations
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "package_clause" => {
                if let Some(id) = find_child_by_type(&child, "package_identifier") {
                    parsed.package = Some(get_node_text(&id, source).to_string());
                }
            }
            "function_declaration" => {
                if let Some(decl) = extract_function(&child, source) {
                    parsed.declarations.push(decl);
                }
            }
            "method_declaration" => {
                if let Some(decl) = extract_method(&child, source) {
                    parsed.declarations.push(decl);
                }
            }
            "type_declaration" => {
                extract_type_declarations(&child, source, &mut parsed.declarations);
            }
            // const, var and import declarations are not versioned
            _ => {}
        }
    }

    Ok(parsed)
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

/// Extract a function declaration. The body is never looked at.
fn extract_function(node: &Node, source: &str) -> Option<Declaration> {
    let name = node.child_by_field_name("name")?;
    let params = node.child_by_field_name("parameters")?;

    Some(Declaration::Function(FunctionDecl {
        name: get_node_text(&name, source).to_string(),
        receiver: None,
        type_params: node
            .child_by_field_name("type_parameters")
            .map(|n| fragment_of(&n, source)),
        params: fragment_of(&params, source),
        results: node
            .child_by_field_name("result")
            .map(|n| fragment_of(&n, source)),
    }))
}

/// Extract a method declaration (function with receiver).
fn extract_method(node: &Node, source: &str) -> Option<Declaration> {
    let name = node.child_by_field_name("name")?;
    let params = node.child_by_field_name("parameters")?;
    let receiver = node
        .child_by_field_name("receiver")
        .and_then(|list| extract_receiver(&list, source))?;

    Some(Declaration::Function(FunctionDecl {
        name: get_node_text(&name, source).to_string(),
        receiver: Some(receiver),
        type_params: None,
        params: fragment_of(&params, source),
        results: node
            .child_by_field_name("result")
            .map(|n| fragment_of(&n, source)),
    }))
}

/// Extract the receiver type from a method's receiver parameter list.
///
/// The receiver identifier is discarded: callers never see it.
fn extract_receiver(list: &Node, source: &str) -> Option<Receiver> {
    let param = find_child_by_type(list, "parameter_declaration")?;
    let ty = param.child_by_field_name("type")?;

    let base_type = base_type_name(&ty, source)
        .unwrap_or_else(|| get_node_text(&ty, source).to_string());

    Some(Receiver {
        base_type,
        ty: fragment_of(&ty, source),
    })
}

/// Name of the named type underneath pointers, parentheses, qualifiers and
/// type arguments: `*pkg.List[T]` -> `List`.
fn base_type_name(node: &Node, source: &str) -> Option<String> {
    match node.kind() {
        "type_identifier" => Some(get_node_text(node, source).to_string()),
        "qualified_type" => node
            .child_by_field_name("name")
            .map(|n| get_node_text(&n, source).to_string()),
        "generic_type" => node
            .child_by_field_name("type")
            .and_then(|n| base_type_name(&n, source)),
        "pointer_type" | "parenthesized_type" => {
            let mut cursor = node.walk();
            let inner = node.named_children(&mut cursor).next()?;
            base_type_name(&inner, source)
        }
        _ => None,
    }
}

/// Extract every spec of a (possibly grouped) type declaration.
fn extract_type_declarations(node: &Node, source: &str, out: &mut Vec<Declaration>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let is_alias = match child.kind() {
            "type_spec" => false,
            "type_alias" => true,
            _ => continue,
        };
        if let Some(decl) = extract_type_spec(&child, source, is_alias) {
            out.push(Declaration::Type(decl));
        }
    }
}

/// Extract a single type specification.
fn extract_type_spec(node: &Node, source: &str, is_alias: bool) -> Option<TypeDecl> {
    let name = node.child_by_field_name("name")?;
    let ty = node.child_by_field_name("type")?;

    let body = if ty.kind() == "struct_type" && !is_alias {
        TypeBody::Struct(extract_struct_fields(&ty, source))
    } else {
        TypeBody::Other(fragment_of(&ty, source))
    };

    Some(TypeDecl {
        name: get_node_text(&name, source).to_string(),
        type_params: node
            .child_by_field_name("type_parameters")
            .map(|n| fragment_of(&n, source)),
        is_alias,
        body,
    })
}

/// Extract struct fields in declaration order.
fn extract_struct_fields(node: &Node, source: &str) -> Vec<FieldDecl> {
    let mut fields = Vec::new();

    let Some(list) = find_child_by_type(node, "field_declaration_list") else {
        return fields;
    };

    let mut cursor = list.walk();
    for field in list.children(&mut cursor) {
        if field.kind() == "field_declaration" {
            fields.push(extract_field(&field, source));
        }
    }

    fields
}

/// Extract one field declaration line.
fn extract_field(node: &Node, source: &str) -> FieldDecl {
    let mut cursor = node.walk();
    let names: Vec<String> = node
        .children_by_field_name("name", &mut cursor)
        .map(|n| get_node_text(&n, source).to_string())
        .collect();

    let tag = node
        .child_by_field_name("tag")
        .map(|n| fragment_of(&n, source));

    if names.is_empty() {
        // Embedded field: the optional `*` is a sibling of the type node
        let embedded = node
            .child_by_field_name("type")
            .and_then(|n| base_type_name(&n, source));
        let mut collector = TokenCollector::new(source);
        collector.collect_children_except(node, "tag");
        FieldDecl {
            names,
            embedded,
            ty: collector.finish(),
            tag,
        }
    } else {
        FieldDecl {
            names,
            embedded: None,
            ty: node
                .child_by_field_name("type")
                .map(|n| fragment_of(&n, source))
                .unwrap_or_default(),
            tag,
        }
    }
}
