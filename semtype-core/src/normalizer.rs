//! Declaration normalizer.
//!
//! Turns one [`Declaration`] into the canonical signature string stored in a
//! snapshot, or drops it when it is not exported. Non-public struct members
//! never reach the signature, so changing them cannot bump anything above a
//! patch.

use crate::diagnostics::Diagnostics;
use crate::render::{render, RenderError};
use crate::snapshot::Partition;
use crate::types::{Declaration, FieldDecl, Fragment, FunctionDecl, TypeBody, TypeDecl};

/// Go's exportedness rule: the identifier starts with an upper-case letter.
///
/// Same predicate as `go/token.IsExported`. For characters that can start a
/// Go identifier, `char::is_uppercase` agrees with Go's `unicode.IsUpper`.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().map(char::is_uppercase).unwrap_or(false)
}

/// A declaration reduced to its public shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDecl {
    /// Snapshot key. Methods are keyed `Receiver.Method`.
    pub name: String,
    pub partition: Partition,
    pub signature: String,
}

/// Normalizes declarations, reporting rendering failures to a sink.
pub struct Normalizer<'a> {
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> Normalizer<'a> {
    pub fn new(diagnostics: &'a dyn Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Normalize one declaration.
    ///
    /// Returns `None` for unexported declarations and for declarations that
    /// fail to render; the latter are reported and otherwise ignored.
    pub fn normalize(&self, decl: &Declaration) -> Option<NormalizedDecl> {
        match try_normalize(decl) {
            Ok(normalized) => normalized,
            Err(e) => {
                self.diagnostics.declaration_skipped(decl.name(), &e);
                None
            }
        }
    }
}

/// Normalize one declaration without a diagnostics sink.
pub fn try_normalize(decl: &Declaration) -> Result<Option<NormalizedDecl>, RenderError> {
    if !is_exported(decl.name()) {
        return Ok(None);
    }

    match decl {
        Declaration::Type(t) => Ok(Some(NormalizedDecl {
            name: t.name.clone(),
            partition: Partition::Type,
            signature: type_signature(t)?,
        })),
        Declaration::Function(f) => {
            let name = match &f.receiver {
                Some(receiver) => format!("{}.{}", receiver.base_type, f.name),
                None => f.name.clone(),
            };
            Ok(Some(NormalizedDecl {
                name,
                partition: Partition::Function,
                signature: function_signature(f)?,
            }))
        }
    }
}

fn render_optional(
    fragment: Option<&Fragment>,
    part: &'static str,
) -> Result<Option<String>, RenderError> {
    fragment.map(|f| render(f, part)).transpose()
}

/// `[T any] struct { A int }`, `= string`, `map[string]int`
fn type_signature(t: &TypeDecl) -> Result<String, RenderError> {
    let mut out = String::new();

    if let Some(params) = render_optional(t.type_params.as_ref(), "type parameters")? {
        out.push_str(&params);
        out.push(' ');
    }
    if t.is_alias {
        out.push_str("= ");
    }

    match &t.body {
        TypeBody::Struct(fields) => out.push_str(&struct_signature(fields)?),
        TypeBody::Other(fragment) => out.push_str(&render(fragment, "type")?),
    }

    Ok(out)
}

/// Public members only, in declaration order.
fn struct_signature(fields: &[FieldDecl]) -> Result<String, RenderError> {
    let mut members = Vec::new();
    for field in fields {
        if let Some(member) = field_signature(field)? {
            members.push(member);
        }
    }

    if members.is_empty() {
        Ok("struct {}".to_string())
    } else {
        Ok(format!("struct {{ {} }}", members.join("; ")))
    }
}

fn field_signature(field: &FieldDecl) -> Result<Option<String>, RenderError> {
    let mut out = if field.names.is_empty() {
        let public = field.embedded.as_deref().map(is_exported).unwrap_or(false);
        if !public {
            return Ok(None);
        }
        render(&field.ty, "embedded field")?
    } else {
        let public: Vec<&str> = field
            .names
            .iter()
            .map(String::as_str)
            .filter(|name| is_exported(name))
            .collect();
        if public.is_empty() {
            return Ok(None);
        }
        format!("{} {}", public.join(", "), render(&field.ty, "field type")?)
    };

    if let Some(tag) = render_optional(field.tag.as_ref(), "field tag")? {
        out.push(' ');
        out.push_str(&tag);
    }

    Ok(Some(out))
}

/// `func[T any](a int) error`, or `(*T) func(a int) error` for methods.
fn function_signature(f: &FunctionDecl) -> Result<String, RenderError> {
    let mut out = String::new();

    if let Some(receiver) = &f.receiver {
        out.push('(');
        out.push_str(&render(&receiver.ty, "receiver")?);
        out.push_str(") ");
    }

    out.push_str("func");
    if let Some(params) = render_optional(f.type_params.as_ref(), "type parameters")? {
        out.push_str(&params);
    }
    out.push_str(&render(&f.params, "parameter list")?);
    if let Some(results) = render_optional(f.results.as_ref(), "result list")? {
        out.push(' ');
        out.push_str(&results);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Diagnostic, MemoryDiagnostics};
    use crate::parser::go;
    use crate::types::{Token, TokenKind};
    use std::path::Path;

    fn normalize_source(source: &str) -> Vec<NormalizedDecl> {
        let parsed = go::parse(source, Path::new("test.go")).unwrap();
        parsed
            .declarations
            .iter()
            .filter_map(|d| try_normalize(d).unwrap())
            .collect()
    }

    fn single(source: &str) -> NormalizedDecl {
        let mut all = normalize_source(source);
        assert_eq!(all.len(), 1, "expected one exported declaration: {:?}", all);
        all.remove(0)
    }

    #[test]
    fn test_is_exported() {
        assert!(is_exported("Exported"));
        assert!(is_exported("Ärger"));
        assert!(!is_exported("helper"));
        assert!(!is_exported("_Hidden"));
        assert!(!is_exported("日本"));
        assert!(!is_exported(""));
    }

    #[test]
    fn test_function_signature() {
        let decl = single("package main\nfunc Exported(a int, b ...string) (int, error) { return 0, nil }\n");
        assert_eq!(decl.name, "Exported");
        assert_eq!(decl.partition, Partition::Function);
        assert_eq!(decl.signature, "func(a int, b ...string) (int, error)");
    }

    #[test]
    fn test_generic_function_signature() {
        let decl = single("package main\nfunc Map[T any, U any](xs []T, f func(T) U) []U { return nil }\n");
        assert_eq!(decl.signature, "func[T any, U any](xs []T, f func(T) U) []U");
    }

    #[test]
    fn test_method_keyed_by_receiver() {
        let all = normalize_source(
            "package main\ntype Test struct{}\nfunc (t *Test) Exported(x int) error { return nil }\nfunc (t Test) hidden() {}\n",
        );
        assert_eq!(all.len(), 2);
        let method = &all[1];
        assert_eq!(method.name, "Test.Exported");
        assert_eq!(method.partition, Partition::Function);
        assert_eq!(method.signature, "(*Test) func(x int) error");
    }

    #[test]
    fn test_receiver_name_does_not_matter() {
        let a = single("package main\nfunc (t *Test) Do() {}\n");
        let b = single("package main\nfunc (self *Test) Do() {}\n");
        assert_eq!(a, b);
    }

    #[test]
    fn test_struct_keeps_only_public_fields() {
        let decl = single(
            "package main\ntype Test struct {\n\tname string\n\tName string `json:\"name\"`\n\tA, b int\n\tage int\n\t*Base\n\tinner\n}\n",
        );
        assert_eq!(decl.partition, Partition::Type);
        assert_eq!(
            decl.signature,
            "struct { Name string `json:\"name\"`; A int; *Base }"
        );
    }

    #[test]
    fn test_private_fields_do_not_change_signature() {
        let a = single("package main\ntype Test struct{}");
        let b = single("package main\ntype Test struct{name string}");
        assert_eq!(a.signature, "struct {}");
        assert_eq!(a, b);
    }

    #[test]
    fn test_formatting_and_comments_are_ignored() {
        let compact = single("package main\ntype Test struct{Name string; Age int}\nfunc helper() {}\n");
        let spread = single(
            "package main\n\n// Test is documented.\ntype Test struct {\n\tName   string // the name\n\n\tAge int\n}\n",
        );
        assert_eq!(compact, spread);
    }

    #[test]
    fn test_public_changes_alter_signature() {
        let a = single("package main\ntype Test struct{Name string}");
        let b = single("package main\ntype Test struct{Name int}");
        assert_ne!(a.signature, b.signature);

        let a = single("package main\nfunc Exported(a int) {}");
        let b = single("package main\nfunc Exported(b int) {}");
        assert_ne!(a.signature, b.signature);
    }

    #[test]
    fn test_other_type_kinds() {
        let all = normalize_source(
            "package main\ntype (\n\tID int\n\tNames = []string\n\tStore interface {\n\t\tGet(key string) (string, bool)\n\t\tPut(key, value string)\n\t}\n\tList[T any] struct { Items []T; size int }\n)\n",
        );
        let sigs: Vec<(&str, &str)> = all
            .iter()
            .map(|d| (d.name.as_str(), d.signature.as_str()))
            .collect();
        assert_eq!(
            sigs,
            vec![
                ("ID", "int"),
                ("Names", "= []string"),
                (
                    "Store",
                    "interface { Get(key string) (string, bool); Put(key, value string) }"
                ),
                ("List", "[T any] struct { Items []T }"),
            ]
        );
    }

    #[test]
    fn test_interface_layouts_are_equivalent() {
        let one_line = single("package main\ntype Store interface { Get(key string) string; Close() error }\n");
        let gofmt = single(
            "package main\ntype Store interface {\n\tGet(key string) string // lookup\n\n\tClose() error\n}\n",
        );
        assert_eq!(one_line, gofmt);
        assert_eq!(
            gofmt.signature,
            "interface { Get(key string) string; Close() error }"
        );
    }

    #[test]
    fn test_nested_struct_layouts_are_equivalent() {
        let one_line = single("package main\ntype Config struct { Limits struct { Max int; Min int } }\n");
        let gofmt = single(
            "package main\ntype Config struct {\n\tLimits struct {\n\t\tMax int\n\t\tMin int\n\t}\n}\n",
        );
        assert_eq!(one_line, gofmt);
        assert_eq!(
            gofmt.signature,
            "struct { Limits struct { Max int; Min int } }"
        );
    }

    #[test]
    fn test_nested_field_boundaries_stay_distinct() {
        let named_then_embedded = single(
            "package main\ntype Config struct {\n\tInner struct {\n\t\tA B\n\t\tC\n\t}\n}\n",
        );
        let embedded_then_named = single(
            "package main\ntype Config struct {\n\tInner struct {\n\t\tA\n\t\tB C\n\t}\n}\n",
        );
        assert_ne!(named_then_embedded.signature, embedded_then_named.signature);
        assert_eq!(
            named_then_embedded.signature,
            "struct { Inner struct { A B; C } }"
        );
        assert_eq!(
            embedded_then_named.signature,
            "struct { Inner struct { A; B C } }"
        );
    }

    #[test]
    fn test_unexported_declarations_are_dropped() {
        assert!(normalize_source("package main\ntype test struct{Name string}\nfunc helper() {}\n").is_empty());
    }

    #[test]
    fn test_render_failure_is_reported_and_skipped() {
        let decl = Declaration::Function(FunctionDecl {
            name: "Broken".to_string(),
            receiver: None,
            type_params: None,
            params: Fragment::new(vec![Token::new(TokenKind::Invalid, "(")]),
            results: None,
        });

        let diagnostics = MemoryDiagnostics::new();
        let normalizer = Normalizer::new(&diagnostics);
        assert!(normalizer.normalize(&decl).is_none());

        let events = diagnostics.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            Diagnostic::DeclarationSkipped { name, .. } if name == "Broken"
        ));
    }
}
