//! Data models for parsed declarations.
//!
//! The extractor in [`crate::parser`] lowers a tree-sitter tree into this
//! closed model; everything downstream (normalizer, snapshot builder) only
//! ever sees these types. Comments and whitespace are already gone at this
//! level: a [`Fragment`] is the ordered list of meaningful tokens of one
//! subtree.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Lexical class of a [`Token`], used by the renderer to decide spacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Identifiers and keywords.
    Word,
    /// Operators and delimiters.
    Punct,
    /// String, rune and number literals (struct tags, array lengths).
    Literal,
    /// A syntax error or a node the grammar had to invent.
    Invalid,
}

/// A single leaf of the syntax tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Set when the grammar puts this token in a position that is always
    /// separated from a preceding name, such as a parameter's type.
    #[serde(default)]
    pub spaced: bool,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            spaced: false,
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Word, text)
    }

    pub fn punct(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Punct, text)
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Literal, text)
    }
}

/// The token sequence of one syntax subtree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub tokens: Vec<Token>,
}

impl Fragment {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// One field line of a struct type.
///
/// `A, b int` is a single field declaration with two names; an embedded
/// field (`io.Reader`, `*Base`) has no names and carries the base name of
/// the embedded type instead.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub names: Vec<String>,
    pub embedded: Option<String>,
    pub ty: Fragment,
    pub tag: Option<Fragment>,
}

/// Body of a named type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeBody {
    /// A struct literal type; members are filtered by visibility.
    Struct(Vec<FieldDecl>),
    /// Any other type expression, rendered in full.
    Other(Fragment),
}

/// A `type` declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub type_params: Option<Fragment>,
    /// `type A = B`
    pub is_alias: bool,
    pub body: TypeBody,
}

/// The receiver of a method declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receiver {
    /// Receiver type name without pointer or type arguments (`T` for `*T[K]`).
    pub base_type: String,
    /// Full receiver type as written (`*T[K]`).
    pub ty: Fragment,
}

/// A function or method declaration. Bodies are never captured.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub receiver: Option<Receiver>,
    pub type_params: Option<Fragment>,
    pub params: Fragment,
    pub results: Option<Fragment>,
}

/// A top-level declaration the analyzer tracks.
///
/// Constants, variables and imports are not part of the model; the
/// extractor drops them before they get here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Declaration {
    Type(TypeDecl),
    Function(FunctionDecl),
}

impl Declaration {
    /// Declared identifier (the method name for methods).
    pub fn name(&self) -> &str {
        match self {
            Declaration::Type(t) => &t.name,
            Declaration::Function(f) => &f.name,
        }
    }
}

/// A source file read from disk.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub source: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Result of parsing one file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParsedFile {
    pub path: PathBuf,
    /// Name from the `package` clause, if present.
    pub package: Option<String>,
    pub declarations: Vec<Declaration>,
}
