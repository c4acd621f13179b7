//! Source parsing.
//!
//! Lowers Go source files into the closed [`Declaration`] model using the
//! tree-sitter Go grammar. Files are parsed one after another; a syntax
//! error anywhere fails the whole batch, there is no partial result.
//!
//! [`Declaration`]: crate::types::Declaration

use crate::error::Result;
use crate::types::{ParsedFile, SourceFile};

pub mod go;

mod helpers;

/// File extension of the sources this crate understands.
pub const GO_EXTENSION: &str = "go";

/// Parse a single file from source.
pub fn parse_source(file: &SourceFile) -> Result<ParsedFile> {
    go::parse(&file.source, &file.path)
}

/// Parse every file, stopping at the first failure.
pub fn parse_files(files: &[SourceFile]) -> Result<Vec<ParsedFile>> {
    files.iter().map(parse_source).collect()
}
