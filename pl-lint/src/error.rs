//! Error types for document linting.

use serde::Serialize;
use thiserror::Error;

/// The kind of problem found in a single document.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocumentErrorKind {
    /// The document could not be read (I/O failure, too large, not UTF-8, walk error).
    ReadError,
    /// The document is not well-formed XML.
    SyntaxError,
    /// A reserved element appears somewhere it is not allowed.
    StructuralPlacementError,
}

/// A single problem found in a document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct DocumentError {
    /// What went wrong.
    pub kind: DocumentErrorKind,
    /// Human-readable description of the problem.
    pub message: String,
    /// Line number (1-indexed), 0 when unknown
    pub line: usize,
    /// Column number (1-indexed), 0 when unknown
    pub column: usize,
}

impl DocumentError {
    /// A read failure, which carries no position.
    #[must_use]
    pub fn read(message: impl Into<String>) -> Self {
        Self {
            kind: DocumentErrorKind::ReadError,
            message: message.into(),
            line: 0,
            column: 0,
        }
    }

    #[must_use]
    pub(crate) fn at(kind: DocumentErrorKind, message: String, line: usize, column: usize) -> Self {
        Self {
            kind,
            message,
            line,
            column,
        }
    }

    /// Format the error for human-readable output.
    ///
    /// With a known position: `{line}:{column}: {message}`, otherwise just the message.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        if self.line > 0 && self.column > 0 {
            format!("{}:{}: {}", self.line, self.column, self.message)
        } else {
            self.message.clone()
        }
    }
}

/// The document text is not well-formed XML.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} (line {line}, column {column})")]
pub struct XmlSyntaxError {
    /// Parser message without position.
    pub message: String,
    /// Line number (1-indexed) where the parser stopped.
    pub line: usize,
    /// Column number (1-indexed) where the parser stopped.
    pub column: usize,
}

impl From<XmlSyntaxError> for DocumentError {
    fn from(err: XmlSyntaxError) -> Self {
        Self::at(
            DocumentErrorKind::SyntaxError,
            format!("XML syntax error: {}", err.message),
            err.line,
            err.column,
        )
    }
}
