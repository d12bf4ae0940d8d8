//! Run report types.

use std::fmt;

use serde::Serialize;

use crate::config::RunMode;
use crate::error::DocumentError;

/// Lint outcome for one document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct DocumentResult {
    /// Document identifier (relative path for files on disk).
    pub id: String,
    /// Problems found, in document order. Empty means the document passed.
    pub errors: Vec<DocumentError>,
}

impl DocumentResult {
    #[must_use]
    pub fn new(id: impl Into<String>, errors: Vec<DocumentError>) -> Self {
        Self {
            id: id.into(),
            errors,
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Final path component of the identifier.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.id.rsplit(['/', '\\']).next().unwrap_or(&self.id)
    }

    /// Whether an expectation entry refers to this document.
    #[must_use]
    pub fn matches(&self, entry: &str) -> bool {
        self.id == entry || self.file_name() == entry
    }
}

/// How an actual result diverged from the configured expectation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiscrepancyKind {
    /// Listed as an expected failure, but the document has no errors.
    ExpectedFailButPassed,
    /// Not listed as an expected failure, but the document has errors.
    ExpectedPassButFailed,
    /// Listed as an expected failure, but no such document was linted.
    ExpectedFailureMissing,
}

impl fmt::Display for DiscrepancyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedFailButPassed => write!(f, "expected fail but passed"),
            Self::ExpectedPassButFailed => write!(f, "expected pass but failed"),
            Self::ExpectedFailureMissing => write!(f, "expected fail but not found"),
        }
    }
}

/// An expectation mismatch; only produced in expectation mode.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct Discrepancy {
    /// Document identifier, or the expectation entry for `ExpectedFailureMissing`.
    pub id: String,
    pub kind: DiscrepancyKind,
}

impl Discrepancy {
    /// Format the discrepancy for human-readable output.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        format!("{}: [expectation mismatch] {}", self.id, self.kind)
    }
}

/// Result of a lint run.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct RunReport {
    /// Mode the verdict was computed in.
    pub mode: RunMode,
    /// Per-document results, in input order.
    pub documents: Vec<DocumentResult>,
    /// Expectation mismatches (always empty in strict mode).
    pub discrepancies: Vec<Discrepancy>,
    /// Overall verdict.
    pub ok: bool,
}

impl RunReport {
    /// Judge `documents` under `mode`.
    #[must_use]
    pub fn judge(mode: &RunMode, documents: Vec<DocumentResult>) -> Self {
        let discrepancies = match mode {
            RunMode::Strict => Vec::new(),
            RunMode::Expectation { expected_failures } => {
                let mut found = Vec::new();
                for doc in &documents {
                    let expected_fail = expected_failures.iter().any(|e| doc.matches(e));
                    let kind = match (expected_fail, doc.has_errors()) {
                        (true, false) => Some(DiscrepancyKind::ExpectedFailButPassed),
                        (false, true) => Some(DiscrepancyKind::ExpectedPassButFailed),
                        _ => None,
                    };
                    if let Some(kind) = kind {
                        found.push(Discrepancy {
                            id: doc.id.clone(),
                            kind,
                        });
                    }
                }
                for entry in expected_failures {
                    if !documents.iter().any(|doc| doc.matches(entry)) {
                        found.push(Discrepancy {
                            id: entry.clone(),
                            kind: DiscrepancyKind::ExpectedFailureMissing,
                        });
                    }
                }
                found
            }
        };

        let ok = match mode {
            RunMode::Strict => !documents.iter().any(DocumentResult::has_errors),
            RunMode::Expectation { .. } => discrepancies.is_empty(),
        };

        Self {
            mode: mode.clone(),
            documents,
            discrepancies,
            ok,
        }
    }

    /// Number of documents linted.
    #[must_use]
    pub fn documents_count(&self) -> usize {
        self.documents.len()
    }

    /// Number of documents with at least one error.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.documents.iter().filter(|d| d.has_errors()).count()
    }

    /// Total number of errors across all documents.
    #[must_use]
    pub fn errors_count(&self) -> usize {
        self.documents.iter().map(|d| d.errors.len()).sum()
    }
}
