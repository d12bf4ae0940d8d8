//! Configuration types for a lint run.
//!
//! Split into core validation config (how results are judged) and source
//! config (where documents come from). Nothing here reads the process
//! environment; the CLI folds flags and env vars into these structs.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use crate::rules::Rule;

/// How per-document results are turned into a run verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum RunMode {
    /// Any document with errors fails the run.
    #[default]
    Strict,
    /// Documents listed here must fail and every other document must pass.
    ///
    /// Entries match a document by its full identifier or by its file name.
    Expectation { expected_failures: BTreeSet<String> },
}

impl RunMode {
    /// Build an expectation mode from a list of identifiers, ignoring blank entries.
    #[must_use]
    pub fn expecting<I, S>(expected_failures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Expectation {
            expected_failures: expected_failures
                .into_iter()
                .map(|s| s.as_ref().trim().to_owned())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Short name used in reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Expectation { .. } => "expectation",
        }
    }
}

/// Core validation config, independent of where documents come from.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ValidationConfig {
    /// Strict or expectation mode.
    pub mode: RunMode,
    /// Structural rules applied to every well-formed document.
    pub rules: Vec<Rule>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Strict,
            rules: Rule::default_set(),
        }
    }
}

/// Filesystem discovery options.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct FsSourceConfig {
    /// Directory to search for HTML documents (default: `.`).
    pub repo_root: PathBuf,
    /// Exclude patterns (glob format), matched against the relative path and the file name.
    pub exclude: Vec<String>,
    /// Maximum file size in bytes (default: 10 MB).
    pub max_file_size: u64,
    /// Whether to follow symbolic links (default: `false`).
    pub follow_links: bool,
    /// Maximum directory traversal depth (default: 64).
    pub max_depth: usize,
}

impl Default for FsSourceConfig {
    fn default() -> Self {
        Self {
            repo_root: PathBuf::from("."),
            exclude: Vec::new(),
            max_file_size: 10_485_760,
            follow_links: false,
            max_depth: 64,
        }
    }
}
