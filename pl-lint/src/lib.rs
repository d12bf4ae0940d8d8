//! # pl-lint
//!
//! Linter for PL HTML question files.
//!
//! Every document is checked for well-formed XML and then for structural
//! placement rules; by default `<pl-multiple-choice>` may only appear as the
//! document root. Documents that fail to parse are reported with a single
//! syntax error and never reach the structural rules.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use pl_lint::{FsSourceConfig, RunMode, ValidationConfig, validate_fs};
//!
//! let mut fs_config = FsSourceConfig::default();
//! fs_config.repo_root = PathBuf::from("questions");
//!
//! let mut config = ValidationConfig::default();
//! config.mode = RunMode::expecting(["broken.html"]);
//!
//! let report = validate_fs(&fs_config, &config).unwrap();
//! println!("Documents: {}", report.documents_count());
//! println!("Failed: {}", report.failed_count());
//! println!("OK: {}", report.ok);
//! ```

mod config;
mod error;
pub mod output;
mod report;
mod rules;
mod strategy;
mod syntax;
mod tree;
mod validator;

pub use config::{FsSourceConfig, RunMode, ValidationConfig};
pub use error::{DocumentError, DocumentErrorKind, XmlSyntaxError};
pub use report::{Discrepancy, DiscrepancyKind, DocumentResult, RunReport};
pub use rules::{RESERVED_ROOT_ELEMENT, Rule, check_rules};
pub use tree::{Element, ElementTree, NodeId, Walk};
pub use validator::{validate_document, validate_document_with, validate_run};

use strategy::fs::{document_id, find_documents, read_document};
use tracing::{info, warn};

/// Lint every HTML document under `fs_config.repo_root`.
///
/// # Errors
///
/// Returns an error only if the document collection cannot be enumerated at
/// all (the root does not exist or is not a directory). Unreadable documents
/// are reported as `ReadError` results and fail the run like any other error.
pub fn validate_fs(
    fs_config: &FsSourceConfig,
    config: &ValidationConfig,
) -> anyhow::Result<RunReport> {
    let root = &fs_config.repo_root;
    if !root.exists() {
        anyhow::bail!("Path does not exist: {}", root.display());
    }
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let (files, mut results) = find_documents(fs_config);
    info!(root = %root.display(), files = files.len(), "discovered HTML files");

    for path in &files {
        let id = document_id(root, path);
        match read_document(path, fs_config.max_file_size) {
            Ok(text) => results.push(validator::lint(id, &text, &config.rules)),
            Err(read_error) => {
                warn!(document = %id, "{}", read_error.message);
                results.push(DocumentResult::new(id, vec![read_error]));
            }
        }
    }

    let report = RunReport::judge(&config.mode, results);
    info!(
        mode = report.mode.name(),
        documents = report.documents_count(),
        failed = report.failed_count(),
        ok = report.ok,
        "lint run finished"
    );
    Ok(report)
}
