//! Filesystem document source.
//!
//! Discovers HTML documents under the repository root and reads them for
//! the validator. Properties enforced here:
//! - `.git` metadata directories are never entered
//! - Symlinks are not followed by default (`follow_links: false`)
//! - Maximum directory depth is enforced
//! - Reads are bounded by `max_file_size`

use std::io::Read;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::FsSourceConfig;
use crate::error::DocumentError;
use crate::report::DocumentResult;

/// Directories to skip
pub const SKIP_DIRS: &[&str] = &[".git"];

/// Check if a path matches any of the exclude patterns
fn matches_exclude(relative: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = relative.to_string_lossy();
    exclude_patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || relative
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
    })
}

/// Returns `true` if the entry should be **included** (i.e., is NOT a skip dir).
fn is_not_skip_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() > 0
        && entry.file_type().is_dir()
        && let Some(name) = entry.file_name().to_str()
    {
        return !SKIP_DIRS.contains(&name);
    }
    true
}

/// Check if file has an HTML extension (`.html` or `.HTML`).
fn is_html(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("html" | "HTML")
    )
}

/// Identifier for a discovered file: its path relative to the root, `/`-separated.
///
/// The root itself is identified by its displayed path.
#[must_use]
pub fn document_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    if relative.as_os_str().is_empty() {
        return root.display().to_string();
    }
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Find all HTML documents under `config.repo_root`.
///
/// Returns `(files, failures)`:
/// - `files`: sorted, deduplicated paths ready to read.
/// - `failures`: `ReadError` results for walk errors and invalid exclude patterns.
///   These are never silently discarded and fail the run like any other error.
#[must_use]
pub fn find_documents(config: &FsSourceConfig) -> (Vec<PathBuf>, Vec<DocumentResult>) {
    let mut files = Vec::new();
    let mut failures = Vec::new();
    let root = &config.repo_root;

    let mut exclude_patterns = Vec::with_capacity(config.exclude.len());
    for pat_str in &config.exclude {
        match Pattern::new(pat_str) {
            Ok(pat) => exclude_patterns.push(pat),
            Err(e) => failures.push(DocumentResult::new(
                pat_str.clone(),
                vec![DocumentError::read(format!(
                    "Invalid exclude glob pattern '{pat_str}': {e}"
                ))],
            )),
        }
    }

    for entry_result in WalkDir::new(root)
        .follow_links(config.follow_links)
        .max_depth(config.max_depth)
        .into_iter()
        .filter_entry(is_not_skip_dir)
    {
        let entry = match entry_result {
            Ok(e) => e,
            Err(walk_err) => {
                let path = walk_err.path().map_or_else(|| root.clone(), Path::to_path_buf);
                warn!(path = %path.display(), "directory traversal error: {walk_err}");
                failures.push(DocumentResult::new(
                    document_id(root, &path),
                    vec![DocumentError::read(format!(
                        "Directory traversal error: {walk_err}"
                    ))],
                ));
                continue;
            }
        };

        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        if !is_html(file_path) {
            continue;
        }

        let relative = file_path.strip_prefix(root).unwrap_or(file_path);
        if matches_exclude(relative, &exclude_patterns) {
            debug!(path = %relative.display(), "excluded");
            continue;
        }

        files.push(file_path.to_path_buf());
    }

    files.sort();
    files.dedup();
    (files, failures)
}

/// Read a document using a bounded read, enforcing `max_file_size`.
///
/// # Errors
///
/// Returns a `ReadError` if the file cannot be opened or read, exceeds
/// `max_file_size`, or is not valid UTF-8.
pub fn read_document(path: &Path, max_file_size: u64) -> Result<String, DocumentError> {
    let file = std::fs::File::open(path)
        .map_err(|e| DocumentError::read(format!("Failed to open file: {e}")))?;

    // Read at most max_file_size + 1 bytes to detect oversized files
    let mut buffer = Vec::new();
    file.take(max_file_size.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(|e| DocumentError::read(format!("Failed to read file: {e}")))?;

    if buffer.len() as u64 > max_file_size {
        return Err(DocumentError::read(format!(
            "File exceeds maximum size of {max_file_size} bytes"
        )));
    }

    String::from_utf8(buffer).map_err(|_| DocumentError::read("File is not valid UTF-8"))
}
