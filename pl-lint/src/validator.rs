//! The document validator: XML well-formedness first, structural rules second.

use tracing::debug;

use crate::config::ValidationConfig;
use crate::error::DocumentError;
use crate::report::{DocumentResult, RunReport};
use crate::rules::{Rule, check_rules};
use crate::tree::ElementTree;

/// Validate one document with the default rule set.
///
/// Malformed XML yields exactly one `SyntaxError` and the structural rules
/// are not evaluated. An empty result means the document passed.
#[must_use]
pub fn validate_document(text: &str) -> Vec<DocumentError> {
    validate_document_with(text, &Rule::default_set())
}

/// Validate one document against an explicit rule set.
#[must_use]
pub fn validate_document_with(text: &str, rules: &[Rule]) -> Vec<DocumentError> {
    match ElementTree::parse(text) {
        Ok(tree) => check_rules(&tree, rules),
        Err(syntax) => vec![syntax.into()],
    }
}

/// Validate in-memory `(identifier, text)` pairs and judge the run.
///
/// Results keep the input order.
#[must_use]
pub fn validate_run<I, K, T>(documents: I, config: &ValidationConfig) -> RunReport
where
    I: IntoIterator<Item = (K, T)>,
    K: Into<String>,
    T: AsRef<str>,
{
    let results = documents
        .into_iter()
        .map(|(id, text)| lint(id.into(), text.as_ref(), &config.rules))
        .collect();
    RunReport::judge(&config.mode, results)
}

pub(crate) fn lint(id: String, text: &str, rules: &[Rule]) -> DocumentResult {
    let errors = validate_document_with(text, rules);
    debug!(document = %id, errors = errors.len(), "validated document");
    DocumentResult::new(id, errors)
}
