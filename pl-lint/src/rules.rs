//! Structural rules evaluated over a parsed [`ElementTree`].

use crate::error::{DocumentError, DocumentErrorKind};
use crate::tree::{Element, ElementTree};

/// Tag that may only appear as the document root.
pub const RESERVED_ROOT_ELEMENT: &str = "pl-multiple-choice";

/// A single structural rule.
///
/// Every rule is checked independently against every element, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Rule {
    /// Elements named `tag` must be the document root.
    RootOnly { tag: String },
}

impl Rule {
    #[must_use]
    pub fn root_only(tag: impl Into<String>) -> Self {
        Self::RootOnly { tag: tag.into() }
    }

    /// Rules applied when none are configured explicitly.
    #[must_use]
    pub fn default_set() -> Vec<Self> {
        vec![Self::root_only(RESERVED_ROOT_ELEMENT)]
    }

    /// Returns the violation message if `element` breaks this rule.
    #[must_use]
    pub fn check(&self, element: &Element, is_root: bool) -> Option<String> {
        match self {
            Self::RootOnly { tag } => (!is_root && element.name == *tag)
                .then(|| format!("<{tag}> must be the root element of the document")),
        }
    }
}

/// Evaluate `rules` over the whole tree.
///
/// Returns one `StructuralPlacementError` per violating element per rule.
#[must_use]
pub fn check_rules(tree: &ElementTree, rules: &[Rule]) -> Vec<DocumentError> {
    let mut errors = Vec::new();
    for (element, is_root) in tree.walk() {
        for rule in rules {
            if let Some(message) = rule.check(element, is_root) {
                errors.push(DocumentError::at(
                    DocumentErrorKind::StructuralPlacementError,
                    message,
                    element.line,
                    element.column,
                ));
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str) -> Vec<DocumentError> {
        let tree = ElementTree::parse(text).unwrap();
        check_rules(&tree, &Rule::default_set())
    }

    #[test]
    fn test_reserved_element_at_root_passes() {
        assert!(check("<pl-multiple-choice><pl-answer/></pl-multiple-choice>").is_empty());
    }

    #[test]
    fn test_reserved_element_absent_passes() {
        assert!(check("<div><p>question</p></div>").is_empty());
    }

    #[test]
    fn test_nested_reserved_element_fails() {
        let errors = check("<div>\n  <pl-multiple-choice/>\n</div>");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, DocumentErrorKind::StructuralPlacementError);
        assert_eq!((errors[0].line, errors[0].column), (2, 3));
        assert_eq!(
            errors[0].message,
            "<pl-multiple-choice> must be the root element of the document"
        );
    }

    #[test]
    fn test_every_nested_occurrence_reported() {
        let errors = check(
            "<pl-multiple-choice><div><pl-multiple-choice/></div>\
             <pl-multiple-choice/></pl-multiple-choice>",
        );
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_tag_match_is_exact() {
        assert!(check("<div><pl-multiple-choice-extra/><PL-MULTIPLE-CHOICE/></div>").is_empty());
    }

    #[test]
    fn test_custom_rule_list() {
        let tree = ElementTree::parse("<body><pl-question/><pl-multiple-choice/></body>").unwrap();
        let rules = vec![Rule::root_only("pl-question"), Rule::root_only("pl-multiple-choice")];
        let errors = check_rules(&tree, &rules);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("<pl-question>"));
        assert!(errors[1].message.contains("<pl-multiple-choice>"));
    }

    #[test]
    fn test_no_rules_no_errors() {
        let tree = ElementTree::parse("<div><pl-multiple-choice/></div>").unwrap();
        assert!(check_rules(&tree, &[]).is_empty());
    }
}
