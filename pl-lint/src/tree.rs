//! Element tree built from the `quick-xml` event stream.
//!
//! Only elements are kept: the structural rules look at tag names and
//! nesting, nothing else. Text, attribute values and CDATA are still read
//! and unescaped so that malformed content is rejected as a syntax error.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::XmlSyntaxError;
use crate::syntax;

/// Index of a node inside an [`ElementTree`].
pub type NodeId = usize;

/// A single element of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name exactly as written (prefix included).
    pub name: String,
    /// Line of the start tag (1-indexed).
    pub line: usize,
    /// Column of the start tag (1-indexed).
    pub column: usize,
    /// Child elements in document order.
    pub children: Vec<NodeId>,
}

/// Arena of elements; node `0` is the document root.
#[derive(Debug, Clone)]
pub struct ElementTree {
    nodes: Vec<Element>,
}

impl ElementTree {
    /// Parse `text` as a well-formed XML document.
    ///
    /// # Errors
    ///
    /// Returns an [`XmlSyntaxError`] for a document that is not well-formed:
    /// mismatched or unclosed tags, invalid element or attribute names,
    /// malformed or unseparated attributes, `<` in attribute values, `]]>` in
    /// text, `--` in comments, unbound namespace prefixes, undefined entities
    /// (predefined ones and literal entities from the DOCTYPE internal subset
    /// are known), a missing root, a misplaced DOCTYPE or XML declaration, or
    /// content after the root element.
    pub fn parse(text: &str) -> Result<Self, XmlSyntaxError> {
        TreeBuilder::new(text).build()
    }

    /// The document root.
    #[must_use]
    pub fn root(&self) -> &Element {
        // A tree is only ever constructed with at least one element.
        &self.nodes[0]
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id)
    }

    /// Number of elements in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order traversal yielding each element with its "is root" flag.
    ///
    /// Uses an explicit stack, so arbitrarily deep documents are safe.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![(0, true)],
        }
    }
}

/// Iterator returned by [`ElementTree::walk`].
pub struct Walk<'a> {
    tree: &'a ElementTree,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a Element, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, is_root) = self.stack.pop()?;
        let element = self.tree.get(id)?;
        self.stack
            .extend(element.children.iter().rev().map(|&child| (child, false)));
        Some((element, is_root))
    }
}

struct TreeBuilder<'t> {
    text: &'t str,
    reader: Reader<&'t [u8]>,
    nodes: Vec<Element>,
    open: Vec<NodeId>,
    /// Namespace prefixes declared on each open element, innermost last.
    scopes: Vec<Vec<String>>,
    /// Entities declared in the DOCTYPE internal subset.
    entities: HashMap<String, String>,
    root_closed: bool,
}

impl<'t> TreeBuilder<'t> {
    fn new(text: &'t str) -> Self {
        let mut reader = Reader::from_str(text);
        let config = reader.config_mut();
        config.check_end_names = true;
        config.expand_empty_elements = false;

        Self {
            text,
            reader,
            nodes: Vec::new(),
            open: Vec::new(),
            scopes: Vec::new(),
            entities: HashMap::new(),
            root_closed: false,
        }
    }

    fn build(mut self) -> Result<ElementTree, XmlSyntaxError> {
        let mut first_event = true;

        loop {
            let offset = self.reader.buffer_position();
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    let at = self.reader.error_position();
                    return Err(self.error_at(at, e.to_string()));
                }
            };

            match event {
                Event::Start(ref tag) => {
                    let id = self.open_element(tag, offset)?;
                    self.open.push(id);
                }
                Event::Empty(ref tag) => {
                    self.open_element(tag, offset)?;
                    self.scopes.pop();
                    if self.open.is_empty() {
                        self.root_closed = true;
                    }
                }
                Event::End(_) => {
                    // quick-xml has already matched the end name against the open tag.
                    self.open.pop();
                    self.scopes.pop();
                    if self.open.is_empty() {
                        self.root_closed = true;
                    }
                }
                Event::Text(ref content) => {
                    if self.open.is_empty() {
                        if !content.iter().all(u8::is_ascii_whitespace) {
                            return Err(self.outside_root(offset));
                        }
                    } else if syntax::contains_cdata_end(content) {
                        return Err(self.error_at(
                            offset,
                            "']]>' is not allowed in text content".to_owned(),
                        ));
                    } else if let Err(e) = content.unescape_with(|name| self.resolve_entity(name)) {
                        return Err(self.error_at(offset, e.to_string()));
                    }
                }
                Event::CData(_) => {
                    if self.open.is_empty() {
                        return Err(self.outside_root(offset));
                    }
                }
                Event::Comment(ref body) => {
                    if !syntax::comment_is_valid(body) {
                        return Err(self.error_at(
                            offset,
                            "'--' is not allowed inside a comment".to_owned(),
                        ));
                    }
                }
                Event::DocType(ref content) => {
                    if self.root_closed {
                        return Err(self.outside_root(offset));
                    }
                    if !self.nodes.is_empty() {
                        return Err(self.error_at(
                            offset,
                            "DOCTYPE declaration inside the root element".to_owned(),
                        ));
                    }
                    self.entities = syntax::internal_entities(&String::from_utf8_lossy(content));
                }
                Event::Decl(_) => {
                    if !first_event {
                        return Err(self.error_at(
                            offset,
                            "XML declaration not at start of document".to_owned(),
                        ));
                    }
                }
                Event::PI(_) => {}
                Event::Eof => break,
            }

            first_event = false;
        }

        if let Some(&id) = self.open.last() {
            let name = self.nodes[id].name.clone();
            let end = self.text.len() as u64;
            return Err(self.error_at(end, format!("unclosed element <{name}>")));
        }

        if self.nodes.is_empty() {
            let end = self.text.len() as u64;
            return Err(self.error_at(end, "no element found".to_owned()));
        }

        Ok(ElementTree { nodes: self.nodes })
    }

    /// Record a new element under the innermost open one and open its namespace scope.
    fn open_element(
        &mut self,
        tag: &BytesStart<'_>,
        offset: u64,
    ) -> Result<NodeId, XmlSyntaxError> {
        if self.root_closed {
            return Err(self.error_at(offset, "junk after document element".to_owned()));
        }

        let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
        let Some((prefix, _)) = syntax::split_qname(&name) else {
            return Err(self.error_at(offset, format!("invalid element name '{name}'")));
        };
        if !syntax::attributes_separated(tag.attributes_raw()) {
            return Err(self.error_at(
                offset,
                "attributes must be separated by whitespace".to_owned(),
            ));
        }

        let mut declared = Vec::new();
        let mut used_prefixes = Vec::new();
        for attr in tag.attributes() {
            let attr = attr.map_err(|e| self.error_at(offset, e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let Some((attr_prefix, local)) = syntax::split_qname(&key) else {
                return Err(self.error_at(offset, format!("invalid attribute name '{key}'")));
            };
            if attr.value.contains(&b'<') {
                return Err(self.error_at(
                    offset,
                    format!("'<' is not allowed in the value of attribute '{key}'"),
                ));
            }
            attr.unescape_value_with(|entity| self.resolve_entity(entity))
                .map_err(|e| self.error_at(offset, e.to_string()))?;

            match attr_prefix {
                Some("xmlns") => declared.push(local.to_owned()),
                Some(used) => used_prefixes.push(used.to_owned()),
                None => {}
            }
        }

        // Declarations on an element are in scope for the element itself.
        self.scopes.push(declared);
        let mut prefixes = prefix.into_iter().chain(used_prefixes.iter().map(String::as_str));
        if let Some(unbound) = prefixes.find(|p| !self.prefix_bound(p)) {
            return Err(self.error_at(offset, format!("unbound prefix '{unbound}'")));
        }

        let (line, column) = line_column(self.text, offset);
        let id = self.nodes.len();
        self.nodes.push(Element {
            name,
            line,
            column,
            children: Vec::new(),
        });
        if let Some(&parent) = self.open.last() {
            self.nodes[parent].children.push(id);
        }
        Ok(id)
    }

    fn prefix_bound(&self, prefix: &str) -> bool {
        prefix == "xml" || self.scopes.iter().flatten().any(|declared| declared == prefix)
    }

    fn resolve_entity(&self, name: &str) -> Option<&str> {
        syntax::predefined_entity(name).or_else(|| self.entities.get(name).map(String::as_str))
    }

    fn outside_root(&self, offset: u64) -> XmlSyntaxError {
        let message = if self.root_closed {
            "junk after document element"
        } else {
            "text before the root element"
        };
        self.error_at(offset, message.to_owned())
    }

    fn error_at(&self, offset: u64, message: String) -> XmlSyntaxError {
        let (line, column) = line_column(self.text, offset);
        XmlSyntaxError {
            message,
            line,
            column,
        }
    }
}

/// Translate a byte offset into a 1-indexed line and column (in characters).
fn line_column(text: &str, offset: u64) -> (usize, usize) {
    let offset = usize::try_from(offset).map_or(text.len(), |o| o.min(text.len()));
    let before = &text.as_bytes()[..offset];
    let line = 1 + before.iter().filter(|&&b| b == b'\n').count();
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |pos| pos + 1);
    let column = 1 + text
        .get(line_start..offset)
        .map_or(offset - line_start, |s| s.chars().count());
    (line, column)
}
