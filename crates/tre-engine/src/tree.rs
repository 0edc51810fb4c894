//! Transient Tree
//!
//! The styled, layout-ready tree produced by one transform. It is rebuilt
//! wholesale for every render pass and never patched.

use tre_css::StyleDeclarations;
use tre_dom::{Attribute, Document, ElementData, Node, NodeId};

use crate::DocumentMetadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransientKind {
    /// The root; stands in for `<html>` and `<body>`
    Document,
    Element,
    Text,
}

/// One styled node
#[derive(Debug, Clone, PartialEq)]
pub struct TransientNode {
    pub kind: TransientKind,
    /// Lowercase tag name for elements
    pub tag: Option<String>,
    pub attributes: Vec<Attribute>,
    /// DOM node this was built from
    pub source: NodeId,
    /// Declared style from the cascade
    pub styles: StyleDeclarations,
    /// Inherited and declared style, font-relative units resolved
    pub computed: StyleDeclarations,
    /// Text content for text nodes
    pub data: Option<String>,
    pub children: Vec<TransientNode>,
}

impl TransientNode {
    pub(crate) fn document(source: NodeId, styles: StyleDeclarations, computed: StyleDeclarations) -> Self {
        Self {
            kind: TransientKind::Document,
            tag: None,
            attributes: Vec::new(),
            source,
            styles,
            computed,
            data: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn element(
        source: NodeId,
        elem: &ElementData,
        styles: StyleDeclarations,
        computed: StyleDeclarations,
    ) -> Self {
        Self {
            kind: TransientKind::Element,
            tag: Some(elem.name.clone()),
            attributes: elem.attrs.clone(),
            source,
            styles,
            computed,
            data: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn new_text(source: NodeId, data: String, computed: StyleDeclarations) -> Self {
        Self {
            kind: TransientKind::Text,
            tag: None,
            attributes: Vec::new(),
            source,
            styles: StyleDeclarations::new(),
            computed,
            data: Some(data),
            children: Vec::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == TransientKind::Text
    }

    pub fn is_element(&self) -> bool {
        self.kind == TransientKind::Element
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.data.as_deref()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in self.descendants() {
            if let Some(text) = node.text() {
                out.push_str(text);
            }
        }
        out
    }

    /// Pre-order iterator over this node and everything below it
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First descendant (or self) with the given tag
    pub fn find(&self, tag: &str) -> Option<&TransientNode> {
        self.descendants().find(|n| n.tag() == Some(tag))
    }

    /// Every descendant (or self) with the given tag, in document order
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TransientNode> + 'a {
        self.descendants().filter(move |n| n.tag() == Some(tag))
    }
}

/// Pre-order traversal
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a TransientNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a TransientNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Result of one transform
///
/// Owns the DOM it was built from, so nodes can be traced back to their
/// source through [`TransientTree::source`].
#[derive(Debug, Clone)]
pub struct TransientTree {
    root: TransientNode,
    metadata: DocumentMetadata,
    document: Document,
}

impl TransientTree {
    pub(crate) fn new(root: TransientNode, metadata: DocumentMetadata, document: Document) -> Self {
        Self { root, metadata, document }
    }

    pub fn root(&self) -> &TransientNode {
        &self.root
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// The DOM after hooks ran
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// DOM node a transient node was built from
    pub fn source(&self, node: &TransientNode) -> Option<&Node> {
        self.document.tree().get(node.source)
    }

    /// Total number of transient nodes, root included
    pub fn node_count(&self) -> usize {
        self.root.descendants().count()
    }

    /// Whether the root has no children
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn into_parts(self) -> (TransientNode, DocumentMetadata, Document) {
        (self.root, self.metadata, self.document)
    }
}
