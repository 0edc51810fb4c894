//! Document - High-level document API

use crate::{DomTree, NodeId};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create an empty document (no structure)
    pub fn empty() -> Self {
        Self {
            tree: DomTree::new(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate and cache the html, head and body elements
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        self.html_element = self.tree.children(root)
            .find(|(_, n)| n.tag_name() == Some("html"))
            .map(|(id, _)| id)
            .unwrap_or(NodeId::NONE);

        if !self.html_element.is_valid() {
            self.head_element = NodeId::NONE;
            self.body_element = NodeId::NONE;
            return;
        }

        let mut head = NodeId::NONE;
        let mut body = NodeId::NONE;
        for (id, node) in self.tree.children(self.html_element) {
            match node.tag_name() {
                Some("head") if !head.is_valid() => head = id,
                Some("body") | Some("frameset") if !body.is_valid() => body = id,
                _ => {}
            }
        }
        self.head_element = head;
        self.body_element = body;
    }

    /// Get document title
    pub fn title(&self) -> Option<String> {
        if !self.head_element.is_valid() {
            return None;
        }
        let title = self.tree.find_element(self.head_element, "title")?;
        Some(self.tree.text_content(title).trim().to_string())
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.to_option()
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.to_option()
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.to_option()
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_element_with_id(self.tree.root(), id)
    }

    fn find_element_with_id(&self, start: NodeId, target_id: &str) -> Option<NodeId> {
        for (node_id, node) in self.tree.children(start) {
            if let Some(elem) = node.as_element() {
                if elem.id.as_deref() == Some(target_id) {
                    return Some(node_id);
                }
            }
            if let Some(found) = self.find_element_with_id(node_id, target_id) {
                return Some(found);
            }
        }
        None
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skeleton() -> Document {
        let mut doc = Document::empty();
        let tree = doc.tree_mut();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let title = tree.create_element("title");
        let text = tree.create_text("  Hello  ");
        let body = tree.create_element("body");
        let p = tree.create_element("p");
        tree.append_child(NodeId::ROOT, html).unwrap();
        tree.append_child(html, head).unwrap();
        tree.append_child(head, title).unwrap();
        tree.append_child(title, text).unwrap();
        tree.append_child(html, body).unwrap();
        tree.append_child(body, p).unwrap();
        tree.get_mut(p).unwrap().as_element_mut().unwrap().set_attr("id", "first");
        doc.finalize();
        doc
    }

    #[test]
    fn test_finalize_locates_sections() {
        let doc = skeleton();
        assert!(doc.document_element().is_some());
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
        assert_eq!(doc.title().as_deref(), Some("Hello"));
    }

    #[test]
    fn test_get_element_by_id() {
        let doc = skeleton();
        let p = doc.get_element_by_id("first").unwrap();
        assert_eq!(doc.tree().tag_name(p), Some("p"));
        assert!(doc.get_element_by_id("missing").is_none());
    }

    #[test]
    fn test_empty_document_has_no_sections() {
        let mut doc = Document::empty();
        doc.finalize();
        assert!(doc.body().is_none());
        assert!(doc.title().is_none());
    }
}
