//! DOM Tree (arena-based allocation)

use crate::{DomError, DomResult, Node, NodeData, NodeId};

/// Arena-based DOM tree
///
/// Index 0 always holds the document node. Nodes are never freed; detached
/// nodes simply stop being reachable from the root.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (reachable or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(Node::doctype(name, public_id, system_id))
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    /// Tag name of an element node
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::tag_name)
    }

    /// Iterate over the children of a node
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let next = self.get(parent).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children { tree: self, next }
    }

    /// Collect child ids
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).map(|(id, _)| id).collect()
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node.to_option();
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Unlink a node from its parent and siblings
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let (parent, prev, next) = {
            let node = self.get(id).ok_or(DomError::NotFound(id))?;
            (node.parent, node.prev_sibling, node.next_sibling)
        };

        if let Some(prev_node) = prev.to_option().and_then(|p| self.get_mut(p)) {
            prev_node.next_sibling = next;
        } else if let Some(parent_node) = parent.to_option().and_then(|p| self.get_mut(p)) {
            parent_node.first_child = next;
        }

        if let Some(next_node) = next.to_option().and_then(|n| self.get_mut(n)) {
            next_node.prev_sibling = prev;
        } else if let Some(parent_node) = parent.to_option().and_then(|p| self.get_mut(p)) {
            parent_node.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
        Ok(())
    }

    /// Append a child, detaching it from any previous parent first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.get(parent).is_none() {
            return Err(DomError::NotFound(parent));
        }
        if self.get(child).is_none() {
            return Err(DomError::NotFound(child));
        }
        if child == NodeId::ROOT {
            return Err(DomError::DocumentMove);
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child)?;

        let last = self.nodes[parent.index()].last_child;
        if let Some(last_node) = last.to_option().and_then(|l| self.get_mut(l)) {
            last_node.next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;

        let node = &mut self.nodes[child.index()];
        node.parent = parent;
        node.prev_sibling = last;
        node.next_sibling = NodeId::NONE;
        Ok(child)
    }

    /// Replace the whole child list of `parent`
    ///
    /// Previous children not present in `children` become detached. Nodes
    /// listed in `children` are moved from wherever they were.
    pub fn replace_children(&mut self, parent: NodeId, children: &[NodeId]) -> DomResult<()> {
        for old in self.child_ids(parent) {
            self.detach(old)?;
        }
        for &child in children {
            self.append_child(parent, child)?;
        }
        Ok(())
    }

    /// Replace the text of a text node
    pub fn set_text(&mut self, id: NodeId, content: String) -> DomResult<()> {
        match self.get_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Text(text)) => {
                text.content = content;
                Ok(())
            }
            _ => Err(DomError::NotFound(id)),
        }
    }

    /// Deep-copy a subtree, returning the detached copy
    pub fn clone_subtree(&mut self, id: NodeId) -> DomResult<NodeId> {
        let data = self.get(id).ok_or(DomError::NotFound(id))?.data.clone();
        let copy = self.push(Node { data, ..Node::document() });
        for child in self.child_ids(id) {
            let child_copy = self.clone_subtree(child)?;
            self.append_child(copy, child_copy)?;
        }
        Ok(copy)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match self.get(current).map(|n| &n.data) {
                Some(NodeData::Text(text)) => out.push_str(&text.content),
                Some(NodeData::Comment(_)) | None => {}
                Some(_) => stack.extend(self.child_ids(current).into_iter().rev()),
            }
        }
        out
    }

    /// Depth-first search for the first element with the given tag
    pub fn find_element(&self, start: NodeId, tag: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.child_ids(start).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            if self.tag_name(id) == Some(tag) {
                return Some(id);
            }
            stack.extend(self.child_ids(id).into_iter().rev());
        }
        None
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node's children
#[derive(Debug, Clone)]
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.to_option()?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}
