//! DOM Transformer
//!
//! Walks the DOM depth-first, runs the hooks, asks the cascade for each
//! surviving element's style and produces the [`TransientTree`].
//!
//! `<html>` and `<body>` collapse into the tree root; `<head>` is only read
//! for metadata. Comments and doctypes never reach the tree.

use tre_css::{compute_styles, inherited_styles, StyleDeclarations, UnitContext};
use tre_dom::{Document, ElementData, Node, NodeData, NodeId};

use crate::whitespace::{collapse_children, is_block};
use crate::{
    DocumentMetadata, EngineConfig, HookKind, TransformError, TransientNode, TransientRenderEngine,
    TransientTree,
};

/// Elements whose content is never rendered
const NON_RENDERED: &[&str] = &["head", "script", "style", "template"];

/// Parse and transform `html` with a one-off engine
pub fn transform(html: &str, config: &EngineConfig) -> Result<TransientTree, TransformError> {
    let engine = TransientRenderEngine::new(config.clone())?;
    engine.transform_document(html)
}

pub(crate) fn build_tree(
    engine: &TransientRenderEngine,
    document: Document,
) -> Result<TransientTree, TransformError> {
    let metadata = DocumentMetadata::from_document(&document);
    let mut transformer = Transformer { engine, document };
    let root = transformer.transform_root()?;
    let tree = TransientTree::new(root, metadata, transformer.document);

    tracing::debug!(nodes = tree.node_count(), "Built transient tree");

    if let Some(listener) = &engine.config().hooks.on_document_metadata_loaded {
        listener(tree.metadata());
    }
    Ok(tree)
}

/// Nesting depth past which a subtree is flattened into its text
const MAX_DEPTH: usize = 256;

struct Transformer<'a> {
    engine: &'a TransientRenderEngine,
    document: Document,
}

/// What a node inherits from the container it is built into
#[derive(Clone, Copy)]
struct Scope<'s> {
    computed: &'s StyleDeclarations,
    units: UnitContext,
    depth: usize,
}

impl<'s> Scope<'s> {
    /// Scope for the children of a node with the given computed style
    fn child_of<'c>(&self, computed: &'c StyleDeclarations) -> Scope<'c> {
        Scope {
            computed,
            units: self.units.for_children(computed),
            depth: self.depth + 1,
        }
    }

    /// Same container, one DOM level deeper
    fn nested(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }
}

impl Transformer<'_> {
    fn transform_root(&mut self) -> Result<TransientNode, TransformError> {
        let engine = self.engine;
        let tree = self.document.tree();
        let root_elements: Vec<&ElementData> = [self.document.document_element(), self.document.body()]
            .into_iter()
            .flatten()
            .filter_map(|id| tree.get(id).and_then(Node::as_element))
            .collect();
        let styles = engine.cascade().resolve_root(&root_elements);
        let computed = compute_styles(None, &styles, engine.units());
        let mut root = TransientNode::document(NodeId::ROOT, styles, computed);

        let scope = Scope {
            computed: &root.computed,
            units: engine.units().for_children(&root.computed),
            depth: 0,
        };
        let mut children = Vec::new();
        self.transform_children(NodeId::ROOT, scope, &mut children)?;
        collapse_children(&mut children, true);
        root.children = children;
        Ok(root)
    }

    fn transform_children(
        &mut self,
        parent: NodeId,
        scope: Scope<'_>,
        out: &mut Vec<TransientNode>,
    ) -> Result<(), TransformError> {
        for child in self.document.tree().child_ids(parent) {
            // moved or detached by a hook since the list was taken
            if self.document.tree().parent(child) != Some(parent) {
                continue;
            }
            self.transform_node(child, scope, out)?;
        }
        Ok(())
    }

    fn transform_node(
        &mut self,
        id: NodeId,
        scope: Scope<'_>,
        out: &mut Vec<TransientNode>,
    ) -> Result<(), TransformError> {
        let engine = self.engine;
        let is_text = match self.document.tree().get(id).map(|n| &n.data) {
            Some(NodeData::Text(_)) => true,
            Some(NodeData::Element(_)) => false,
            _ => return Ok(()),
        };

        if let Some(ignore) = &engine.config().hooks.ignore_dom_node {
            let ignored = ignore(self.document.tree(), id)
                .map_err(|e| TransformError::hook(HookKind::IgnoreDomNode, e))?;
            if ignored {
                tracing::trace!(?id, "Subtree dropped by ignoreDOMNode");
                return Ok(());
            }
        }

        if is_text {
            self.transform_text(id, scope, out)
        } else if scope.depth >= MAX_DEPTH {
            out.extend(self.flatten(id, scope));
            Ok(())
        } else {
            self.transform_element(id, scope, out)
        }
    }

    fn transform_text(
        &mut self,
        id: NodeId,
        scope: Scope<'_>,
        out: &mut Vec<TransientNode>,
    ) -> Result<(), TransformError> {
        let engine = self.engine;
        let tree = self.document.tree();
        let mut data = tree.get(id).and_then(Node::as_text).unwrap_or_default().to_string();

        if let Some(alter) = &engine.config().hooks.alter_dom_data {
            if let Some(altered) = alter(tree, id).map_err(|e| TransformError::hook(HookKind::AlterDomData, e))? {
                data = altered;
            }
        }

        out.push(TransientNode::new_text(id, data, inherited_styles(scope.computed)));
        Ok(())
    }

    fn transform_element(
        &mut self,
        id: NodeId,
        scope: Scope<'_>,
        out: &mut Vec<TransientNode>,
    ) -> Result<(), TransformError> {
        let engine = self.engine;
        let config = engine.config();
        let tag = self.document.tree().tag_name(id).unwrap_or_default().to_string();

        if engine.is_ignored_tag(&tag) {
            tracing::trace!(%tag, "Unwrapping ignored tag");
            return self.transform_children(id, scope.nested(), out);
        }
        if NON_RENDERED.contains(&tag.as_str()) {
            return Ok(());
        }

        self.alter_children(id)?;

        if tag == "html" || tag == "body" {
            return self.transform_children(id, scope.nested(), out);
        }

        let styles = engine.cascade().resolve(self.document.tree(), id);
        let computed = compute_styles(Some(scope.computed), &styles, &scope.units);
        let Some(elem) = self.document.tree().get(id).and_then(Node::as_element) else {
            return Ok(());
        };
        let mut node = TransientNode::element(id, elem, styles, computed);

        let mut children = Vec::new();
        self.transform_children(id, scope.child_of(&node.computed), &mut children)?;
        collapse_children(&mut children, is_block(&node));
        node.children = children;

        if let Some(alter) = &config.hooks.alter_dom_element {
            let substitute = alter(self.document.tree_mut(), id)
                .map_err(|e| TransformError::hook(HookKind::AlterDomElement, e))?;
            if let Some(substitute) = substitute.filter(|&s| s != id) {
                tracing::trace!(?id, ?substitute, "Element substituted by alterDOMElement");
                let mut original = Some(node);
                let replaced = self.build_unfiltered(substitute, id, &mut original, scope);
                match replaced.or(original) {
                    Some(replaced) => node = replaced,
                    None => return Ok(()),
                }
            }
        }

        out.push(node);
        Ok(())
    }

    fn alter_children(&mut self, id: NodeId) -> Result<(), TransformError> {
        let engine = self.engine;
        let Some(alter) = &engine.config().hooks.alter_dom_children else {
            return Ok(());
        };
        let to_error = |e: anyhow::Error| TransformError::hook(HookKind::AlterDomChildren, e);

        if let Some(children) = alter(self.document.tree_mut(), id).map_err(to_error)? {
            self.document
                .tree_mut()
                .replace_children(id, &children)
                .map_err(|e| to_error(e.into()))?;
        }
        Ok(())
    }

    /// Replace a too-deep subtree with a single text node
    fn flatten(&self, id: NodeId, scope: Scope<'_>) -> Option<TransientNode> {
        tracing::warn!(?id, depth = scope.depth, "Markup nested too deeply, flattening subtree to text");
        let text = self.document.tree().text_content(id);
        (!text.is_empty()).then(|| TransientNode::new_text(id, text, inherited_styles(scope.computed)))
    }

    /// Style a substitute subtree without running the filters again
    ///
    /// Where the substituted node itself appears, its already-built
    /// transient node is moved in.
    fn build_unfiltered(
        &self,
        id: NodeId,
        original: NodeId,
        built: &mut Option<TransientNode>,
        scope: Scope<'_>,
    ) -> Option<TransientNode> {
        if id == original {
            return built.take();
        }

        let engine = self.engine;
        let tree = self.document.tree();
        match &tree.get(id)?.data {
            NodeData::Text(text) => Some(TransientNode::new_text(
                id,
                text.content.clone(),
                inherited_styles(scope.computed),
            )),
            NodeData::Element(_) if scope.depth >= MAX_DEPTH => self.flatten(id, scope),
            NodeData::Element(elem) => {
                let styles = engine.cascade().resolve_element(elem);
                let computed = compute_styles(Some(scope.computed), &styles, &scope.units);
                let mut node = TransientNode::element(id, elem, styles, computed);

                let mut children = Vec::new();
                let child_scope = scope.child_of(&node.computed);
                for child in tree.child_ids(id) {
                    if let Some(built_child) = self.build_unfiltered(child, original, built, child_scope) {
                        children.push(built_child);
                    }
                }
                collapse_children(&mut children, is_block(&node));
                node.children = children;
                Some(node)
            }
            _ => None,
        }
    }
}
