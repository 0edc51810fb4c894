//! DOM hooks
//!
//! Optional caller-supplied functions run by the transformer, always in
//! this order for a given node:
//!
//! 1. `ignore_dom_node` drops the node and its subtree
//! 2. `ignored_tags` (configuration) unwraps the node
//! 3. `alter_dom_data` rewrites text
//! 4. `alter_dom_children` replaces an element's children before recursion
//! 5. `alter_dom_element` substitutes an element once its children are built
//!
//! A hook returning `Ok(None)` leaves the node untouched. Errors abort the
//! transform and reach the caller.

use std::fmt;
use std::sync::Arc;

use tre_dom::{DomTree, NodeId};

use crate::DocumentMetadata;

pub type IgnoreDomNodeFn = dyn Fn(&DomTree, NodeId) -> anyhow::Result<bool> + Send + Sync;
pub type AlterDomDataFn = dyn Fn(&DomTree, NodeId) -> anyhow::Result<Option<String>> + Send + Sync;
pub type AlterDomChildrenFn =
    dyn Fn(&mut DomTree, NodeId) -> anyhow::Result<Option<Vec<NodeId>>> + Send + Sync;
pub type AlterDomElementFn =
    dyn Fn(&mut DomTree, NodeId) -> anyhow::Result<Option<NodeId>> + Send + Sync;
pub type DocumentMetadataFn = dyn Fn(&DocumentMetadata) + Send + Sync;

/// The set of DOM hooks carried by a configuration
///
/// Hooks compare by `Arc` identity when deciding whether an engine must be
/// rebuilt, so keep the same `Arc` across renders to share the engine.
#[derive(Clone, Default)]
pub struct DomHooks {
    pub ignore_dom_node: Option<Arc<IgnoreDomNodeFn>>,
    pub alter_dom_data: Option<Arc<AlterDomDataFn>>,
    pub alter_dom_children: Option<Arc<AlterDomChildrenFn>>,
    pub alter_dom_element: Option<Arc<AlterDomElementFn>>,
    /// Notified once per transform with the document's head metadata
    pub on_document_metadata_loaded: Option<Arc<DocumentMetadataFn>>,
}

impl DomHooks {
    pub fn is_empty(&self) -> bool {
        self.ignore_dom_node.is_none()
            && self.alter_dom_data.is_none()
            && self.alter_dom_children.is_none()
            && self.alter_dom_element.is_none()
            && self.on_document_metadata_loaded.is_none()
    }
}

impl fmt::Debug for DomHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomHooks")
            .field("ignore_dom_node", &self.ignore_dom_node.is_some())
            .field("alter_dom_data", &self.alter_dom_data.is_some())
            .field("alter_dom_children", &self.alter_dom_children.is_some())
            .field("alter_dom_element", &self.alter_dom_element.is_some())
            .field("on_document_metadata_loaded", &self.on_document_metadata_loaded.is_some())
            .finish()
    }
}

/// Identity comparison for optional hooks
pub(crate) fn same_hook<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
