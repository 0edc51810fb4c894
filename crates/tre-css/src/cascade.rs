//! Style Cascade & Resolver
//!
//! Computes the declared style of an element by merging, lowest to highest
//! precedence: user-agent defaults, tag styles, class styles (attribute
//! order), id styles, then the inline `style` attribute. The style policy
//! is applied to every layer, so the result never holds a rejected property.

use std::collections::HashMap;

use tre_dom::{DomTree, ElementData, Node, NodeId};

use crate::parser::parse_inline_style;
use crate::user_agent::UserAgentStyles;
use crate::{StyleDeclarations, StylePolicy};

/// Inputs the cascade is compiled from
#[derive(Debug, Clone)]
pub struct CascadeOptions {
    pub tags_styles: HashMap<String, StyleDeclarations>,
    pub classes_styles: HashMap<String, StyleDeclarations>,
    pub ids_styles: HashMap<String, StyleDeclarations>,
    /// Applied to the document root, below everything else
    pub base_style: StyleDeclarations,
    pub enable_user_agent_styles: bool,
    pub enable_css_inline_processing: bool,
    pub policy: StylePolicy,
}

impl Default for CascadeOptions {
    fn default() -> Self {
        Self {
            tags_styles: HashMap::new(),
            classes_styles: HashMap::new(),
            ids_styles: HashMap::new(),
            base_style: StyleDeclarations::new(),
            enable_user_agent_styles: true,
            enable_css_inline_processing: true,
            policy: StylePolicy::default(),
        }
    }
}

/// Compiled cascade tables
///
/// User-agent and tag styles are pre-merged per tag and every table is
/// pre-filtered by the policy, so resolving a node only merges lookups.
#[derive(Debug, Clone, Default)]
pub struct StyleCascade {
    tag_table: HashMap<String, StyleDeclarations>,
    classes: HashMap<String, StyleDeclarations>,
    ids: HashMap<String, StyleDeclarations>,
    base: StyleDeclarations,
    inline_enabled: bool,
    policy: StylePolicy,
}

impl StyleCascade {
    pub fn new(options: CascadeOptions) -> Self {
        let CascadeOptions {
            tags_styles,
            classes_styles,
            ids_styles,
            mut base_style,
            enable_user_agent_styles,
            enable_css_inline_processing,
            policy,
        } = options;

        let mut tag_table: HashMap<String, StyleDeclarations> = HashMap::new();
        if enable_user_agent_styles {
            for (tag, defaults) in UserAgentStyles::new().iter() {
                tag_table.insert(tag.to_string(), defaults.clone());
            }
        }
        for (tag, styles) in tags_styles {
            tag_table.entry(tag.to_ascii_lowercase()).or_default().merge(&styles);
        }

        let filter = |mut table: HashMap<String, StyleDeclarations>| {
            for declarations in table.values_mut() {
                policy.apply(declarations);
            }
            table.retain(|_, declarations| !declarations.is_empty());
            table
        };
        let tag_table = filter(tag_table);
        let classes = filter(classes_styles);
        let ids = filter(ids_styles);
        policy.apply(&mut base_style);

        tracing::debug!(
            tags = tag_table.len(),
            classes = classes.len(),
            ids = ids.len(),
            "Compiled style cascade"
        );

        Self {
            tag_table,
            classes,
            ids,
            base: base_style,
            inline_enabled: enable_css_inline_processing,
            policy,
        }
    }

    /// Declared style of a DOM node; non-element nodes have none
    pub fn resolve(&self, tree: &DomTree, node: NodeId) -> StyleDeclarations {
        match tree.get(node).and_then(Node::as_element) {
            Some(elem) => self.resolve_element(elem),
            None => {
                tracing::trace!(?node, "Cascade skipped for non-element node");
                StyleDeclarations::new()
            }
        }
    }

    /// Declared style of an element
    pub fn resolve_element(&self, elem: &ElementData) -> StyleDeclarations {
        let mut declarations = StyleDeclarations::new();
        self.cascade_into(elem, &mut declarations);
        declarations
    }

    /// Declared style of the document root
    ///
    /// `baseStyle` sits below the cascades of the elements standing in for
    /// the root, outermost first (normally `<html>` then `<body>`).
    pub fn resolve_root(&self, root_elements: &[&ElementData]) -> StyleDeclarations {
        let mut declarations = self.base.clone();
        for elem in root_elements {
            self.cascade_into(elem, &mut declarations);
        }
        declarations
    }

    fn cascade_into(&self, elem: &ElementData, out: &mut StyleDeclarations) {
        if let Some(styles) = self.tag_table.get(&elem.name) {
            out.merge(styles);
        }
        for class in &elem.classes {
            if let Some(styles) = self.classes.get(class) {
                out.merge(styles);
            }
        }
        if let Some(styles) = elem.id.as_ref().and_then(|id| self.ids.get(id)) {
            out.merge(styles);
        }
        if self.inline_enabled {
            if let Some(style) = elem.get_attr("style") {
                let mut inline = parse_inline_style(style);
                self.policy.apply(&mut inline);
                out.merge(&inline);
            }
        }
    }

    pub fn policy(&self) -> &StylePolicy {
        &self.policy
    }
}
