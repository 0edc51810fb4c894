//! Renderer Registry
//!
//! Maps tag names to the descriptor the paint layer uses for them. Lookup
//! is an exact match on the lowercase tag name, falling back to one generic
//! descriptor. There is no inheritance or wildcard matching.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What kind of children a renderer expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentModel {
    /// Block-level content only
    Block,
    /// Text and inline content only
    Textual,
    /// Anything
    #[default]
    Mixed,
    /// Void element; children are never painted
    None,
}

/// Tag to paint-strategy binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererDescriptor {
    /// Strategy name understood by the paint layer
    pub name: String,
    #[serde(default)]
    pub content_model: ContentModel,
}

impl RendererDescriptor {
    pub fn new(name: impl Into<String>, content_model: ContentModel) -> Self {
        Self {
            name: name.into(),
            content_model,
        }
    }

    /// Descriptor used for every tag without a registered renderer
    pub fn generic() -> Self {
        Self::new("generic", ContentModel::Mixed)
    }
}

/// Immutable tag → renderer table
#[derive(Debug, Clone, PartialEq)]
pub struct RendererRegistry {
    renderers: BTreeMap<String, RendererDescriptor>,
    fallback: RendererDescriptor,
}

impl RendererRegistry {
    pub fn new(renderers: &BTreeMap<String, RendererDescriptor>) -> Self {
        let renderers: BTreeMap<_, _> = renderers
            .iter()
            .map(|(tag, descriptor)| (tag.to_ascii_lowercase(), descriptor.clone()))
            .collect();
        tracing::debug!(count = renderers.len(), "Built renderer registry");
        Self {
            renderers,
            fallback: RendererDescriptor::generic(),
        }
    }

    /// Descriptor for a tag, or the generic fallback
    pub fn lookup(&self, tag: &str) -> &RendererDescriptor {
        self.get(tag).unwrap_or(&self.fallback)
    }

    /// Descriptor registered for exactly this tag
    pub fn get(&self, tag: &str) -> Option<&RendererDescriptor> {
        match self.renderers.get(tag) {
            Some(descriptor) => Some(descriptor),
            None if tag.bytes().any(|b| b.is_ascii_uppercase()) => {
                self.renderers.get(&tag.to_ascii_lowercase())
            }
            None => None,
        }
    }

    pub fn fallback(&self) -> &RendererDescriptor {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RendererDescriptor)> {
        self.renderers.iter().map(|(tag, descriptor)| (tag.as_str(), descriptor))
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new(&BTreeMap::new())
    }
}
