//! Engine - Main entry point

use std::collections::{BTreeMap, BTreeSet};

use tre_css::{StyleCascade, UnitContext};
use tre_dom::Document;
use tre_html::HtmlParser;

use crate::{transform, ConfigError, EngineConfig, RendererRegistry, TransformError, TransientTree};

/// The transient render engine
///
/// Bundles a configuration with everything compiled from it: the cascade
/// tables, the parser and the renderer registry. Immutable once built;
/// share it behind an `Arc` and build a new one when the configuration
/// changes (see [`crate::get_or_build_engine`]).
#[derive(Debug)]
pub struct TransientRenderEngine {
    config: EngineConfig,
    cascade: StyleCascade,
    parser: HtmlParser,
    registry: RendererRegistry,
    units: UnitContext,
    /// Lowercased `ignored_tags`
    ignored_tags: BTreeSet<String>,
}

impl TransientRenderEngine {
    /// Create a new engine with the given configuration
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::compile(config))
    }

    /// Engine with no styles, no renderers and no hooks
    pub fn empty() -> Self {
        Self::compile(EngineConfig::bare())
    }

    fn compile(config: EngineConfig) -> Self {
        let cascade = StyleCascade::new(config.cascade_options());
        let parser = HtmlParser::new(config.html_parser_options);
        let registry = RendererRegistry::new(&config.renderers);
        let units = UnitContext::new(config.em_size);
        let ignored_tags = config.ignored_tags.iter().map(|tag| tag.to_ascii_lowercase()).collect();

        tracing::debug!(
            em_size = config.em_size,
            renderers = registry.len(),
            ignored_tags = config.ignored_tags.len(),
            "Transient render engine initialized"
        );

        Self {
            config,
            cascade,
            parser,
            registry,
            units,
            ignored_tags,
        }
    }

    /// Parse HTML with the configured parser options
    pub fn parse_document(&self, html: &str) -> Document {
        self.parser.parse(html)
    }

    /// Transform a parsed document into a transient tree
    pub fn build_tree(&self, document: Document) -> Result<TransientTree, TransformError> {
        transform::build_tree(self, document)
    }

    /// Parse and transform in one step
    pub fn transform_document(&self, html: &str) -> Result<TransientTree, TransformError> {
        self.build_tree(self.parse_document(html))
    }

    /// Get engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cascade(&self) -> &StyleCascade {
        &self.cascade
    }

    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    pub fn units(&self) -> &UnitContext {
        &self.units
    }

    /// Whether elements with this (lowercase) tag are unwrapped
    pub fn is_ignored_tag(&self, tag: &str) -> bool {
        self.ignored_tags.contains(tag)
    }

    /// Generic family → concrete font mapping, passed through to the host
    pub fn fallback_fonts(&self) -> &BTreeMap<String, String> {
        &self.config.fallback_fonts
    }

    /// Fonts the host reports as available without loading
    pub fn system_fonts(&self) -> &[String] {
        &self.config.system_fonts
    }
}

impl Default for TransientRenderEngine {
    fn default() -> Self {
        Self::compile(EngineConfig::default())
    }
}
