//! Engine Configuration
//!
//! Data fields (de)serialize with the camelCase names host applications
//! use (`tagsStyles`, `enableCSSInlineProcessing`, ...). Hooks are code and
//! are attached with the `with_*` setters.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tre_css::{CascadeOptions, StyleDeclarations, StylePolicy};
use tre_dom::{DomTree, NodeId};
use tre_html::ParserOptions;

use crate::hooks::{same_hook, DomHooks};
use crate::{ConfigError, DocumentMetadata, RendererDescriptor};

/// Font names assumed to be available without loading
const DEFAULT_SYSTEM_FONTS: &[&str] = &[
    "sans-serif",
    "serif",
    "monospace",
    "system",
    "Roboto",
    "Helvetica",
    "Helvetica Neue",
    "Arial",
    "Georgia",
    "Times New Roman",
    "Courier",
    "Courier New",
    "Menlo",
    "Verdana",
];

/// Engine configuration
///
/// Immutable once handed to an engine.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub tags_styles: HashMap<String, StyleDeclarations>,
    pub classes_styles: HashMap<String, StyleDeclarations>,
    pub ids_styles: HashMap<String, StyleDeclarations>,
    /// Styles of the document root, below every other source
    pub base_style: StyleDeclarations,
    pub enable_user_agent_styles: bool,
    #[serde(rename = "enableCSSInlineProcessing")]
    pub enable_css_inline_processing: bool,
    /// Tags unwrapped by the transformer: the tag goes, its content stays
    pub ignored_tags: BTreeSet<String>,
    pub ignored_styles: BTreeSet<String>,
    /// When present, only these properties survive; wins over `ignored_styles`
    pub allowed_styles: Option<BTreeSet<String>>,
    pub html_parser_options: ParserOptions,
    pub renderers: BTreeMap<String, RendererDescriptor>,
    /// Generic family keyword → concrete font name
    pub fallback_fonts: BTreeMap<String, String>,
    pub system_fonts: Vec<String>,
    /// Root font size in pixels
    pub em_size: f32,
    /// Extra fields whose change forces an engine rebuild
    #[serde(rename = "triggerTREInvalidationPropNames")]
    pub trigger_invalidation_prop_names: Vec<ConfigField>,
    #[serde(skip)]
    pub hooks: DomHooks,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let fallback_fonts = ["sans-serif", "monospace", "serif"]
            .into_iter()
            .map(|family| (family.to_string(), family.to_string()))
            .collect();

        Self {
            tags_styles: HashMap::new(),
            classes_styles: HashMap::new(),
            ids_styles: HashMap::new(),
            base_style: StyleDeclarations::new().with("fontSize", 14.0),
            enable_user_agent_styles: true,
            enable_css_inline_processing: true,
            ignored_tags: BTreeSet::new(),
            ignored_styles: BTreeSet::new(),
            allowed_styles: None,
            html_parser_options: ParserOptions::default(),
            renderers: BTreeMap::new(),
            fallback_fonts,
            system_fonts: DEFAULT_SYSTEM_FONTS.iter().map(|f| f.to_string()).collect(),
            em_size: 14.0,
            trigger_invalidation_prop_names: Vec::new(),
            hooks: DomHooks::default(),
        }
    }
}

impl EngineConfig {
    /// Configuration with every style source switched off
    pub fn bare() -> Self {
        Self {
            base_style: StyleDeclarations::new(),
            enable_user_agent_styles: false,
            enable_css_inline_processing: false,
            fallback_fonts: BTreeMap::new(),
            system_fonts: Vec::new(),
            ..Self::default()
        }
    }

    /// Load data fields from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.em_size.is_finite() || self.em_size <= 0.0 {
            return Err(ConfigError::InvalidEmSize(self.em_size));
        }
        Ok(())
    }

    /// Cascade inputs derived from this configuration
    pub fn cascade_options(&self) -> CascadeOptions {
        CascadeOptions {
            tags_styles: self.tags_styles.clone(),
            classes_styles: self.classes_styles.clone(),
            ids_styles: self.ids_styles.clone(),
            base_style: self.base_style.clone(),
            enable_user_agent_styles: self.enable_user_agent_styles,
            enable_css_inline_processing: self.enable_css_inline_processing,
            policy: StylePolicy::new(&self.ignored_styles, self.allowed_styles.as_ref()),
        }
    }

    /// Whether `field` holds the same value in both configurations
    ///
    /// Data compares by value, hooks by `Arc` identity.
    pub fn field_eq(&self, other: &Self, field: ConfigField) -> bool {
        use ConfigField::*;
        match field {
            TagsStyles => self.tags_styles == other.tags_styles,
            ClassesStyles => self.classes_styles == other.classes_styles,
            IdsStyles => self.ids_styles == other.ids_styles,
            BaseStyle => self.base_style == other.base_style,
            EnableUserAgentStyles => self.enable_user_agent_styles == other.enable_user_agent_styles,
            EnableCssInlineProcessing => {
                self.enable_css_inline_processing == other.enable_css_inline_processing
            }
            IgnoredTags => self.ignored_tags == other.ignored_tags,
            IgnoredStyles => self.ignored_styles == other.ignored_styles,
            AllowedStyles => self.allowed_styles == other.allowed_styles,
            HtmlParserOptions => self.html_parser_options == other.html_parser_options,
            Renderers => self.renderers == other.renderers,
            FallbackFonts => self.fallback_fonts == other.fallback_fonts,
            SystemFonts => self.system_fonts == other.system_fonts,
            EmSize => self.em_size == other.em_size,
            TriggerInvalidationPropNames => {
                self.trigger_invalidation_prop_names == other.trigger_invalidation_prop_names
            }
            IgnoreDomNode => same_hook(&self.hooks.ignore_dom_node, &other.hooks.ignore_dom_node),
            AlterDomData => same_hook(&self.hooks.alter_dom_data, &other.hooks.alter_dom_data),
            AlterDomChildren => {
                same_hook(&self.hooks.alter_dom_children, &other.hooks.alter_dom_children)
            }
            AlterDomElement => {
                same_hook(&self.hooks.alter_dom_element, &other.hooks.alter_dom_element)
            }
            OnDocumentMetadataLoaded => same_hook(
                &self.hooks.on_document_metadata_loaded,
                &other.hooks.on_document_metadata_loaded,
            ),
        }
    }

    pub fn with_tag_style(mut self, tag: &str, styles: StyleDeclarations) -> Self {
        self.tags_styles.insert(tag.to_ascii_lowercase(), styles);
        self
    }

    pub fn with_class_style(mut self, class: &str, styles: StyleDeclarations) -> Self {
        self.classes_styles.insert(class.to_string(), styles);
        self
    }

    pub fn with_id_style(mut self, id: &str, styles: StyleDeclarations) -> Self {
        self.ids_styles.insert(id.to_string(), styles);
        self
    }

    pub fn with_ignore_dom_node<F>(mut self, hook: F) -> Self
    where
        F: Fn(&DomTree, NodeId) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.hooks.ignore_dom_node = Some(Arc::new(hook));
        self
    }

    pub fn with_alter_dom_data<F>(mut self, hook: F) -> Self
    where
        F: Fn(&DomTree, NodeId) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        self.hooks.alter_dom_data = Some(Arc::new(hook));
        self
    }

    pub fn with_alter_dom_children<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut DomTree, NodeId) -> anyhow::Result<Option<Vec<NodeId>>> + Send + Sync + 'static,
    {
        self.hooks.alter_dom_children = Some(Arc::new(hook));
        self
    }

    pub fn with_alter_dom_element<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut DomTree, NodeId) -> anyhow::Result<Option<NodeId>> + Send + Sync + 'static,
    {
        self.hooks.alter_dom_element = Some(Arc::new(hook));
        self
    }

    pub fn with_document_metadata_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&DocumentMetadata) + Send + Sync + 'static,
    {
        self.hooks.on_document_metadata_loaded = Some(Arc::new(listener));
        self
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("tags_styles", &self.tags_styles.len())
            .field("classes_styles", &self.classes_styles.len())
            .field("ids_styles", &self.ids_styles.len())
            .field("base_style", &self.base_style)
            .field("enable_user_agent_styles", &self.enable_user_agent_styles)
            .field("enable_css_inline_processing", &self.enable_css_inline_processing)
            .field("ignored_tags", &self.ignored_tags)
            .field("ignored_styles", &self.ignored_styles)
            .field("allowed_styles", &self.allowed_styles)
            .field("html_parser_options", &self.html_parser_options)
            .field("renderers", &self.renderers.len())
            .field("em_size", &self.em_size)
            .field("trigger_invalidation_prop_names", &self.trigger_invalidation_prop_names)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

/// A configuration field, by the name host applications use for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConfigField {
    TagsStyles,
    ClassesStyles,
    IdsStyles,
    BaseStyle,
    EnableUserAgentStyles,
    EnableCssInlineProcessing,
    IgnoredTags,
    IgnoredStyles,
    AllowedStyles,
    HtmlParserOptions,
    Renderers,
    FallbackFonts,
    SystemFonts,
    EmSize,
    TriggerInvalidationPropNames,
    IgnoreDomNode,
    AlterDomData,
    AlterDomChildren,
    AlterDomElement,
    OnDocumentMetadataLoaded,
}

impl ConfigField {
    pub const ALL: [ConfigField; 20] = [
        Self::TagsStyles,
        Self::ClassesStyles,
        Self::IdsStyles,
        Self::BaseStyle,
        Self::EnableUserAgentStyles,
        Self::EnableCssInlineProcessing,
        Self::IgnoredTags,
        Self::IgnoredStyles,
        Self::AllowedStyles,
        Self::HtmlParserOptions,
        Self::Renderers,
        Self::FallbackFonts,
        Self::SystemFonts,
        Self::EmSize,
        Self::TriggerInvalidationPropNames,
        Self::IgnoreDomNode,
        Self::AlterDomData,
        Self::AlterDomChildren,
        Self::AlterDomElement,
        Self::OnDocumentMetadataLoaded,
    ];

    /// Fields that always trigger a rebuild: they shape the parser, the
    /// compiled cascade or the registry.
    pub const ESSENTIAL: [ConfigField; 11] = [
        Self::Renderers,
        Self::HtmlParserOptions,
        Self::TagsStyles,
        Self::ClassesStyles,
        Self::IdsStyles,
        Self::BaseStyle,
        Self::EnableUserAgentStyles,
        Self::EnableCssInlineProcessing,
        Self::IgnoredStyles,
        Self::AllowedStyles,
        Self::EmSize,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::TagsStyles => "tagsStyles",
            Self::ClassesStyles => "classesStyles",
            Self::IdsStyles => "idsStyles",
            Self::BaseStyle => "baseStyle",
            Self::EnableUserAgentStyles => "enableUserAgentStyles",
            Self::EnableCssInlineProcessing => "enableCSSInlineProcessing",
            Self::IgnoredTags => "ignoredTags",
            Self::IgnoredStyles => "ignoredStyles",
            Self::AllowedStyles => "allowedStyles",
            Self::HtmlParserOptions => "htmlParserOptions",
            Self::Renderers => "renderers",
            Self::FallbackFonts => "fallbackFonts",
            Self::SystemFonts => "systemFonts",
            Self::EmSize => "emSize",
            Self::TriggerInvalidationPropNames => "triggerTREInvalidationPropNames",
            Self::IgnoreDomNode => "ignoreDOMNode",
            Self::AlterDomData => "alterDOMData",
            Self::AlterDomChildren => "alterDOMChildren",
            Self::AlterDomElement => "alterDOMElement",
            Self::OnDocumentMetadataLoaded => "onDocumentMetadataLoaded",
        }
    }

    pub fn is_essential(self) -> bool {
        Self::ESSENTIAL.contains(&self)
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigField {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| ConfigError::UnknownField(s.to_string()))
    }
}

impl TryFrom<String> for ConfigField {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ConfigField> for String {
    fn from(field: ConfigField) -> Self {
        field.name().to_string()
    }
}
