//! Engine errors

use std::fmt;

/// Failure building an engine from a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("emSize must be a positive finite number, got {0}")]
    InvalidEmSize(f32),

    #[error("unknown configuration field: {0}")]
    UnknownField(String),

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure transforming a document
///
/// Malformed markup and styles degrade locally; only caller-supplied hooks
/// can fail a transform.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("{hook} hook failed")]
    Hook {
        hook: HookKind,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TransformError {
    pub(crate) fn hook(hook: HookKind, source: impl Into<anyhow::Error>) -> Self {
        Self::Hook { hook, source: source.into() }
    }
}

/// Which DOM hook a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    IgnoreDomNode,
    AlterDomData,
    AlterDomChildren,
    AlterDomElement,
}

impl HookKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::IgnoreDomNode => "ignoreDOMNode",
            Self::AlterDomData => "alterDOMData",
            Self::AlterDomChildren => "alterDOMChildren",
            Self::AlterDomElement => "alterDOMElement",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
