//! Engine Instance Manager
//!
//! Builds engines, reuses them while the configuration has not changed in
//! a way that matters, and hands them out through a provider. Rebuilding
//! always creates a new engine; holders of the previous `Arc` keep a
//! consistent, if outdated, engine.

use std::sync::{Arc, OnceLock};

use crate::{ConfigError, ConfigField, EngineConfig, TransientRenderEngine};

/// Reuse `previous` unless `config` differs from its configuration in an
/// essential field or a field listed in `triggerTREInvalidationPropNames`
pub fn get_or_build_engine(
    previous: Option<&Arc<TransientRenderEngine>>,
    config: EngineConfig,
) -> Result<Arc<TransientRenderEngine>, ConfigError> {
    if let Some(previous) = previous {
        match changed_field(previous.config(), &config) {
            None => {
                tracing::trace!("Configuration unchanged, reusing engine");
                return Ok(Arc::clone(previous));
            }
            Some(field) => {
                tracing::debug!(%field, "Configuration changed, rebuilding engine");
            }
        }
    }
    Ok(Arc::new(TransientRenderEngine::new(config)?))
}

/// Whether switching from `old` to `new` requires a new engine
pub fn requires_rebuild(old: &EngineConfig, new: &EngineConfig) -> bool {
    changed_field(old, new).is_some()
}

fn changed_field(old: &EngineConfig, new: &EngineConfig) -> Option<ConfigField> {
    ConfigField::ESSENTIAL
        .iter()
        .chain(&old.trigger_invalidation_prop_names)
        .chain(&new.trigger_invalidation_prop_names)
        .copied()
        .find(|&field| !old.field_eq(new, field))
}

/// Holds the current engine for a group of consumers
///
/// Consumers take `Arc` clones from [`engine`](Self::engine); an
/// [`update`](Self::update) swaps the reference and never touches the
/// engine they already hold.
#[derive(Debug, Clone)]
pub struct EngineProvider {
    current: Arc<TransientRenderEngine>,
}

impl EngineProvider {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            current: get_or_build_engine(None, config)?,
        })
    }

    /// Current engine
    pub fn engine(&self) -> Arc<TransientRenderEngine> {
        Arc::clone(&self.current)
    }

    /// Apply a new configuration, rebuilding only when needed
    pub fn update(&mut self, config: EngineConfig) -> Result<Arc<TransientRenderEngine>, ConfigError> {
        self.current = get_or_build_engine(Some(&self.current), config)?;
        Ok(self.engine())
    }
}

/// Engine of the enclosing provider
///
/// Without a provider this is a wiring mistake: an error is logged and a
/// shared empty engine is returned so rendering can go on.
pub fn ambient_engine(provider: Option<&EngineProvider>) -> Arc<TransientRenderEngine> {
    static EMPTY: OnceLock<Arc<TransientRenderEngine>> = OnceLock::new();

    match provider {
        Some(provider) => provider.engine(),
        None => {
            tracing::error!("TransientRenderEngine provider is missing; falling back to an empty engine");
            Arc::clone(EMPTY.get_or_init(|| Arc::new(TransientRenderEngine::empty())))
        }
    }
}
