//! tre Engine
//!
//! Turns HTML into a styled *transient tree* that native UI code can paint
//! without a browser.
//!
//! # Pipeline
//! html + [`EngineConfig`] → parser → DOM → transformer (hooks + cascade)
//! → [`TransientTree`] → paint layer (not part of this crate)
//!
//! # Example
//! ```rust,ignore
//! use tre_engine::{EngineConfig, EngineProvider};
//! use tre_css::StyleDeclarations;
//!
//! let config = EngineConfig::default()
//!     .with_tag_style("ul", StyleDeclarations::new().with("listStyleType", "circle"));
//! let provider = EngineProvider::new(config)?;
//! let tree = provider.engine().transform_document("<ul><li>Sneaky</li></ul>")?;
//! ```

mod config;
mod engine;
mod error;
pub mod hooks;
mod manager;
mod metadata;
mod registry;
mod transform;
mod tree;
mod whitespace;

pub use config::{ConfigField, EngineConfig};
pub use engine::TransientRenderEngine;
pub use error::{ConfigError, HookKind, TransformError};
pub use hooks::DomHooks;
pub use manager::{ambient_engine, get_or_build_engine, requires_rebuild, EngineProvider};
pub use metadata::{DocumentMetadata, MetaEntry};
pub use registry::{ContentModel, RendererDescriptor, RendererRegistry};
pub use transform::transform;
pub use tree::{Descendants, TransientKind, TransientNode, TransientTree};

// Re-export sub-crates for advanced usage
pub use tre_css as css;
pub use tre_dom as dom;
pub use tre_html as html;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
