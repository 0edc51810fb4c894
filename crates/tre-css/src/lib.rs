//! tre CSS - Style cascade
//!
//! Declaration sets, inline style parsing (cssparser + lightningcss), user-agent
//! defaults and the cascade that merges them per element:
//!
//! 1. `baseStyle` (document root only)
//! 2. user-agent defaults for the tag
//! 3. tag styles
//! 4. class styles, in `class` attribute order
//! 5. id styles
//! 6. inline `style` attribute
//!
//! Only tag, class and id matching is supported; there are no selectors.

mod cascade;
mod computed;
mod declarations;
mod parser;
mod policy;
pub mod properties;
pub mod user_agent;

pub use cascade::{CascadeOptions, StyleCascade};
pub use computed::{compute_styles, inherited_styles, inherits_by_default, UnitContext};
pub use declarations::StyleDeclarations;
pub use parser::parse_inline_style;
pub use policy::StylePolicy;
pub use properties::{normalize_property_name, Length, LengthUnit, StyleValue};

/// CSS parsing error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("invalid value for `{property}`: {message}")]
    InvalidDeclaration { property: String, message: String },
}
