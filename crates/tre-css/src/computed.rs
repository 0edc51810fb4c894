//! Computed styles
//!
//! Turns a declared style into a computed one: inherited properties flow
//! down from the parent, `inherit`/`initial`/`unset` are applied, and
//! font-relative lengths are resolved to pixels.

use crate::{Length, LengthUnit, StyleDeclarations, StyleValue};

/// Unit resolution context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitContext {
    /// Root font size in pixels; the target of `rem` and `medium`
    pub em_size: f32,
    /// Nearest ancestor font size that resolved to pixels
    ///
    /// Used when the parent's own size is missing or stayed as text.
    pub font_size: f32,
}

impl UnitContext {
    pub fn new(em_size: f32) -> Self {
        Self {
            em_size,
            font_size: em_size,
        }
    }

    /// Context for the children of a node with the given computed style
    pub fn for_children(&self, computed: &StyleDeclarations) -> Self {
        Self {
            font_size: computed.font_size().unwrap_or(self.font_size),
            ..*self
        }
    }
}

impl Default for UnitContext {
    fn default() -> Self {
        Self::new(14.0)
    }
}

/// Properties that inherit by default
const INHERITED: &[&str] = &[
    "color",
    "direction",
    "fontFamily",
    "fontSize",
    "fontStyle",
    "fontVariant",
    "fontWeight",
    "letterSpacing",
    "lineHeight",
    "listStylePosition",
    "listStyleType",
    "textAlign",
    "textIndent",
    "textTransform",
    "visibility",
    "whiteSpace",
    "wordSpacing",
];

/// Whether a (camelCase) property inherits by default
pub fn inherits_by_default(property: &str) -> bool {
    INHERITED.contains(&property)
}

/// The subset of `computed` a child inherits without declaring anything
///
/// This is exactly what a text node carries.
pub fn inherited_styles(computed: &StyleDeclarations) -> StyleDeclarations {
    computed
        .iter()
        .filter(|(name, _)| inherits_by_default(name))
        .map(|(name, value)| (name, value.clone()))
        .collect()
}

/// Compute the style of a node from its parent's computed style and its
/// own declared style
pub fn compute_styles(
    parent: Option<&StyleDeclarations>,
    own: &StyleDeclarations,
    ctx: &UnitContext,
) -> StyleDeclarations {
    let mut computed = parent.map(inherited_styles).unwrap_or_default();
    let parent_font_size = parent.and_then(StyleDeclarations::font_size).unwrap_or(ctx.font_size);

    // Font size first: other em lengths resolve against it
    let mut font_size = parent_font_size;
    if let Some(value) = own.get("fontSize") {
        if value.is_keyword("inherit") {
            // already copied from the parent
        } else if value.is_keyword("initial") {
            font_size = ctx.em_size;
            computed.insert("fontSize", font_size);
        } else if value.is_keyword("unset") {
            // fontSize inherits, so unset behaves as inherit
        } else {
            match resolve_font_size(value, parent_font_size, ctx) {
                Some(px) => {
                    font_size = px;
                    computed.insert("fontSize", px);
                }
                None => {
                    tracing::trace!(%value, "Unresolvable font size kept as text");
                    computed.insert("fontSize", value.clone());
                }
            }
        }
    }

    for (name, value) in own.iter() {
        if name == "fontSize" {
            continue;
        }
        if value.is_keyword("inherit") {
            match parent.and_then(|p| p.get(name)) {
                Some(inherited) => computed.insert(name, inherited.clone()),
                None => {
                    computed.remove(name);
                }
            }
        } else if value.is_keyword("initial") {
            computed.remove(name);
        } else if value.is_keyword("unset") {
            if !inherits_by_default(name) {
                computed.remove(name);
            }
        } else {
            computed.insert(name, resolve_value(name, value, font_size, ctx));
        }
    }

    computed
}

/// Absolute font size in pixels, if the value can be resolved
fn resolve_font_size(value: &StyleValue, parent_font_size: f32, ctx: &UnitContext) -> Option<f32> {
    if let StyleValue::Text(text) = value {
        let keyword = text.trim().to_ascii_lowercase();
        let scale = match keyword.as_str() {
            "xx-small" => Some(0.6),
            "x-small" => Some(0.75),
            "small" => Some(0.89),
            "medium" => Some(1.0),
            "large" => Some(1.2),
            "x-large" => Some(1.5),
            "xx-large" => Some(2.0),
            "xxx-large" => Some(3.0),
            _ => None,
        };
        if let Some(scale) = scale {
            return Some(ctx.em_size * scale);
        }
        match keyword.as_str() {
            "smaller" => return Some(parent_font_size / 1.2),
            "larger" => return Some(parent_font_size * 1.2),
            _ => {}
        }
    }

    let length = value.as_length()?;
    Some(match length.unit {
        LengthUnit::Percent => length.value * parent_font_size / 100.0,
        _ => length_to_px(&length, parent_font_size, ctx),
    })
}

/// Resolve a non-font-size value against the node's own font size
fn resolve_value(name: &str, value: &StyleValue, font_size: f32, ctx: &UnitContext) -> StyleValue {
    let StyleValue::Text(text) = value else {
        return value.clone();
    };
    let Some(length) = Length::parse(text) else {
        return value.clone();
    };
    match length.unit {
        // line height percentages are relative to the font
        LengthUnit::Percent if name == "lineHeight" => {
            StyleValue::Number(length.value * font_size / 100.0)
        }
        // other percentages depend on layout
        LengthUnit::Percent => value.clone(),
        _ => StyleValue::Number(length_to_px(&length, font_size, ctx)),
    }
}

fn length_to_px(len: &Length, font_size: f32, ctx: &UnitContext) -> f32 {
    match len.unit {
        LengthUnit::Px => len.value,
        LengthUnit::Em => len.value * font_size,
        LengthUnit::Rem => len.value * ctx.em_size,
        LengthUnit::Pt => len.value * 4.0 / 3.0,
        LengthUnit::Percent => len.value * font_size / 100.0,
    }
}
