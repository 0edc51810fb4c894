//! Style property names and values
//!
//! Property names are camelCase (`fontSize`), the form native style
//! objects use. Values are either numbers (absolute sizes in pixels,
//! weights, multipliers) or raw CSS text (`"1.5em"`, `"circle"`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// Unitless number; pixels for lengths
    Number(f32),
    /// Raw CSS text
    Text(String),
}

impl StyleValue {
    /// Build a value from CSS text, turning bare numbers into `Number`
    pub fn from_css(text: &str) -> Self {
        let text = text.trim();
        match text.parse::<f32>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(text.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            Self::Number(_) => None,
        }
    }

    /// Interpret as a length; numbers are pixels
    pub fn as_length(&self) -> Option<Length> {
        match self {
            Self::Number(n) => Some(Length::px(*n)),
            Self::Text(t) => Length::parse(t),
        }
    }

    /// Check for a CSS keyword, ignoring ASCII case
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.as_text().is_some_and(|t| t.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(t) => f.write_str(t),
        }
    }
}

impl From<f32> for StyleValue {
    fn from(n: f32) -> Self {
        Self::Number(n)
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        Self::Number(n as f32)
    }
}

impl From<i32> for StyleValue {
    fn from(n: i32) -> Self {
        Self::Number(n as f32)
    }
}

impl From<&str> for StyleValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// CSS length value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    pub fn px(value: f32) -> Self {
        Self { value, unit: LengthUnit::Px }
    }

    pub fn em(value: f32) -> Self {
        Self { value, unit: LengthUnit::Em }
    }

    pub fn percent(value: f32) -> Self {
        Self { value, unit: LengthUnit::Percent }
    }

    /// Parse `12px`, `1.5em`, `2rem`, `50%`, `10pt` or a bare number (px)
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let split = text
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(text.len());
        let (number, unit) = text.split_at(split);
        let value: f32 = number.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        let unit = match unit.to_ascii_lowercase().as_str() {
            "" | "px" => LengthUnit::Px,
            "em" => LengthUnit::Em,
            "rem" => LengthUnit::Rem,
            "%" => LengthUnit::Percent,
            "pt" => LengthUnit::Pt,
            _ => return None,
        };
        Some(Self { value, unit })
    }

    /// Whether the value depends on a font size
    pub fn is_font_relative(&self) -> bool {
        matches!(self.unit, LengthUnit::Em | LengthUnit::Rem)
    }
}

/// Length units understood by the resolver
///
/// Everything else (`vw`, `ch`, ...) stays raw text for the paint layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Em,
    Rem,
    Percent,
    Pt,
}

/// Normalize a property name to camelCase
///
/// `font-size` becomes `fontSize`, `-webkit-box` becomes `WebkitBox`.
/// Custom properties (`--x`) and names already in camelCase are kept.
pub fn normalize_property_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") || !name.contains('-') {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for (i, c) in name.chars().enumerate() {
        if c == '-' {
            // leading dash of a vendor prefix capitalizes the prefix
            upper_next = i == 0 || !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_property_name() {
        assert_eq!(normalize_property_name("font-size"), "fontSize");
        assert_eq!(normalize_property_name("fontSize"), "fontSize");
        assert_eq!(normalize_property_name("color"), "color");
        assert_eq!(normalize_property_name("list-style-type"), "listStyleType");
        assert_eq!(normalize_property_name("-webkit-line-clamp"), "WebkitLineClamp");
        assert_eq!(normalize_property_name("--brand-color"), "--brand-color");
        assert_eq!(normalize_property_name("Font-Weight"), "fontWeight");
    }

    #[test]
    fn test_parse_lengths() {
        assert_eq!(Length::parse("12px"), Some(Length::px(12.0)));
        assert_eq!(Length::parse("1.5em"), Some(Length::em(1.5)));
        assert_eq!(Length::parse("50%"), Some(Length::percent(50.0)));
        assert_eq!(Length::parse("-2"), Some(Length::px(-2.0)));
        assert_eq!(Length::parse("2REM").map(|l| l.unit), Some(LengthUnit::Rem));
        assert_eq!(Length::parse("10vw"), None);
        assert_eq!(Length::parse("auto"), None);
    }

    #[test]
    fn test_value_from_css() {
        assert_eq!(StyleValue::from_css(" 700 "), StyleValue::Number(700.0));
        assert_eq!(StyleValue::from_css("bold"), StyleValue::Text("bold".into()));
        assert!(StyleValue::from_css("Circle").is_keyword("circle"));
    }

    #[test]
    fn test_value_untagged_serde() {
        let n: StyleValue = serde_json::from_str("14").unwrap();
        assert_eq!(n, StyleValue::Number(14.0));
        let t: StyleValue = serde_json::from_str("\"circle\"").unwrap();
        assert_eq!(t, StyleValue::Text("circle".into()));
    }
}
