//! Style declaration sets
//!
//! An ordered property → value map. Merging overrides per property, never
//! wholesale, which is what makes the cascade layered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::properties::{normalize_property_name, StyleValue};

/// Property name → value mapping with normalized (camelCase) keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, StyleValue>", into = "BTreeMap<String, StyleValue>")]
pub struct StyleDeclarations {
    values: BTreeMap<String, StyleValue>,
}

impl StyleDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property; the name is normalized and later writes win
    pub fn insert(&mut self, name: &str, value: impl Into<StyleValue>) {
        self.values.insert(normalize_property_name(name), value.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, name: &str, value: impl Into<StyleValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&StyleValue> {
        match self.values.get(name) {
            Some(value) => Some(value),
            None => self.values.get(&normalize_property_name(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<StyleValue> {
        self.values.remove(&normalize_property_name(name))
    }

    /// Overlay `other` on top of `self`, property by property
    pub fn merge(&mut self, other: &StyleDeclarations) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), value.clone());
        }
    }

    /// Keep only properties for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &StyleValue) -> bool) {
        self.values.retain(|name, value| keep(name, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolved font size in pixels, when absolute
    pub fn font_size(&self) -> Option<f32> {
        self.values.get("fontSize").and_then(StyleValue::as_number)
    }
}

impl From<BTreeMap<String, StyleValue>> for StyleDeclarations {
    fn from(map: BTreeMap<String, StyleValue>) -> Self {
        map.into_iter().collect()
    }
}

impl From<StyleDeclarations> for BTreeMap<String, StyleValue> {
    fn from(declarations: StyleDeclarations) -> Self {
        declarations.values
    }
}

impl<K: AsRef<str>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleDeclarations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut declarations = Self::new();
        for (name, value) in iter {
            declarations.insert(name.as_ref(), value);
        }
        declarations
    }
}
