//! Document metadata
//!
//! Information found in `<head>` and on `<html>`: never rendered, handed to
//! the host through the metadata listener.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tre_dom::{Document, NodeId};

/// One `<meta>` element, reduced to a name/value pair
///
/// The name comes from `name`, `property` or `http-equiv`; a `charset`
/// meta is reported as `charset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub title: Option<String>,
    /// `lang` attribute of `<html>`
    pub lang: Option<String>,
    /// `dir` attribute of `<html>`
    pub dir: Option<String>,
    /// `href` of the first `<base>`
    pub base_url: Option<String>,
    /// `target` of the first `<base>`
    pub base_target: Option<String>,
    pub meta: Vec<MetaEntry>,
    /// Attributes of every `<link>`, in document order
    pub links: Vec<BTreeMap<String, String>>,
}

impl DocumentMetadata {
    /// Collect metadata from a parsed document
    pub fn from_document(document: &Document) -> Self {
        let tree = document.tree();
        let mut metadata = Self {
            title: document.title().filter(|t| !t.is_empty()),
            ..Self::default()
        };

        if let Some(html) = document.document_element().and_then(|id| tree.get(id)).and_then(|n| n.as_element()) {
            metadata.lang = html.get_attr("lang").map(str::to_string);
            metadata.dir = html.get_attr("dir").map(str::to_string);
        }

        if let Some(head) = document.head() {
            metadata.collect_head(document, head);
        }
        metadata
    }

    fn collect_head(&mut self, document: &Document, head: NodeId) {
        let tree = document.tree();
        for (_, node) in tree.children(head) {
            let Some(elem) = node.as_element() else {
                continue;
            };
            match elem.name.as_str() {
                "base" if self.base_url.is_none() && self.base_target.is_none() => {
                    self.base_url = elem.get_attr("href").map(str::to_string);
                    self.base_target = elem.get_attr("target").map(str::to_string);
                }
                "meta" => {
                    let entry = if let Some(charset) = elem.get_attr("charset") {
                        Some(MetaEntry {
                            name: "charset".to_string(),
                            value: charset.to_string(),
                        })
                    } else {
                        ["name", "property", "http-equiv"]
                            .into_iter()
                            .find_map(|key| elem.get_attr(key))
                            .map(|name| MetaEntry {
                                name: name.to_string(),
                                value: elem.get_attr("content").unwrap_or_default().to_string(),
                            })
                    };
                    self.meta.extend(entry);
                }
                "link" => {
                    self.links.push(
                        elem.attrs
                            .iter()
                            .map(|attr| (attr.name.clone(), attr.value.clone()))
                            .collect(),
                    );
                }
                _ => {}
            }
        }
    }

    /// Value of the first meta entry with this name
    pub fn meta_value(&self, name: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.value.as_str())
    }
}
