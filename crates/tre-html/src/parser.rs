//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into the arena DOM.

use std::borrow::Cow;

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use serde::{Deserialize, Serialize};
use tre_dom::{Document, DomResult, DomTree, NodeId};

/// Parser knobs exposed through the engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserOptions {
    /// Decode character references (`&amp;`, `&#169;`). When off, entity
    /// text is kept verbatim in text and attribute values.
    pub decode_entities: bool,
    /// Parse `<noscript>` content as raw text, like a scripting browser.
    pub scripting_enabled: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            decode_entities: true,
            scripting_enabled: false,
        }
    }
}

/// HTML5 parser
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    options: ParserOptions,
}

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        tracing::debug!(
            bytes = html.len(),
            decode_entities = self.options.decode_entities,
            "Parsing HTML document"
        );

        let source = if self.options.decode_entities {
            Cow::Borrowed(html)
        } else {
            Cow::Owned(html.replace('&', "&amp;"))
        };

        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                scripting_enabled: self.options.scripting_enabled,
                ..Default::default()
            },
            ..Default::default()
        };
        let dom = parse_document(RcDom::default(), opts).one(source.as_ref());

        let mut document = Document::empty();
        let root = document.tree().root();
        if let Err(err) = self.convert_node(&dom.document, document.tree_mut(), root) {
            tracing::warn!(%err, "DOM conversion stopped early, keeping partial tree");
        }
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) -> DomResult<()> {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent)?;
                }
            }
            RcNodeData::Doctype { name, public_id, system_id } => {
                let id = tree.create_doctype(name, public_id, system_id);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Text { contents } => {
                let id = tree.create_text(&contents.borrow());
                tree.append_child(parent, id)?;
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                if let Some(elem) = tree.get_mut(id).and_then(|n| n.as_element_mut()) {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, attr.value.to_string());
                    }
                }
                tree.append_child(parent, id)?;

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id)?;
                }
            }
            RcNodeData::ProcessingInstruction { .. } => {
                // Not rendered
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::default().parse(html);

        assert!(doc.tree().len() > 1, "Expected more than 1 node, got {}", doc.tree().len());
        assert_eq!(doc.title().as_deref(), Some("Test"));
    }

    #[test]
    fn test_parse_fragment() {
        let html = "<div><span>Text</span></div>";
        let doc = HtmlParser::default().parse(html);

        // Fragments get wrapped in html/head/body by html5ever
        let body = doc.body().unwrap();
        let div = doc.tree().child_ids(body)[0];
        assert_eq!(doc.tree().tag_name(div), Some("div"));
        assert_eq!(doc.tree().text_content(div), "Text");
    }

    #[test]
    fn test_decode_entities_toggle() {
        let html = "<p title=\"a&amp;b\">&lt;x&gt;</p>";

        let decoded = HtmlParser::default().parse(html);
        let p = decoded.tree().find_element(decoded.tree().root(), "p").unwrap();
        assert_eq!(decoded.tree().text_content(p), "<x>");
        let attr = decoded.tree().get(p).unwrap().as_element().unwrap().get_attr("title");
        assert_eq!(attr, Some("a&b"));

        let raw = HtmlParser::new(ParserOptions { decode_entities: false, ..Default::default() }).parse(html);
        let p = raw.tree().find_element(raw.tree().root(), "p").unwrap();
        assert_eq!(raw.tree().text_content(p), "&lt;x&gt;");
        let attr = raw.tree().get(p).unwrap().as_element().unwrap().get_attr("title");
        assert_eq!(attr, Some("a&amp;b"));
    }
}
