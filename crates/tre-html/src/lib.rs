//! tre HTML Parser
//!
//! Permissive HTML5 parser built on html5ever. Malformed markup never
//! aborts a parse; the result is whatever tree a browser would recover.

mod parser;

pub use parser::{HtmlParser, ParserOptions};
pub use tre_dom::{Document, DomTree, NodeId};

/// Parse an HTML string with default options
pub fn parse(html: &str) -> Document {
    HtmlParser::default().parse(html)
}
