//! User-agent styles
//!
//! Built-in defaults mimicking a browser's baseline rendering, keyed by
//! tag name. Sizes relative to the font use `em` text so they resolve
//! against the inherited font size; fixed offsets are plain numbers.

use std::collections::HashMap;

use crate::StyleDeclarations;

/// Tags laid out as blocks. Used for whitespace collapsing and node kinds.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "center", "dd", "details",
    "dialog", "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "li",
    "main", "menu", "nav", "ol", "p", "pre", "section", "summary", "table", "tbody",
    "td", "tfoot", "th", "thead", "tr", "ul", "caption",
];

/// Whether the tag renders as a block by default
pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

/// Default declarations for each tag
#[derive(Debug, Clone)]
pub struct UserAgentStyles {
    by_tag: HashMap<&'static str, StyleDeclarations>,
}

impl UserAgentStyles {
    pub fn new() -> Self {
        let mut by_tag = HashMap::new();

        let bold = StyleDeclarations::new().with("fontWeight", "bold");
        let italic = StyleDeclarations::new().with("fontStyle", "italic");
        let underline = StyleDeclarations::new().with("textDecorationLine", "underline");
        let strike = StyleDeclarations::new().with("textDecorationLine", "line-through");
        let monospace = StyleDeclarations::new().with("fontFamily", "monospace");
        let block_margins = StyleDeclarations::new()
            .with("marginTop", "1em")
            .with("marginBottom", "1em");

        for tag in ["b", "strong"] {
            by_tag.insert(tag, bold.clone());
        }
        for tag in ["i", "em", "cite", "var", "dfn", "address"] {
            by_tag.insert(tag, italic.clone());
        }
        for tag in ["u", "ins"] {
            by_tag.insert(tag, underline.clone());
        }
        for tag in ["s", "strike", "del"] {
            by_tag.insert(tag, strike.clone());
        }
        for tag in ["code", "kbd", "samp", "tt"] {
            by_tag.insert(tag, monospace.clone());
        }

        by_tag.insert("a", StyleDeclarations::new()
            .with("color", "#245dc1")
            .with("textDecorationLine", "underline"));

        by_tag.insert("p", block_margins.clone());
        by_tag.insert("pre", monospace.clone()
            .with("whiteSpace", "pre")
            .with("marginTop", "1em")
            .with("marginBottom", "1em"));

        by_tag.insert("blockquote", block_margins.clone()
            .with("marginLeft", 40.0)
            .with("marginRight", 40.0));
        by_tag.insert("figure", block_margins.clone()
            .with("marginLeft", 40.0)
            .with("marginRight", 40.0));

        let headings: [(&'static str, &str, &str); 6] = [
            ("h1", "2em", "0.67em"),
            ("h2", "1.5em", "0.83em"),
            ("h3", "1.17em", "1em"),
            ("h4", "1em", "1.33em"),
            ("h5", "0.83em", "1.67em"),
            ("h6", "0.67em", "2.33em"),
        ];
        for (tag, size, margin) in headings {
            by_tag.insert(tag, StyleDeclarations::new()
                .with("fontSize", size)
                .with("fontWeight", "bold")
                .with("marginTop", margin)
                .with("marginBottom", margin));
        }

        let list = block_margins.clone().with("paddingLeft", 30.0);
        by_tag.insert("ul", list.clone().with("listStyleType", "disc"));
        by_tag.insert("menu", list.clone().with("listStyleType", "disc"));
        by_tag.insert("ol", list.with("listStyleType", "decimal"));
        by_tag.insert("dd", StyleDeclarations::new().with("marginLeft", 40.0));
        by_tag.insert("dl", block_margins);

        by_tag.insert("small", StyleDeclarations::new().with("fontSize", "smaller"));
        by_tag.insert("big", StyleDeclarations::new().with("fontSize", "larger"));
        by_tag.insert("sub", StyleDeclarations::new()
            .with("fontSize", "smaller")
            .with("verticalAlign", "sub"));
        by_tag.insert("sup", StyleDeclarations::new()
            .with("fontSize", "smaller")
            .with("verticalAlign", "super"));
        by_tag.insert("mark", StyleDeclarations::new()
            .with("backgroundColor", "yellow")
            .with("color", "black"));

        by_tag.insert("th", bold.clone().with("textAlign", "center"));
        by_tag.insert("center", StyleDeclarations::new().with("textAlign", "center"));
        by_tag.insert("hr", StyleDeclarations::new()
            .with("marginTop", "0.5em")
            .with("marginBottom", "0.5em")
            .with("height", 1.0)
            .with("backgroundColor", "#ccc"));

        Self { by_tag }
    }

    /// Defaults for a tag, if any
    pub fn get(&self, tag: &str) -> Option<&StyleDeclarations> {
        self.by_tag.get(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &StyleDeclarations)> {
        self.by_tag.iter().map(|(tag, decls)| (*tag, decls))
    }
}

impl Default for UserAgentStyles {
    fn default() -> Self {
        Self::new()
    }
}
