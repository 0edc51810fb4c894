//! Comprehensive tests for tre-html
//!
//! Document structure, attributes and text recovered from typical markup.

use tre_html::{HtmlParser, ParserOptions};

#[test]
fn test_parse_minimal_html() {
    let doc = HtmlParser::default().parse("");
    assert!(doc.tree().len() >= 1, "Even empty HTML should have root");
    // html5ever always synthesizes the skeleton
    let body = doc.body().expect("body is implied");
    assert!(doc.tree().child_ids(body).is_empty());
}

#[test]
fn test_parse_text_only() {
    let doc = HtmlParser::default().parse("Hello World");
    let body = doc.body().unwrap();
    assert_eq!(doc.tree().text_content(body), "Hello World");
}

#[test]
fn test_parse_with_attributes() {
    let html = r#"
        <div id="main" class="container primary" data-value="123">
            <a href="https://example.com" target="_blank">Link</a>
        </div>
    "#;

    let doc = HtmlParser::default().parse(html);
    let div = doc.get_element_by_id("main").unwrap();
    let elem = doc.tree().get(div).unwrap().as_element().unwrap();
    assert_eq!(elem.classes, vec!["container", "primary"]);
    assert_eq!(elem.get_attr("data-value"), Some("123"));

    let a = doc.tree().find_element(div, "a").unwrap();
    assert_eq!(doc.tree().parent(a), Some(div));
}

#[test]
fn test_parse_head_content() {
    let html = r#"
        <html lang="en">
            <head>
                <title>  Release notes </title>
                <meta name="author" content="someone">
                <style>.foo { color: blue; }</style>
            </head>
            <body>
                <p>Content</p>
            </body>
        </html>
    "#;

    let doc = HtmlParser::default().parse(html);
    assert_eq!(doc.title().as_deref(), Some("Release notes"));
    let head = doc.head().unwrap();
    assert!(doc.tree().find_element(head, "meta").is_some());
    assert!(doc.tree().find_element(doc.body().unwrap(), "p").is_some());
}

#[test]
fn test_parse_entities() {
    let html = r#"<p>&lt;tag&gt; &amp; &quot;quotes&quot; &#169;</p>"#;
    let doc = HtmlParser::default().parse(html);
    let p = doc.tree().find_element(doc.tree().root(), "p").unwrap();
    assert_eq!(doc.tree().text_content(p), "<tag> & \"quotes\" \u{a9}");
}

#[test]
fn test_parse_entities_verbatim() {
    let html = r#"<p>&lt;tag&gt; &#169;</p>"#;
    let parser = HtmlParser::new(ParserOptions { decode_entities: false, ..Default::default() });
    let doc = parser.parse(html);
    let p = doc.tree().find_element(doc.tree().root(), "p").unwrap();
    assert_eq!(doc.tree().text_content(p), "&lt;tag&gt; &#169;");
}

#[test]
fn test_parse_comments_kept_in_dom() {
    let html = r#"<div><!-- note --><p>Content</p></div>"#;
    let doc = HtmlParser::default().parse(html);
    let div = doc.tree().find_element(doc.tree().root(), "div").unwrap();
    let kinds: Vec<bool> = doc.tree().children(div).map(|(_, n)| n.is_element()).collect();
    assert_eq!(kinds, vec![false, true]);
}

#[test]
fn test_parse_large_document() {
    let mut html = String::from("<html><body>");
    for i in 0..1000 {
        html.push_str(&format!(
            r#"<div id="div-{}" class="item"><p>Paragraph {}</p></div>"#,
            i, i
        ));
    }
    html.push_str("</body></html>");

    let doc = HtmlParser::default().parse(&html);

    // 1000 divs, 1000 paragraphs, 1000 texts plus the skeleton
    assert!(doc.tree().len() > 3000);
    assert!(doc.get_element_by_id("div-999").is_some());
}

#[test]
fn test_parse_list() {
    let html = "<ul>\n\t<li>Sneaky</li>\n\t<li>Beaky</li>\n\t<li>Like</li>\n</ul>";
    let doc = HtmlParser::default().parse(html);
    let ul = doc.tree().find_element(doc.tree().root(), "ul").unwrap();
    let items: Vec<_> = doc.tree()
        .children(ul)
        .filter(|(_, n)| n.tag_name() == Some("li"))
        .map(|(id, _)| doc.tree().text_content(id))
        .collect();
    assert_eq!(items, vec!["Sneaky", "Beaky", "Like"]);
}
