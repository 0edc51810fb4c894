//! Integration tests - Full pipeline from HTML to transient tree
//!
//! Tests the complete workflow: HTML → DOM → cascade → Transient Tree,
//! plus engine sharing through the provider.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tre_css::{StyleDeclarations, StyleValue};
use tre_dom::DomTree;
use tre_engine::{
    ambient_engine, get_or_build_engine, transform, ConfigField, ContentModel, EngineConfig,
    EngineProvider, HookKind, RendererDescriptor, TransformError, TransientKind, TransientNode,
    TransientRenderEngine,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn styles(pairs: &[(&str, &str)]) -> StyleDeclarations {
    pairs.iter().map(|(k, v)| (*k, StyleValue::from_css(v))).collect()
}

fn tags(root: &TransientNode) -> Vec<&str> {
    root.descendants().filter_map(TransientNode::tag).collect()
}

// ============================================================================
// END-TO-END
// ============================================================================

#[test]
fn test_list_scenario() {
    init_tracing();
    let config = EngineConfig::default().with_tag_style("ul", styles(&[("listStyleType", "circle")]));
    let tree = transform("<ul><li>Sneaky</li><li>Beaky</li></ul>", &config).unwrap();

    let root = tree.root();
    assert_eq!(root.kind, TransientKind::Document);
    assert_eq!(root.computed.font_size(), Some(14.0));

    let ul = root.find("ul").unwrap();
    assert_eq!(ul.styles.get("listStyleType"), Some(&StyleValue::from("circle")));

    let items: Vec<_> = ul.children.iter().collect();
    assert_eq!(items.len(), 2);
    let texts: Vec<_> = items.iter().map(|li| li.text_content()).collect();
    assert_eq!(texts, vec!["Sneaky", "Beaky"]);
    for li in items {
        let text = &li.children[0];
        assert!(text.is_text());
        assert_eq!(text.computed.font_size(), Some(14.0));
    }
}

#[test]
fn test_empty_input_is_root_only() {
    let tree = transform("", &EngineConfig::default()).unwrap();
    assert!(tree.is_empty());
    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.root().kind, TransientKind::Document);
}

#[test]
fn test_transform_is_deterministic() {
    let config = EngineConfig::default()
        .with_class_style("note", styles(&[("color", "gray"), ("fontSize", "1.5em")]));
    let html = r#"<div class="note"><p>One <b>two</b></p><p style="text-align: right">three</p></div>"#;
    let engine = TransientRenderEngine::new(config).unwrap();

    let a = engine.transform_document(html).unwrap();
    let b = engine.transform_document(html).unwrap();
    assert_eq!(a.root(), b.root());
    assert_eq!(a.node_count(), b.node_count());
}

#[test]
fn test_head_is_not_rendered() {
    let html = "<html><head><title>Doc</title><style>p { color: red }</style></head><body><p>Body</p></body></html>";
    let tree = transform(html, &EngineConfig::default()).unwrap();
    assert_eq!(tags(tree.root()), vec!["p"]);
    assert_eq!(tree.root().text_content(), "Body");
    assert_eq!(tree.metadata().title.as_deref(), Some("Doc"));
}

#[test]
fn test_comments_are_dropped() {
    let tree = transform("<p>a<!-- hidden -->b</p>", &EngineConfig::default()).unwrap();
    let p = tree.root().find("p").unwrap();
    assert_eq!(p.text_content(), "ab");
}

#[test]
fn test_transient_nodes_reach_their_source() {
    let tree = transform(r#"<p id="x">hi</p>"#, &EngineConfig::default()).unwrap();
    let p = tree.root().find("p").unwrap();
    let source = tree.source(p).and_then(|n| n.as_element()).unwrap();
    assert_eq!(source.id.as_deref(), Some("x"));
    assert_eq!(p.attr("id"), Some("x"));
}

#[test]
fn test_deep_nesting_is_flattened() {
    init_tracing();
    let depth = 3000;
    let html = format!("{}deep{}", "<div>".repeat(depth), "</div>".repeat(depth));
    let tree = transform(&html, &EngineConfig::default()).unwrap();

    let mut levels = 0;
    let mut node = tree.root();
    while let Some(child) = node.children.first() {
        node = child;
        levels += 1;
    }
    assert!(levels < depth);
    assert_eq!(node.text(), Some("deep"));
    assert_eq!(tree.root().text_content(), "deep");
}

// ============================================================================
// CASCADE
// ============================================================================

fn precedence_config(user_agent: bool) -> EngineConfig {
    EngineConfig {
        enable_user_agent_styles: user_agent,
        ..EngineConfig::default()
    }
    .with_tag_style("center", styles(&[("textAlign", "left")]))
    .with_class_style("c", styles(&[("textAlign", "right")]))
}

fn text_align(config: &EngineConfig, html: &str) -> Option<StyleValue> {
    let tree = transform(html, config).unwrap();
    tree.root().find("center").and_then(|n| n.styles.get("textAlign").cloned())
}

#[test]
fn test_cascade_precedence() {
    let config = precedence_config(true);
    let inline = r#"<center class="c" style="text-align: justify">x</center>"#;
    assert_eq!(text_align(&config, inline), Some(StyleValue::from("justify")));
    assert_eq!(text_align(&config, r#"<center class="c">x</center>"#), Some(StyleValue::from("right")));
    assert_eq!(text_align(&config, "<center>x</center>"), Some(StyleValue::from("left")));

    let ua_only = EngineConfig::default();
    assert_eq!(text_align(&ua_only, "<center>x</center>"), Some(StyleValue::from("center")));

    let nothing = precedence_config(false);
    let nothing = EngineConfig { tags_styles: Default::default(), ..nothing };
    assert_eq!(text_align(&nothing, "<center>x</center>"), None);
}

#[test]
fn test_id_beats_class() {
    let config = precedence_config(true).with_id_style("main", styles(&[("textAlign", "center")]));
    let html = r#"<center class="c" id="main">x</center>"#;
    assert_eq!(text_align(&config, html), Some(StyleValue::from("center")));
}

#[test]
fn test_inline_processing_toggle() {
    let config = EngineConfig {
        enable_css_inline_processing: false,
        ..EngineConfig::default()
    };
    let tree = transform(r#"<p style="font-size: 30px">x</p>"#, &config).unwrap();
    let p = tree.root().find("p").unwrap();
    assert!(!p.styles.contains("fontSize"));
    assert_eq!(p.computed.font_size(), Some(14.0));
}

#[test]
fn test_style_filtering_regardless_of_order() {
    let html = r#"<p style="color: red; font-size: 20px">x</p>"#;
    let ignored: BTreeSet<String> = ["color", "fontSize"].map(String::from).into();
    let allowed: BTreeSet<String> = ["color"].map(String::from).into();

    let config = EngineConfig {
        ignored_styles: ignored,
        allowed_styles: Some(allowed),
        ..EngineConfig::default()
    };
    let tree = transform(html, &config).unwrap();
    let p = tree.root().find("p").unwrap();
    assert!(p.styles.contains("color"));
    assert!(!p.styles.contains("fontSize"));
    for node in tree.root().descendants() {
        assert!(!node.styles.contains("fontSize"));
    }

    let json = EngineConfig::from_json(
        r#"{"allowedStyles": ["color"], "ignoredStyles": ["fontSize", "color"]}"#,
    )
    .unwrap();
    let from_json = transform(html, &json).unwrap();
    assert_eq!(from_json.root().find("p").unwrap().styles, p.styles);
}

#[test]
fn test_text_inherits_from_parent() {
    let tree = transform(r#"<p style="font-size: 20px; margin-top: 4px">x</p>"#, &EngineConfig::default()).unwrap();
    let text = &tree.root().find("p").unwrap().children[0];
    assert_eq!(text.computed.font_size(), Some(20.0));
    assert!(!text.computed.contains("marginTop"));
    assert!(text.styles.is_empty());
}

#[test]
fn test_em_resolves_against_parent() {
    let config = EngineConfig::default().with_class_style("big", styles(&[("fontSize", "2em")]));
    let tree = transform(r#"<div class="big"><span class="big">x</span></div>"#, &config).unwrap();
    let div = tree.root().find("div").unwrap();
    let span = tree.root().find("span").unwrap();
    assert_eq!(div.computed.font_size(), Some(28.0));
    assert_eq!(span.computed.font_size(), Some(56.0));
}

#[test]
fn test_em_skips_unresolved_parent_size() {
    let html = r#"<div style="font-size: 20px"><p style="font-size: 2vw"><span style="font-size: 2em">x</span></p></div>"#;
    let tree = transform(html, &EngineConfig::default()).unwrap();
    let p = tree.root().find("p").unwrap();
    let span = tree.root().find("span").unwrap();
    assert_eq!(p.computed.get("fontSize"), Some(&StyleValue::from("2vw")));
    assert_eq!(span.computed.font_size(), Some(40.0));
}

#[test]
fn test_html_element_styles_reach_root() {
    let config = EngineConfig::default()
        .with_tag_style("html", styles(&[("color", "navy")]))
        .with_tag_style("body", styles(&[("color", "black")]));
    let html = r#"<html style="text-align: center"><body><p>x</p></body></html>"#;
    let tree = transform(html, &config).unwrap();

    let root = tree.root();
    assert_eq!(root.styles.get("textAlign"), Some(&StyleValue::from("center")));
    assert_eq!(root.styles.get("color"), Some(&StyleValue::from("black")));
    assert_eq!(root.find("p").unwrap().computed.get("textAlign"), Some(&StyleValue::from("center")));
}

// ============================================================================
// WHITESPACE
// ============================================================================

#[test]
fn test_whitespace_collapses() {
    let html = "<div>\n  <p>  Hello \n  world  </p>\n  <p>again</p>\n</div>";
    let tree = transform(html, &EngineConfig::default()).unwrap();
    let div = tree.root().find("div").unwrap();
    assert_eq!(div.children.len(), 2);
    assert_eq!(div.children[0].text_content(), "Hello world");
}

#[test]
fn test_pre_keeps_whitespace() {
    let tree = transform("<pre>a   b\n  c</pre>", &EngineConfig::default()).unwrap();
    assert_eq!(tree.root().find("pre").unwrap().text_content(), "a   b\n  c");
}

// ============================================================================
// HOOKS
// ============================================================================

#[test]
fn test_ignored_tags_unwrap() {
    let mut config = EngineConfig::default();
    config.ignored_tags.insert("b".to_string());
    let tree = transform("<div><b>x</b></div>", &config).unwrap();

    let div = tree.root().find("div").unwrap();
    assert_eq!(div.children.len(), 1);
    assert_eq!(div.children[0].text(), Some("x"));
    assert!(tree.root().find("b").is_none());
}

#[test]
fn test_ignore_dom_node_drops_subtree() {
    let config = EngineConfig::default()
        .with_ignore_dom_node(|tree, id| Ok(tree.tag_name(id) == Some("b")));
    let tree = transform("<div><b>x</b></div>", &config).unwrap();

    let div = tree.root().find("div").unwrap();
    assert!(div.children.is_empty());
    assert_eq!(tree.root().text_content(), "");
}

#[test]
fn test_alter_dom_data() {
    let config = EngineConfig::default()
        .with_alter_dom_data(|tree, id| Ok(tree.get(id).and_then(|n| n.as_text()).map(str::to_uppercase)));
    let tree = transform("<p>quiet <i>please</i></p>", &config).unwrap();
    assert_eq!(tree.root().text_content(), "QUIET PLEASE");
}

#[test]
fn test_alter_dom_children_reorders() {
    let config = EngineConfig::default().with_alter_dom_children(|tree, id| {
        if tree.tag_name(id) != Some("ol") {
            return Ok(None);
        }
        let mut children = tree.child_ids(id);
        children.reverse();
        Ok(Some(children))
    });
    let tree = transform("<ol><li>1</li><li>2</li><li>3</li></ol>", &config).unwrap();
    let ol = tree.root().find("ol").unwrap();
    let order: Vec<_> = ol.children.iter().map(|li| li.text_content()).collect();
    assert_eq!(order, vec!["3", "2", "1"]);
}

#[test]
fn test_alter_dom_children_moving_a_sibling_builds_it_once() {
    let config = EngineConfig::default().with_alter_dom_children(|tree, id| {
        if tree.tag_name(id) != Some("div") {
            return Ok(None);
        }
        let Some(parent) = tree.parent(id) else {
            return Ok(None);
        };
        let next = tree.child_ids(parent).into_iter().skip_while(|&s| s != id).nth(1);
        let mut children = tree.child_ids(id);
        children.extend(next);
        Ok(Some(children))
    });
    let tree = transform("<div>a</div><p>b</p>", &config).unwrap();

    assert_eq!(tree.root().find_all("p").count(), 1);
    assert_eq!(tree.root().text_content(), "ab");
    let div = tree.root().find("div").unwrap();
    assert_eq!(div.children.last().and_then(TransientNode::tag), Some("p"));
}

#[test]
fn test_alter_dom_element_wraps_without_refiltering() {
    let mut config = EngineConfig::default()
        .with_tag_style("span", styles(&[("color", "purple")]))
        .with_alter_dom_element(|tree: &mut DomTree, id| {
            if tree.tag_name(id) != Some("em") {
                return Ok(None);
            }
            let span = tree.create_element("span");
            tree.append_child(span, id)?;
            Ok(Some(span))
        });
    // the substitute's tag is ignored, but substitutes are not filtered again
    config.ignored_tags.insert("span".to_string());

    let tree = transform("<p><em>x</em></p>", &config).unwrap();
    let p = tree.root().find("p").unwrap();
    assert_eq!(tags(p), vec!["p", "span", "em"]);

    let span = &p.children[0];
    assert_eq!(span.styles.get("color"), Some(&StyleValue::from("purple")));
    assert_eq!(span.children[0].tag(), Some("em"));
    assert_eq!(span.text_content(), "x");
}

#[test]
fn test_alter_dom_element_substitute_skips_ignore_hook() {
    let config = EngineConfig::default()
        .with_ignore_dom_node(|tree, id| Ok(tree.tag_name(id) == Some("section")))
        .with_alter_dom_element(|tree: &mut DomTree, id| {
            if tree.tag_name(id) != Some("em") {
                return Ok(None);
            }
            let section = tree.create_element("section");
            tree.append_child(section, id)?;
            Ok(Some(section))
        });

    let tree = transform("<div><em>x</em><section>dropped</section></div>", &config).unwrap();
    let div = tree.root().find("div").unwrap();
    assert_eq!(tags(div), vec!["div", "section", "em"]);
    assert_eq!(div.text_content(), "x");
}

#[test]
fn test_hook_failure_propagates() {
    let config = EngineConfig::default().with_ignore_dom_node(|tree, id| {
        if tree.tag_name(id) == Some("b") {
            anyhow::bail!("cannot decide on <b>");
        }
        Ok(false)
    });
    let err = transform("<p><b>x</b></p>", &config).unwrap_err();
    match err {
        TransformError::Hook { hook, source } => {
            assert_eq!(hook, HookKind::IgnoreDomNode);
            assert!(source.to_string().contains("cannot decide"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_metadata_listener_fires_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let title = Arc::new(Mutex::new(None));
    let config = {
        let calls = Arc::clone(&calls);
        let title = Arc::clone(&title);
        EngineConfig::default().with_document_metadata_listener(move |metadata| {
            calls.fetch_add(1, Ordering::SeqCst);
            *title.lock().unwrap() = metadata.title.clone();
        })
    };

    let html = r#"<html lang="en"><head><title>Hello</title></head><body><p>x</p></body></html>"#;
    let tree = transform(html, &config).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(title.lock().unwrap().as_deref(), Some("Hello"));
    assert_eq!(tree.metadata().lang.as_deref(), Some("en"));
}

#[test]
fn test_metadata_listener_skipped_on_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let config = EngineConfig::default()
        .with_document_metadata_listener(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .with_alter_dom_data(|_, _| Err(anyhow::anyhow!("nope")));

    assert!(transform("<p>x</p>", &config).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// PARSER OPTIONS
// ============================================================================

#[test]
fn test_entity_decoding_toggle() {
    let html = "<p>Fish &amp; chips</p>";
    let decoded = transform(html, &EngineConfig::default()).unwrap();
    assert_eq!(decoded.root().text_content(), "Fish & chips");

    let mut config = EngineConfig::default();
    config.html_parser_options.decode_entities = false;
    let raw = transform(html, &config).unwrap();
    assert_eq!(raw.root().text_content(), "Fish &amp; chips");
}

// ============================================================================
// ENGINE SHARING
// ============================================================================

#[test]
fn test_provider_shares_engine() {
    init_tracing();
    let config = EngineConfig::default();
    let mut provider = EngineProvider::new(config.clone()).unwrap();

    let first = provider.engine();
    let second = provider.engine();
    assert!(Arc::ptr_eq(&first, &second));

    let same = provider.update(config.clone()).unwrap();
    assert!(Arc::ptr_eq(&first, &same));

    // value-equal configuration built separately
    let rebuilt_config = EngineConfig::default();
    assert!(Arc::ptr_eq(&first, &provider.update(rebuilt_config).unwrap()));
}

#[test]
fn test_listed_field_change_rebuilds() {
    let config = EngineConfig {
        trigger_invalidation_prop_names: vec![ConfigField::IgnoredTags],
        ..EngineConfig::default()
    };
    let mut provider = EngineProvider::new(config.clone()).unwrap();
    let before = provider.engine();

    let mut changed = config.clone();
    changed.ignored_tags.insert("b".to_string());
    let after = provider.update(changed).unwrap();
    assert!(!Arc::ptr_eq(&before, &after));

    // readers holding the old engine keep a consistent one
    assert!(before.config().ignored_tags.is_empty());
    assert!(after.config().ignored_tags.contains("b"));
}

#[test]
fn test_unlisted_field_change_reuses() {
    let config = EngineConfig::default();
    let mut provider = EngineProvider::new(config.clone()).unwrap();
    let before = provider.engine();

    let mut changed = config;
    changed.ignored_tags.insert("b".to_string());
    changed.fallback_fonts.insert("serif".to_string(), "Georgia".to_string());
    let after = provider.update(changed).unwrap();
    assert!(Arc::ptr_eq(&before, &after));
}

#[test]
fn test_renderers_change_rebuilds_registry() {
    let config = EngineConfig::default();
    let engine = get_or_build_engine(None, config.clone()).unwrap();
    assert_eq!(engine.registry().lookup("img").name, "generic");

    let mut changed = config;
    changed
        .renderers
        .insert("img".to_string(), RendererDescriptor::new("image", ContentModel::None));
    let rebuilt = get_or_build_engine(Some(&engine), changed).unwrap();
    assert!(!Arc::ptr_eq(&engine, &rebuilt));
    assert_eq!(rebuilt.registry().lookup("img").name, "image");
    assert_eq!(rebuilt.registry().lookup("p"), rebuilt.registry().fallback());
}

#[test]
fn test_ambient_engine() {
    init_tracing();
    let provider = EngineProvider::new(EngineConfig::default()).unwrap();
    assert!(Arc::ptr_eq(&ambient_engine(Some(&provider)), &provider.engine()));

    let fallback = ambient_engine(None);
    let tree = fallback.transform_document("<b>x</b>").unwrap();
    assert!(tree.root().find("b").unwrap().styles.is_empty());
}
