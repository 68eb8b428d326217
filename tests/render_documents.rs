use serde_json::{Value, json};

use reybex::application::render::{
    DocumentRenderer, escape_text, parse_inline, render, render_description, render_document,
    render_service,
};
use reybex::domain::document::Document;

fn load_fixture() -> Value {
    serde_json::from_str(include_str!("fixtures/task_description.json")).expect("fixture json")
}

#[test]
fn task_description_fixture_matches_markup() {
    let output = render_document(&Document::from_value(&load_fixture()));

    let expected: String = include_str!("fixtures/task_description.html")
        .lines()
        .collect();
    assert_eq!(expected, output.html);
    assert_eq!(output.blocks_rendered, 7);
    assert_eq!(output.blocks_skipped, 1);
}

#[test]
fn description_string_renders_like_the_document() {
    let fixture = load_fixture();
    let raw = fixture.to_string();
    assert_eq!(
        render_description(&raw),
        render(&Document::from_value(&fixture))
    );
}

#[test]
fn rendering_is_idempotent_and_leaves_input_untouched() {
    let fixture = load_fixture();
    let before = fixture.clone();
    let document = Document::from_value(&fixture);

    let renderer = render_service();
    let first = renderer.render(&document);
    let second = renderer.render(&document);
    assert_eq!(first.html, second.html);
    assert_eq!(fixture, before);
}

#[test]
fn hostile_text_never_yields_live_markup() {
    let hostile = [
        "<script>alert(1)</script>",
        "<img src=x onerror=alert(1)>",
        "&lt;script&gt;alert(1)&lt;/script&gt;",
        "<b onclick=\"x\"",
        "<<b>>",
        "</b><iframe>",
        r#"<span a"><script>alert(1)</script>">x</span>"#,
        r#"<b x=y"><img src=x onerror=alert(1)>">hi</b>"#,
    ];

    for text in hostile {
        let doc = json!({ "blocks": [
            { "type": "paragraph", "data": { "text": text } },
            { "type": "quote", "data": { "text": text, "caption": text } },
            { "type": "list", "data": { "items": [text] } },
            { "type": "table", "data": { "content": [[text]] } },
            { "type": "code", "data": { "code": text } },
            { "type": "image", "data": { "url": text, "caption": text } }
        ]});
        let html = render(&Document::from_value(&doc));
        assert!(!html.contains("<script"), "{text} -> {html}");
        assert!(!html.contains("<img src=x"), "{text} -> {html}");
        assert!(!html.contains("<iframe"), "{text} -> {html}");
    }
}

#[test]
fn allow_listed_tags_pass_through_with_attributes() {
    assert_eq!(
        parse_inline("<span class=\"hl\">x</span><br/><BR /><strong>s</strong>"),
        "<span class=\"hl\">x</span><br/><BR /><strong>s</strong>"
    );
    assert_eq!(parse_inline("a&nbsp;b"), "a&nbsp;b");
    assert_eq!(parse_inline("<code>x < y</code>"), "<code>x &lt; y</code>");
}

#[test]
fn escape_text_is_safe_in_attributes() {
    assert_eq!(escape_text(""), "");
    assert_eq!(
        escape_text(r#"" onload='x' <a>&"#),
        "&quot; onload=&#39;x&#39; &lt;a&gt;&amp;"
    );
}

#[test]
fn bare_block_arrays_and_junk_are_accepted() {
    let bare = json!([{ "type": "delimiter", "data": {} }]);
    assert!(render(&Document::from_value(&bare)).starts_with("<hr"));

    let raw = r#"[{"type":"paragraph","data":{"text":"Hi"}}]"#;
    assert_eq!(
        render_description(raw),
        render(&Document::from_value(&json!([{ "type": "paragraph", "data": { "text": "Hi" } }])))
    );
    assert!(render_description(raw).starts_with("<p"));

    for junk in [json!(null), json!(42), json!("text"), json!({ "blocks": "no" })] {
        assert_eq!(render(&Document::from_value(&junk)), "");
    }
}
