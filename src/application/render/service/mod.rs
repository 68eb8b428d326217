mod blocks;
mod config;
mod entities;
mod escape;
mod inline;

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::debug;

use crate::application::render::types::{DocumentRenderer, RenderOutput};
use crate::domain::document::Document;

pub use escape::{escape_text, escape_value};
pub use inline::parse_inline;

use blocks::render_block;

/// Block renderer producing utility-classed markup for rich documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockRenderer;

impl BlockRenderer {
    pub fn new() -> Self {
        Self
    }
}

static RENDER_SERVICE: Lazy<Arc<BlockRenderer>> = Lazy::new(|| Arc::new(BlockRenderer::new()));

/// Access the shared render service instance, initialised on first use.
pub fn render_service() -> Arc<BlockRenderer> {
    Arc::clone(&RENDER_SERVICE)
}

impl DocumentRenderer for BlockRenderer {
    fn render(&self, document: &Document) -> RenderOutput {
        let mut html = String::new();
        let mut blocks_rendered = 0;
        let mut blocks_skipped = document.skipped();

        for block in document.blocks() {
            if render_block(block, &mut html) {
                blocks_rendered += 1;
            } else {
                blocks_skipped += 1;
            }
        }

        if blocks_skipped > 0 {
            debug!(
                target = "reybex::render",
                blocks_rendered, blocks_skipped, "Skipped blocks while rendering document"
            );
        }

        RenderOutput {
            html,
            blocks_rendered,
            blocks_skipped,
        }
    }
}

/// Render a document with the shared renderer, returning markup only.
pub fn render(document: &Document) -> String {
    render_document(document).html
}

/// Render a document with the shared renderer.
pub fn render_document(document: &Document) -> RenderOutput {
    render_service().render(document)
}

/// Render a task description or comment body as delivered by the backend.
///
/// The body is normally a JSON string holding a block document, either
/// `{ "blocks": [...] }` or a bare block array. A JSON object with a string
/// `text` field, or a bare JSON string, is treated as inline text. Anything
/// else, plain text included, is inline-parsed as it stands.
pub fn render_description(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|parsed| render_parsed_description(&parsed))
        .unwrap_or_else(|| parse_inline(raw))
}

/// Like [`render_description`], for a body that was already decoded as
/// part of a larger payload.
pub fn render_description_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(raw) => render_description(raw),
        other => render_parsed_description(other).unwrap_or_default(),
    }
}

fn render_parsed_description(parsed: &Value) -> Option<String> {
    if Document::is_block_document(parsed) {
        return Some(render(&Document::from_value(parsed)));
    }
    match parsed {
        Value::Object(fields) => fields
            .get("text")
            .and_then(Value::as_str)
            .map(parse_inline),
        Value::String(text) => Some(parse_inline(text)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render_json(value: Value) -> String {
        render(&Document::from_value(&value))
    }

    #[test]
    fn renders_paragraph_with_inline_markup() {
        let html = render_json(json!({
            "blocks": [{ "type": "paragraph", "data": { "text": "Hello <b>world</b> & co" } }]
        }));
        assert_eq!(
            html,
            "<p class=\"mb-2 break-words overflow-wrap-anywhere\">Hello <b>world</b> &amp; co</p>"
        );
    }

    #[test]
    fn header_level_is_clamped() {
        let high = render_json(json!([{ "type": "header", "data": { "text": "T", "level": 9 } }]));
        assert!(high.starts_with("<h6 class=\"text-lg font-semibold"));
        assert!(high.ends_with("</h6>"));

        let low = render_json(json!([{ "type": "header", "data": { "text": "T", "level": 0 } }]));
        assert!(low.starts_with("<h1 class=\"text-2xl font-bold"));

        let missing = render_json(json!([{ "type": "header", "data": { "text": "T" } }]));
        assert!(missing.starts_with("<h1 "));

        let textual = render_json(json!([{ "type": "header", "data": { "text": "T", "level": "two" } }]));
        assert!(textual.starts_with("<h1 "));

        let second = render_json(json!([{ "type": "header", "data": { "text": "T", "level": 2 } }]));
        assert!(second.starts_with("<h2 class=\"text-xl font-bold"));
    }

    #[test]
    fn list_items_accept_strings_and_objects() {
        let html = render_json(json!([{
            "type": "list",
            "data": {
                "style": "ordered",
                "items": ["one", { "content": "<i>two</i>" }, { "other": 1 }, 4]
            }
        }]));
        assert!(html.starts_with("<ol class=\"mb-2 ml-4 list-decimal break-words\">"));
        assert!(html.contains(">one</li>"));
        assert!(html.contains("><i>two</i></li>"));
        assert_eq!(html.matches("<li ").count(), 4);
        assert!(html.ends_with("</ol>"));

        let unordered = render_json(json!([{ "type": "list", "data": { "items": ["x"] } }]));
        assert!(unordered.starts_with("<ul class=\"mb-2 ml-4 list-disc break-words\">"));
    }

    #[test]
    fn table_cells_are_escaped_not_parsed() {
        let html = render_json(json!([{
            "type": "table",
            "data": {
                "withHeadings": true,
                "content": [["<b>H</b>", "Qty"], "not a row", ["<script>", 3], [null, true]]
            }
        }]));
        assert!(html.contains(">&lt;b&gt;H&lt;/b&gt;</th>"));
        assert!(html.contains(">&lt;script&gt;</td>"));
        assert!(html.contains(">3</td>"));
        assert!(html.contains(">true</td>"));
        assert!(html.contains("\"></td>"));
        assert!(!html.contains("<b>"));
        assert_eq!(html.matches("<tr>").count(), 3);
        assert_eq!(html.matches("<thead>").count(), 1);
    }

    #[test]
    fn table_without_headings_puts_all_rows_in_body() {
        let html = render_json(json!([{
            "type": "table",
            "data": { "content": [["a"], ["b"]] }
        }]));
        assert!(!html.contains("<thead>"));
        assert!(!html.contains("<th "));
        assert_eq!(html.matches("<td ").count(), 2);
    }

    #[test]
    fn image_prefers_file_url_and_escapes_attributes() {
        let html = render_json(json!([{
            "type": "image",
            "data": {
                "file": { "url": "https://cdn.example/a.png?x=1&y=\"2\"" },
                "url": "https://ignored.example",
                "caption": "A <b>cat</b>"
            }
        }]));
        assert!(html.contains("src=\"https://cdn.example/a.png?x=1&amp;y=&quot;2&quot;\""));
        assert!(html.contains("alt=\"A &lt;b&gt;cat&lt;/b&gt;\""));
        assert!(html.contains("<p class=\"text-sm text-gray-600 italic mt-1\">A <b>cat</b></p>"));
    }

    #[test]
    fn image_falls_back_to_url_and_skips_when_missing() {
        let html = render_json(json!([{ "type": "image", "data": { "url": "b.png" } }]));
        assert!(html.contains("src=\"b.png\""));
        assert!(!html.contains("<p "));

        let document = Document::from_value(&json!([
            { "type": "image", "data": { "file": { "url": "" } } }
        ]));
        let output = render_document(&document);
        assert!(output.is_empty());
        assert_eq!(output.blocks_rendered, 0);
        assert_eq!(output.blocks_skipped, 1);
    }

    #[test]
    fn delimiter_code_and_quote_blocks() {
        let html = render_json(json!([
            { "type": "delimiter", "data": { "anything": true } },
            { "type": "code", "data": { "code": "if a < b && c { <b>x</b> }" } },
            { "type": "quote", "data": { "text": "Be <i>brief</i>", "caption": "Someone" } }
        ]));
        assert!(html.starts_with("<hr class=\"my-4 border-gray-300\" />"));
        assert!(html.contains("<code class=\"text-sm\">if a &lt; b &amp;&amp; c { &lt;b&gt;x&lt;/b&gt; }</code>"));
        assert!(html.contains(">Be <i>brief</i></p>"));
        assert!(html.contains(">\u{2014} Someone</cite></blockquote>"));

        let bare = render_json(json!([{ "type": "quote", "data": { "text": "q" } }]));
        assert!(!bare.contains("<cite"));
    }

    #[test]
    fn unknown_blocks_render_text_or_nothing() {
        let document = Document::from_value(&json!([
            { "type": "checklist", "data": { "text": "fallback" } },
            { "type": "embed", "data": { "service": "x" } }
        ]));
        let output = render_document(&document);
        assert_eq!(
            output.html,
            "<p class=\"mb-2 break-words overflow-wrap-anywhere\">fallback</p>"
        );
        assert_eq!(output.blocks_rendered, 1);
        assert_eq!(output.blocks_skipped, 1);
    }

    #[test]
    fn malformed_blocks_are_dropped() {
        let document = Document::from_value(&json!([
            { "data": { "text": "no type" } },
            { "type": "paragraph" },
            { "type": "paragraph", "data": null },
            { "type": "paragraph", "data": "string payload" },
            42
        ]));
        let output = render_document(&document);
        assert_eq!(
            output.html,
            "<p class=\"mb-2 break-words overflow-wrap-anywhere\"></p>"
        );
        assert_eq!(output.blocks_skipped, 4);
    }

    #[test]
    fn rendering_is_idempotent() {
        let document = Document::from_value(&json!([
            { "type": "paragraph", "data": { "text": "<b>unclosed &amp; <u>nested" } },
            { "type": "table", "data": { "content": [["<x>"]] } }
        ]));
        assert_eq!(render(&document), render(&document));
    }

    #[test]
    fn output_never_contains_live_disallowed_tags() {
        let hostile = "<script>x</script><img src=x onerror=alert(1)><iframe>&lt;script&gt;";
        let html = render_json(json!([
            { "type": "paragraph", "data": { "text": hostile } },
            { "type": "header", "data": { "text": hostile, "level": 2 } },
            { "type": "list", "data": { "items": [hostile] } },
            { "type": "quote", "data": { "text": hostile, "caption": hostile } },
            { "type": "image", "data": { "url": "x", "caption": hostile } },
            { "type": "mystery", "data": { "text": hostile } }
        ]));
        for tag in ["<script", "<img src=x", "<iframe"] {
            assert!(!html.contains(tag), "found {tag} in {html}");
        }
    }

    #[test]
    fn description_accepts_documents_text_objects_and_strings() {
        let document = r#"{"blocks":[{"type":"paragraph","data":{"text":"Hi"}}]}"#;
        assert_eq!(
            render_description(document),
            "<p class=\"mb-2 break-words overflow-wrap-anywhere\">Hi</p>"
        );
        assert_eq!(render_description(r#"{"text":"<b>t</b>"}"#), "<b>t</b>");
        assert_eq!(render_description(r#""<i>s</i>""#), "<i>s</i>");
        assert_eq!(render_description(""), "");
    }

    #[test]
    fn plain_descriptions_keep_allowed_formatting_only() {
        assert_eq!(
            render_description("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
        assert_eq!(
            render_description("Call <b>now</b> & <img src=x>"),
            "Call <b>now</b> &amp; &lt;img src=x&gt;"
        );
        assert_eq!(render_description("42"), "42");
        assert_eq!(render_description(r#"{"other":1}"#), r#"{"other":1}"#);
    }

    #[test]
    fn description_renders_bare_block_arrays() {
        let html = render_description(r#"[{"type":"paragraph","data":{"text":"Hi"}}]"#);
        assert_eq!(html, "<p class=\"mb-2 break-words overflow-wrap-anywhere\">Hi</p>");
        assert_eq!(
            render_description_value(&json!([{ "type": "delimiter", "data": {} }])),
            render(&Document::from_value(&json!([{ "type": "delimiter", "data": {} }])))
        );
    }

    #[test]
    fn description_value_handles_decoded_payloads() {
        assert_eq!(render_description_value(&Value::Null), "");
        assert_eq!(render_description_value(&json!({ "text": "plain" })), "plain");
        assert_eq!(
            render_description_value(&json!("{\"text\":\"nested\"}")),
            "nested"
        );
        assert_eq!(render_description_value(&json!(7)), "");
    }
}
