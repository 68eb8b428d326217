use serde_json::Value;

use crate::domain::document::{Block, BlockData, BlockKind};

use super::{
    config::{
        CODE_CLASS, CODE_PRE_CLASS, DELIMITER_HTML, IMAGE_CAPTION_CLASS, IMAGE_CLASS,
        IMAGE_WRAPPER_CLASS, LIST_ITEM_CLASS, MAX_HEADER_LEVEL, MIN_HEADER_LEVEL,
        ORDERED_LIST_CLASS, PARAGRAPH_CLASS, QUOTE_CITE_CLASS, QUOTE_CLASS, QUOTE_TEXT_CLASS,
        TABLE_CELL_CLASS, TABLE_CLASS, TABLE_HEAD_CELL_CLASS, TABLE_WRAPPER_CLASS,
        UNORDERED_LIST_CLASS, header_class,
    },
    escape::{escape_text, escape_value},
    inline::parse_inline,
};

/// Append the markup for one block. Returns `false` when the block
/// contributed nothing.
pub(crate) fn render_block(block: &Block, out: &mut String) -> bool {
    let before = out.len();
    let data = &block.data;
    match &block.kind {
        BlockKind::Paragraph => paragraph(data.text("text"), out),
        BlockKind::Header => header(data, out),
        BlockKind::List => list(data, out),
        BlockKind::Table => table(data, out),
        BlockKind::Image => image(data, out),
        BlockKind::Delimiter => out.push_str(DELIMITER_HTML),
        BlockKind::Code => code(data, out),
        BlockKind::Quote => quote(data, out),
        BlockKind::Unknown(_) => {
            let text = data.text("text");
            if !text.is_empty() {
                paragraph(text, out);
            }
        }
    }
    out.len() > before
}

fn paragraph(text: &str, out: &mut String) {
    out.push_str(&format!(
        "<p class=\"{PARAGRAPH_CLASS}\">{}</p>",
        parse_inline(text)
    ));
}

fn header(data: &BlockData, out: &mut String) {
    let level = data
        .integer("level")
        .unwrap_or(MIN_HEADER_LEVEL)
        .clamp(MIN_HEADER_LEVEL, MAX_HEADER_LEVEL);
    out.push_str(&format!(
        "<h{level} class=\"{}\">{}</h{level}>",
        header_class(level),
        parse_inline(data.text("text"))
    ));
}

fn list(data: &BlockData, out: &mut String) {
    let (tag, class) = if data.text("style") == "ordered" {
        ("ol", ORDERED_LIST_CLASS)
    } else {
        ("ul", UNORDERED_LIST_CLASS)
    };

    out.push_str(&format!("<{tag} class=\"{class}\">"));
    for item in data.array("items") {
        let content = match item {
            Value::String(text) => text.as_str(),
            Value::Object(fields) => fields.get("content").and_then(Value::as_str).unwrap_or(""),
            _ => "",
        };
        out.push_str(&format!(
            "<li class=\"{LIST_ITEM_CLASS}\">{}</li>",
            parse_inline(content)
        ));
    }
    out.push_str(&format!("</{tag}>"));
}

fn table(data: &BlockData, out: &mut String) {
    let rows: Vec<&[Value]> = data
        .array("content")
        .iter()
        .filter_map(|row| row.as_array().map(Vec::as_slice))
        .collect();

    out.push_str(&format!(
        "<div class=\"{TABLE_WRAPPER_CLASS}\"><table class=\"{TABLE_CLASS}\">"
    ));

    let body_rows = match rows.split_first() {
        Some((head, rest)) if data.flag("withHeadings") => {
            out.push_str("<thead><tr>");
            for cell in *head {
                out.push_str(&format!(
                    "<th class=\"{TABLE_HEAD_CELL_CLASS}\">{}</th>",
                    escape_value(cell)
                ));
            }
            out.push_str("</tr></thead>");
            rest
        }
        _ => rows.as_slice(),
    };

    out.push_str("<tbody>");
    for row in body_rows {
        out.push_str("<tr>");
        for cell in *row {
            out.push_str(&format!(
                "<td class=\"{TABLE_CELL_CLASS}\">{}</td>",
                escape_value(cell)
            ));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table></div>");
}

fn image(data: &BlockData, out: &mut String) {
    let url = data
        .get("file")
        .and_then(|file| file.get("url"))
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| data.text("url"));
    if url.is_empty() {
        return;
    }

    let caption = data.text("caption");
    out.push_str(&format!(
        "<div class=\"{IMAGE_WRAPPER_CLASS}\"><img src=\"{}\" alt=\"{}\" class=\"{IMAGE_CLASS}\" />",
        escape_text(url),
        escape_text(caption)
    ));
    if !caption.is_empty() {
        out.push_str(&format!(
            "<p class=\"{IMAGE_CAPTION_CLASS}\">{}</p>",
            parse_inline(caption)
        ));
    }
    out.push_str("</div>");
}

fn code(data: &BlockData, out: &mut String) {
    out.push_str(&format!(
        "<pre class=\"{CODE_PRE_CLASS}\"><code class=\"{CODE_CLASS}\">{}</code></pre>",
        escape_text(data.text("code"))
    ));
}

fn quote(data: &BlockData, out: &mut String) {
    out.push_str(&format!(
        "<blockquote class=\"{QUOTE_CLASS}\"><p class=\"{QUOTE_TEXT_CLASS}\">{}</p>",
        parse_inline(data.text("text"))
    ));
    let caption = data.text("caption");
    if !caption.is_empty() {
        out.push_str(&format!(
            "<cite class=\"{QUOTE_CITE_CLASS}\">\u{2014} {}</cite>",
            parse_inline(caption)
        ));
    }
    out.push_str("</blockquote>");
}
