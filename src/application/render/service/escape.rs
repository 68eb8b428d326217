use serde_json::Value;

/// Neutralise every markup-significant character so `value` is literal text
/// in element content and in quoted attribute values alike.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escape a scalar JSON value for display. Strings are escaped, numbers and
/// booleans are stringified, anything else renders as nothing.
pub fn escape_value(value: &Value) -> String {
    match value {
        Value::String(text) => escape_text(text),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Element-content escaping used for inline text runs: the three markup
/// characters plus no-break spaces, which are written back as `&nbsp;`.
pub(crate) fn push_escaped_content(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
