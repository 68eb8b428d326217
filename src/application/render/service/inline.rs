//! Inline span parsing: decode references, keep allow-listed tags live,
//! escape everything else.
//!
//! The input is split into tag tokens and text runs in a single scan. Tag
//! tokens are copied verbatim; text runs are escaped. Because tags are never
//! searched for again after escaping, no substitution marker can collide
//! with subject text.

use super::{
    config::{INLINE_ALLOWED_TAGS, INLINE_VOID_TAGS},
    entities::decode_entities,
    escape::push_escaped_content,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Open {
        name: &'static str,
        raw: &'a str,
        void: bool,
    },
    Close {
        name: &'static str,
        raw: &'a str,
    },
}

/// Parse inline rich text into a markup-safe fragment.
pub fn parse_inline(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let decoded = decode_entities(text);
    let mut out = String::with_capacity(decoded.len() + 16);
    let mut open_tags: Vec<&'static str> = Vec::new();

    for token in tokenize(&decoded) {
        match token {
            Token::Text(run) => push_escaped_content(run, &mut out),
            Token::Open { name, raw, void } => {
                out.push_str(raw);
                if !void {
                    open_tags.push(name);
                }
            }
            Token::Close { name, raw } => {
                out.push_str(raw);
                if let Some(position) = open_tags.iter().rposition(|open| *open == name) {
                    open_tags.remove(position);
                }
            }
        }
    }

    // Formatting must not leak past the fragment boundary.
    for name in open_tags.iter().rev() {
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }

    out
}

fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(offset) = input[cursor..].find('<') {
        let tag_start = cursor + offset;
        match match_tag(&input[tag_start..]) {
            Some((token, len)) => {
                if text_start < tag_start {
                    tokens.push(Token::Text(&input[text_start..tag_start]));
                }
                tokens.push(token);
                cursor = tag_start + len;
                text_start = cursor;
            }
            None => cursor = tag_start + 1,
        }
    }

    if text_start < input.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }
    tokens
}

/// Match an allow-listed tag at the start of `input` (which begins with `<`).
fn match_tag(input: &str) -> Option<(Token<'_>, usize)> {
    let bytes = input.as_bytes();
    let closing = bytes.get(1) == Some(&b'/');
    let name_start = if closing { 2 } else { 1 };
    let name_len = bytes[name_start..]
        .iter()
        .take_while(|byte| byte.is_ascii_alphabetic())
        .count();
    if name_len == 0 {
        return None;
    }
    let name = allowed_name(&input[name_start..name_start + name_len])?;
    let after_name = name_start + name_len;

    if closing {
        return (bytes.get(after_name) == Some(&b'>')).then(|| {
            let len = after_name + 1;
            (
                Token::Close {
                    name,
                    raw: &input[..len],
                },
                len,
            )
        });
    }

    let end = match bytes.get(after_name)? {
        b'>' => after_name,
        b'/' if bytes.get(after_name + 1) == Some(&b'>') => after_name + 1,
        byte if byte.is_ascii_whitespace() => attribute_list_end(bytes, after_name)?,
        _ => return None,
    };
    let len = end + 1;
    let self_closing = bytes[end - 1] == b'/';
    let void = self_closing || INLINE_VOID_TAGS.contains(&name);

    Some((
        Token::Open {
            name,
            raw: &input[..len],
            void,
        },
        len,
    ))
}

/// Index of the `>` closing an attribute list starting at `start`.
///
/// A quote opens a value only right after `=` (whitespace allowed between);
/// a `>` inside such a value does not end the tag. A stray quote, an unquoted
/// `<` or an unterminated value means this is not a tag at all.
fn attribute_list_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut after_equals = false;
    for (index, byte) in bytes.iter().enumerate().skip(start) {
        match (quote, *byte) {
            (Some(open), current) if current == open => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') if after_equals => {
                quote = Some(*byte);
                after_equals = false;
            }
            (None, b'"' | b'\'' | b'<') => return None,
            (None, b'>') => return Some(index),
            (None, b'=') => after_equals = true,
            (None, current) if current.is_ascii_whitespace() => {}
            (None, _) => after_equals = false,
        }
    }
    None
}

fn allowed_name(candidate: &str) -> Option<&'static str> {
    INLINE_ALLOWED_TAGS
        .iter()
        .copied()
        .find(|allowed| allowed.eq_ignore_ascii_case(candidate))
}
