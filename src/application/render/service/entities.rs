//! Character reference decoding for inline text.
//!
//! Named references must be terminated by `;`. Numeric references accept
//! decimal (`&#39;`) and hex (`&#x27;`) forms with an optional `;`. Anything
//! that does not decode is left untouched, so the escape pass turns its `&`
//! into `&amp;` later.

use std::borrow::Cow;

const MAX_NAME_LEN: usize = 32;

pub(crate) fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match decode_reference(candidate) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &candidate[consumed..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode the reference at the start of `input` (which begins with `&`).
/// Returns the replacement text and the number of bytes consumed.
fn decode_reference(input: &str) -> Option<(Cow<'static, str>, usize)> {
    let body = &input[1..];
    if let Some(numeric) = body.strip_prefix('#') {
        let (digits, radix, prefix_len) = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 3),
            None => (numeric, 10, 2),
        };
        let digit_len = digits
            .bytes()
            .take_while(|byte| (*byte as char).is_digit(radix))
            .count();
        if digit_len == 0 {
            return None;
        }
        let code = u32::from_str_radix(&digits[..digit_len], radix).unwrap_or(u32::MAX);
        let terminated = digits[digit_len..].starts_with(';');
        let consumed = prefix_len + digit_len + usize::from(terminated);
        let ch = char::from_u32(code)
            .filter(|ch| *ch != '\0')
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        return Some((Cow::Owned(ch.to_string()), consumed));
    }

    let name_len = body
        .bytes()
        .take(MAX_NAME_LEN + 1)
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    if name_len == 0 || name_len > MAX_NAME_LEN || !body[name_len..].starts_with(';') {
        return None;
    }
    named_entity(&body[..name_len]).map(|text| (Cow::Borrowed(text), name_len + 2))
}

fn named_entity(name: &str) -> Option<&'static str> {
    let text = match name {
        "amp" | "AMP" => "&",
        "lt" | "LT" => "<",
        "gt" | "GT" => ">",
        "quot" | "QUOT" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "ensp" => "\u{2002}",
        "emsp" => "\u{2003}",
        "thinsp" => "\u{2009}",
        "zwnj" => "\u{200c}",
        "zwj" => "\u{200d}",
        "lrm" => "\u{200e}",
        "rlm" => "\u{200f}",
        "shy" => "\u{ad}",
        "copy" => "©",
        "reg" => "®",
        "trade" => "™",
        "hellip" => "…",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "sbquo" => "\u{201a}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "bdquo" => "\u{201e}",
        "laquo" => "«",
        "raquo" => "»",
        "lsaquo" => "‹",
        "rsaquo" => "›",
        "bull" => "•",
        "middot" => "·",
        "deg" => "°",
        "plusmn" => "±",
        "times" => "×",
        "divide" => "÷",
        "micro" => "µ",
        "para" => "¶",
        "sect" => "§",
        "cent" => "¢",
        "pound" => "£",
        "yen" => "¥",
        "euro" => "€",
        "curren" => "¤",
        "iexcl" => "¡",
        "iquest" => "¿",
        "ordf" => "ª",
        "ordm" => "º",
        "sup1" => "¹",
        "sup2" => "²",
        "sup3" => "³",
        "frac14" => "¼",
        "frac12" => "½",
        "frac34" => "¾",
        "larr" => "←",
        "rarr" => "→",
        "uarr" => "↑",
        "darr" => "↓",
        "harr" => "↔",
        "dagger" => "†",
        "Dagger" => "‡",
        "permil" => "‰",
        "prime" => "′",
        "Prime" => "″",
        "check" => "✓",
        "Auml" => "Ä",
        "auml" => "ä",
        "Ouml" => "Ö",
        "ouml" => "ö",
        "Uuml" => "Ü",
        "uuml" => "ü",
        "szlig" => "ß",
        "Ccedil" => "Ç",
        "ccedil" => "ç",
        "Gbreve" => "Ğ",
        "gbreve" => "ğ",
        "Scedil" => "Ş",
        "scedil" => "ş",
        "Idot" => "İ",
        "imath" | "inodot" => "ı",
        "Aacute" => "Á",
        "aacute" => "á",
        "Agrave" => "À",
        "agrave" => "à",
        "Acirc" => "Â",
        "acirc" => "â",
        "Eacute" => "É",
        "eacute" => "é",
        "Egrave" => "È",
        "egrave" => "è",
        "Ecirc" => "Ê",
        "ecirc" => "ê",
        "Iacute" => "Í",
        "iacute" => "í",
        "Icirc" => "Î",
        "icirc" => "î",
        "Oacute" => "Ó",
        "oacute" => "ó",
        "Ocirc" => "Ô",
        "ocirc" => "ô",
        "Uacute" => "Ú",
        "uacute" => "ú",
        "Ucirc" => "Û",
        "ucirc" => "û",
        "Ntilde" => "Ñ",
        "ntilde" => "ñ",
        _ => return None,
    };
    Some(text)
}
