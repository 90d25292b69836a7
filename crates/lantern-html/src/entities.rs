//! Character reference decoding.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html)
//!
//! The full table defines 2,231 entities. Only the common ones are listed
//! here. Unknown references are left in the text verbatim.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Named references, keyed by name without `&` or `;`.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("amp", "&"),
        ("lt", "<"),
        ("gt", ">"),
        ("quot", "\""),
        ("apos", "'"),
        ("nbsp", "\u{00A0}"),
        ("copy", "\u{00A9}"),
        ("reg", "\u{00AE}"),
        ("trade", "\u{2122}"),
        ("mdash", "\u{2014}"),
        ("ndash", "\u{2013}"),
        ("hellip", "\u{2026}"),
        ("bull", "\u{2022}"),
        ("middot", "\u{00B7}"),
        ("lsquo", "\u{2018}"),
        ("rsquo", "\u{2019}"),
        ("ldquo", "\u{201C}"),
        ("rdquo", "\u{201D}"),
        ("laquo", "\u{00AB}"),
        ("raquo", "\u{00BB}"),
        ("cent", "\u{00A2}"),
        ("pound", "\u{00A3}"),
        ("euro", "\u{20AC}"),
        ("yen", "\u{00A5}"),
        ("sect", "\u{00A7}"),
        ("para", "\u{00B6}"),
        ("times", "\u{00D7}"),
        ("divide", "\u{00F7}"),
        ("plusmn", "\u{00B1}"),
        ("ne", "\u{2260}"),
        ("le", "\u{2264}"),
        ("ge", "\u{2265}"),
        ("deg", "\u{00B0}"),
        ("frac12", "\u{00BD}"),
        ("frac14", "\u{00BC}"),
        ("frac34", "\u{00BE}"),
        ("larr", "\u{2190}"),
        ("rarr", "\u{2192}"),
        ("uarr", "\u{2191}"),
        ("darr", "\u{2193}"),
    ])
});

/// Legacy references that are recognised without a trailing semicolon.
const LEGACY_ENTITIES: &[&str] = &["amp", "lt", "gt", "quot", "nbsp", "copy", "reg"];

/// Longest reference name we try to match before giving up.
const MAX_REFERENCE_LEN: usize = 32;

/// Replace character references in `text` with the characters they name.
///
/// Handles `&name;`, the legacy semicolon-less forms of the most common
/// names, `&#NNN;` and `&#xHHH;`. Anything unrecognised is copied through.
#[must_use]
pub fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match decode_reference(after) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode the reference starting just after an `&`.
///
/// Returns the replacement text and the number of bytes consumed.
fn decode_reference(after: &str) -> Option<(String, usize)> {
    if let Some(numeric) = after.strip_prefix('#') {
        let (digits, radix, prefix_len) = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 2),
            None => (numeric, 10, 1),
        };
        let end = digits
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(digits.len());
        if end == 0 {
            return None;
        }
        let code = u32::from_str_radix(&digits[..end], radix).ok()?;
        // NUL and out-of-range code points become U+FFFD.
        let ch = char::from_u32(code)
            .filter(|&c| c != '\0')
            .unwrap_or('\u{FFFD}');
        let semicolon = usize::from(digits[end..].starts_with(';'));
        return Some((ch.to_string(), prefix_len + end + semicolon));
    }

    let name_len = after
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after.len());
    if name_len == 0 || name_len > MAX_REFERENCE_LEN {
        return None;
    }

    let name = &after[..name_len];
    if after[name_len..].starts_with(';') {
        if let Some(value) = NAMED_ENTITIES.get(name) {
            return Some(((*value).to_string(), name_len + 1));
        }
    }

    // Legacy form: the longest known name that prefixes the run.
    LEGACY_ENTITIES
        .iter()
        .filter(|legacy| name.starts_with(*legacy))
        .max_by_key(|legacy| legacy.len())
        .and_then(|legacy| {
            NAMED_ENTITIES
                .get(legacy)
                .map(|value| ((*value).to_string(), legacy.len()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_references() {
        assert_eq!(unescape("a &lt;b&gt; &amp; c"), "a <b> & c");
        assert_eq!(unescape("&copy; 2024"), "\u{00A9} 2024");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(unescape("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(unescape("&#0;"), "\u{FFFD}");
    }

    #[test]
    fn test_legacy_reference_without_semicolon() {
        assert_eq!(unescape("fish &amp chips"), "fish & chips");
        assert_eq!(unescape("&ltdiv"), "<div");
    }

    #[test]
    fn test_unknown_reference_is_kept() {
        assert_eq!(unescape("&bogus; & &;"), "&bogus; & &;");
        assert_eq!(unescape("AT&T"), "AT&T");
    }

    #[test]
    fn test_text_without_references_is_unchanged() {
        assert_eq!(unescape("plain text"), "plain text");
    }
}
