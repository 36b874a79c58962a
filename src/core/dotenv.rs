//! Dotenv codec.
//!
//! Lossless, order-preserving conversion between the flat `key=value` text
//! format and [`SecretValue`].

use crate::core::value::SecretValue;
use crate::error::{Result, StagehandError};

/// Serialize a secret value to dotenv text.
///
/// Emits one `key=value` line per entry in iteration order, with a trailing
/// newline after every line including the last. Values are emitted verbatim,
/// without quoting or escaping. The contract assumes values contain no
/// embedded newlines; callers must not serialize multi-line values.
pub fn encode(value: &SecretValue) -> String {
    let mut output = String::new();

    for (key, val) in value.iter() {
        output.push_str(key);
        output.push('=');
        output.push_str(val);
        output.push('\n');
    }

    output
}

/// Parse dotenv text into a secret value.
///
/// Each line is parsed independently as a single shell-style variable
/// assignment: blank lines and `#` comment lines are skipped, an `export `
/// prefix is tolerated, and single or double quoted values are unquoted
/// (double quotes honor `\n`, `\r`, `\t`, `\"` and `\\` escapes). A `#`
/// starts an inline comment only outside quotes and only when preceded by
/// whitespace.
///
/// Keys are accumulated in the order first seen; a later duplicate key
/// overwrites the earlier value in place without moving its position.
///
/// # Errors
///
/// Returns `Format` on a malformed assignment, carrying the 1-based line
/// number of the offending line.
pub fn decode(text: &str) -> Result<SecretValue> {
    let mut value = SecretValue::new();

    for (idx, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some((key, val))) => value.insert(key, val),
            Ok(None) => {}
            Err(msg) => {
                return Err(StagehandError::Format(format!("line {}: {}", idx + 1, msg)));
            }
        }
    }

    Ok(value)
}

/// Parse one line into a key-value pair, or `None` for blanks and comments.
fn parse_line(line: &str) -> std::result::Result<Option<(String, String)>, String> {
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let line = match line.strip_prefix("export ") {
        Some(rest) => rest.trim_start(),
        None => line,
    };

    let (key, raw) = line
        .split_once('=')
        .ok_or_else(|| "missing '=' in assignment".to_string())?;

    let key = key.trim_end();
    if key.is_empty() {
        return Err("empty key".to_string());
    }
    if key.chars().any(|ch| ch.is_whitespace() || ch == '"' || ch == '\'') {
        return Err(format!("invalid key: {}", key));
    }

    let value = parse_value(raw.trim())?;
    Ok(Some((key.to_string(), value)))
}

fn parse_value(raw: &str) -> std::result::Result<String, String> {
    if let Some(rest) = raw.strip_prefix('"') {
        return unquote_double(rest);
    }

    if let Some(rest) = raw.strip_prefix('\'') {
        return unquote_single(rest);
    }

    Ok(strip_inline_comment(raw).trim_end().to_string())
}

/// Unquote a double-quoted value, `rest` starting just past the opening quote.
fn unquote_double(rest: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(rest.len());
    let mut chars = rest.char_indices();

    while let Some((idx, ch)) = chars.next() {
        match ch {
            '"' => {
                check_trailing(&rest[idx + 1..])?;
                return Ok(out);
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, 't')) => out.push('\t'),
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return Err("unterminated double-quoted value".to_string()),
            },
            _ => out.push(ch),
        }
    }

    Err("unterminated double-quoted value".to_string())
}

/// Unquote a single-quoted value; no escapes inside single quotes.
fn unquote_single(rest: &str) -> std::result::Result<String, String> {
    match rest.split_once('\'') {
        Some((value, trailing)) => {
            check_trailing(trailing)?;
            Ok(value.to_string())
        }
        None => Err("unterminated single-quoted value".to_string()),
    }
}

/// After a closing quote only whitespace or a comment may follow.
fn check_trailing(trailing: &str) -> std::result::Result<(), String> {
    let trailing = trailing.trim_start();
    if trailing.is_empty() || trailing.starts_with('#') {
        Ok(())
    } else {
        Err(format!("trailing characters after closing quote: {}", trailing))
    }
}

/// Cut an unquoted value at the first `#` preceded by whitespace.
///
/// A `#` with no whitespace before it is part of the value, so values like
/// `abc#def` survive a verbatim encode → decode round trip.
fn strip_inline_comment(raw: &str) -> &str {
    let mut prev_is_space = false;

    for (idx, ch) in raw.char_indices() {
        if ch == '#' && prev_is_space {
            return &raw[..idx];
        }
        prev_is_space = ch.is_whitespace();
    }

    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> SecretValue {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_encode_basic() {
        let value = pairs(&[("key", "value"), ("key2", "value2")]);
        assert_eq!(encode(&value), "key=value\nkey2=value2\n");
    }

    #[test]
    fn test_encode_empty_value_has_no_lines() {
        assert_eq!(encode(&SecretValue::new()), "");
    }

    #[test]
    fn test_encode_is_verbatim() {
        let value = pairs(&[("key", "ここに二重引用符: \"value")]);
        assert_eq!(encode(&value), "key=ここに二重引用符: \"value\n");
    }

    #[test]
    fn test_decode_basic() {
        let value = decode("key=value\nkey2=value2\n").unwrap();

        let entries: Vec<(&str, &str)> = value.iter().collect();
        assert_eq!(entries, vec![("key", "value"), ("key2", "value2")]);
    }

    #[test]
    fn test_decode_skips_blanks_and_comments() {
        let value = decode("# leading comment\n\nAPI_KEY=secret\n\n# tail\nDB=pg\n").unwrap();

        assert_eq!(value.len(), 2);
        assert_eq!(value.get("API_KEY"), Some("secret"));
        assert_eq!(value.get("DB"), Some("pg"));
    }

    #[test]
    fn test_decode_export_prefix() {
        let value = decode("export TOKEN=abc\n").unwrap();
        assert_eq!(value.get("TOKEN"), Some("abc"));
    }

    #[test]
    fn test_decode_double_quoted_with_escapes() {
        let value = decode("ESCAPED=\"line1\\nline2\\\"quoted\\\"\\\\tail\"\n").unwrap();
        assert_eq!(value.get("ESCAPED"), Some("line1\nline2\"quoted\"\\tail"));
    }

    #[test]
    fn test_decode_single_quoted_is_literal() {
        let value = decode("RAW='no \\n escapes here'\n").unwrap();
        assert_eq!(value.get("RAW"), Some("no \\n escapes here"));
    }

    #[test]
    fn test_decode_inline_comment_outside_quotes() {
        let value = decode("KEY=value # a comment\n").unwrap();
        assert_eq!(value.get("KEY"), Some("value"));
    }

    #[test]
    fn test_decode_hash_inside_quotes_kept() {
        let value = decode("KEY=\"value # not a comment\"\n").unwrap();
        assert_eq!(value.get("KEY"), Some("value # not a comment"));
    }

    #[test]
    fn test_decode_hash_without_space_is_value() {
        let value = decode("PASS=abc#def\n").unwrap();
        assert_eq!(value.get("PASS"), Some("abc#def"));
    }

    #[test]
    fn test_decode_comment_after_closing_quote() {
        let value = decode("KEY=\"quoted\" # trailing comment\n").unwrap();
        assert_eq!(value.get("KEY"), Some("quoted"));
    }

    #[test]
    fn test_decode_empty_value() {
        let value = decode("EMPTY=\n").unwrap();
        assert_eq!(value.get("EMPTY"), Some(""));
    }

    #[test]
    fn test_decode_value_with_embedded_quote() {
        let value = decode("key=ここに二重引用符: \"value\n").unwrap();
        assert_eq!(value.get("key"), Some("ここに二重引用符: \"value"));
    }

    #[test]
    fn test_decode_duplicate_key_overwrites_in_place() {
        let value = decode("first=1\nsecond=2\nfirst=updated\n").unwrap();

        let entries: Vec<(&str, &str)> = value.iter().collect();
        assert_eq!(entries, vec![("first", "updated"), ("second", "2")]);
    }

    #[test]
    fn test_decode_missing_equals_fails_with_line_number() {
        let err = decode("GOOD=1\nnot an assignment\n").unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("line 2"), "unexpected message: {}", msg);
        assert!(msg.contains("missing '='"), "unexpected message: {}", msg);
    }

    #[test]
    fn test_decode_empty_key_fails() {
        assert!(decode("=value\n").is_err());
    }

    #[test]
    fn test_decode_unterminated_quote_fails() {
        assert!(decode("KEY=\"unterminated\n").is_err());
        assert!(decode("KEY='unterminated\n").is_err());
    }

    #[test]
    fn test_decode_trailing_garbage_after_quote_fails() {
        assert!(decode("KEY=\"value\" extra\n").is_err());
    }

    #[test]
    fn test_roundtrip_spec_example() {
        let text = "key=value\nkey2=value2\n";
        let value = decode(text).unwrap();

        assert_eq!(encode(&value), text);
    }

    #[test]
    fn test_roundtrip_embedded_quote() {
        let text = "key=ここに二重引用符: \"value\n";
        let value = decode(text).unwrap();

        assert_eq!(encode(&value), text);
    }

    #[test]
    fn test_roundtrip_from_value() {
        let value = pairs(&[("A", "1"), ("B", "two words"), ("C", "abc#def")]);
        assert_eq!(decode(&encode(&value)).unwrap(), value);
    }
}
