//! Non-finite number removal for upstream JSON.
//!
//! Non-finite values reach us in two shapes:
//! - the bare tokens `NaN`, `Infinity` and `-Infinity`, which are not JSON.
//!   Every such token found outside a string literal is rewritten to `null`
//!   before parsing.
//! - valid JSON numbers that overflow `f64`, such as `1e400`. Numbers are
//!   parsed with `arbitrary_precision`, so they keep their source text and
//!   any leaf that evaluates to an infinite `f64` is replaced with `null`.
//!
//! Integers of any size and finite floats keep their original digits.

use serde_json::{Number, Value};
use std::borrow::Cow;
use thiserror::Error;

/// Bare tokens some encoders emit for non-finite floats.
const NON_FINITE_TOKENS: [&[u8]; 3] = [b"NaN", b"Infinity", b"-Infinity"];

#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("body is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Parse an upstream body, replacing non-finite numbers with `null`.
pub fn sanitize_json(body: &[u8]) -> Result<Value, SanitizeError> {
    let text = std::str::from_utf8(body)?;
    let cleaned = sanitize_text(text);
    let mut value: Value = serde_json::from_str(&cleaned)?;
    null_non_finite(&mut value);
    Ok(value)
}

/// Replace every numeric leaf that overflows `f64` with `null`.
fn null_non_finite(value: &mut Value) {
    if matches!(value, Value::Number(n) if overflows_f64(n)) {
        *value = Value::Null;
        return;
    }
    match value {
        Value::Array(items) => items.iter_mut().for_each(null_non_finite),
        Value::Object(map) => map.values_mut().for_each(null_non_finite),
        _ => {}
    }
}

// `Number::as_f64` hides overflow as `None`, so read the digits directly.
fn overflows_f64(n: &Number) -> bool {
    n.as_str().parse::<f64>().is_ok_and(|f| !f.is_finite())
}

/// Rewrite bare `NaN` / `Infinity` / `-Infinity` tokens to `null`.
///
/// String contents (including escaped quotes) are never touched. Returns the
/// input borrowed when there is nothing to rewrite, which also makes the
/// function idempotent.
pub fn sanitize_text(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if in_string {
            match b {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {}
            }
            i += 1;
            continue;
        }

        if b == b'"' {
            in_string = true;
            i += 1;
            continue;
        }

        match non_finite_token_len(&bytes[i..]) {
            Some(len) => {
                let buf = out.get_or_insert_with(|| String::with_capacity(input.len()));
                // Token boundaries are ASCII, so these are char boundaries.
                buf.push_str(&input[copied..i]);
                buf.push_str("null");
                i += len;
                copied = i;
            }
            None => i += 1,
        }
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&input[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(input),
    }
}

fn non_finite_token_len(rest: &[u8]) -> Option<usize> {
    NON_FINITE_TOKENS
        .iter()
        .find(|token| rest.starts_with(token))
        .map(|token| token.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_replaces_nan_in_nested_listing() {
        let value = sanitize_json(br#"{"results": [{"price": NaN}]}"#).unwrap();
        assert_eq!(value, json!({"results": [{"price": null}]}));
    }

    #[test]
    fn test_replaces_both_infinities() {
        let value = sanitize_json(br#"[Infinity, -Infinity, 1.5, -2, NaN]"#).unwrap();
        assert_eq!(value, json!([null, null, 1.5, -2, null]));
    }

    #[test]
    fn test_leaves_strings_alone() {
        let input = r#"{"note": "NaN and -Infinity \" NaN", "NaN": true}"#;
        assert!(matches!(sanitize_text(input), Cow::Borrowed(_)));

        let value = sanitize_json(input.as_bytes()).unwrap();
        assert_eq!(value["note"], "NaN and -Infinity \" NaN");
        assert_eq!(value["NaN"], true);
    }

    #[test]
    fn test_escaped_backslash_before_quote_ends_string() {
        let input = r#"{"path": "C:\\", "v": NaN}"#;
        assert_eq!(sanitize_text(input), r#"{"path": "C:\\", "v": null}"#);
    }

    #[test]
    fn test_preserves_key_order_and_other_values() {
        let value = sanitize_json(
            br#"{"z": 1, "a": NaN, "m": {"y": "x", "b": [true, null, 18446744073709551615]}}"#,
        )
        .unwrap();

        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(value["a"], Value::Null);
        assert_eq!(value["m"]["b"][2], json!(u64::MAX));
        let inner: Vec<_> = value["m"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(inner, vec!["y", "b"]);
    }

    #[test]
    fn test_is_idempotent() {
        let once = sanitize_text(r#"{"a": [NaN, {"b": Infinity}], "c": "Infinity"}"#).into_owned();
        let twice = sanitize_text(&once);
        assert!(matches!(twice, Cow::Borrowed(_)));
        assert_eq!(twice, once);
    }

    #[test]
    fn test_clean_input_is_borrowed() {
        let input = r#"{"results": [{"price": 650000}]}"#;
        assert!(matches!(sanitize_text(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_overflowing_numbers_become_null() {
        let value = sanitize_json(br#"{"results": [{"price": 1e400, "id": 1}, -1e400, 2.5E308]}"#)
            .unwrap();
        assert_eq!(value, json!({"results": [{"price": null, "id": 1}, null, null]}));
    }

    #[test]
    fn test_tiny_and_large_finite_numbers_survive() {
        let value = sanitize_json(br#"[1e-400, 1.7976931348623157e308]"#).unwrap();
        assert!(value[0].is_number());
        assert!(value[1].is_number());
    }

    #[test]
    fn test_big_integers_are_kept_exactly() {
        let input = r#"{"id":123456789012345678901234567890,"neg":-98765432109876543210}"#;
        let value = sanitize_json(input.as_bytes()).unwrap();
        assert_eq!(serde_json::to_string(&value).unwrap(), input);
    }

    #[test]
    fn test_value_is_stable_across_passes() {
        let first = sanitize_json(
            br#"{"a": NaN, "b": 1e400, "c": 123456789012345678901234567890, "d": 0.1, "e": "-Infinity"}"#,
        )
        .unwrap();
        let text = serde_json::to_string(&first).unwrap();
        let second = sanitize_json(text.as_bytes()).unwrap();
        assert_eq!(second, first);
        assert_eq!(serde_json::to_string(&second).unwrap(), text);
    }

    #[test]
    fn test_non_utf8_is_rejected() {
        assert!(matches!(
            sanitize_json(&[0x7b, 0xff, 0x7d]),
            Err(SanitizeError::Utf8(_))
        ));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(matches!(
            sanitize_json(b"<html>oops</html>"),
            Err(SanitizeError::Json(_))
        ));
        assert!(sanitize_json(b"").is_err());
    }
}
