//! Literal decoding: hex byte strings and typed scalar text.
//!
//! Hex literals appear after a `0x` marker, two digits per byte, high
//! nibble first. Malformed literals (odd length, non-hex bytes) are a
//! hard error rather than silently corrupted bytes; lowercase digits
//! are accepted.

use tracing::debug;

use ddf_8211::ScalarValue;

use crate::error::{ComposeError, Result};

/// Marker that switches a value to the raw byte path.
pub const HEX_MARKER: &str = "0x";

/// Decode hex digits (without the `0x` marker) into bytes.
pub fn decode_hex(digits: &str) -> Result<Vec<u8>> {
    hex::decode(digits).map_err(|source| ComposeError::HexLiteral {
        literal: digits.to_string(),
        source,
    })
}

/// Re-encode bytes in the dump format's uppercase spelling.
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Decode one typed subfield literal.
///
/// Returns `None` for an unrecognized type literal, or for `binary`
/// text without the `0x` marker; the dump format treats such subfields
/// as absent rather than as errors. Numeric text is read the way C
/// `atoi`/`atof` read it: the longest leading numeric prefix counts,
/// and text without one degrades to zero.
pub fn decode_scalar(type_literal: &str, text: &str) -> Result<Option<ScalarValue>> {
    match type_literal {
        "float" => Ok(Some(ScalarValue::Float(parse_float_prefix(text)))),
        "integer" => Ok(Some(ScalarValue::Integer(parse_int_prefix(text)))),
        "string" => Ok(Some(ScalarValue::Text(text.to_string()))),
        "binary" => match text.strip_prefix(HEX_MARKER) {
            Some(digits) => Ok(Some(ScalarValue::Bytes(decode_hex(digits)?))),
            None => {
                debug!(value = text, "binary subfield without 0x marker, skipped");
                Ok(None)
            }
        },
        other => {
            debug!(type_literal = other, "unrecognized subfield type, skipped");
            Ok(None)
        }
    }
}

/// Longest leading integer prefix, like C `atoi`. No prefix, or a
/// prefix that overflows `i64`, reads as zero.
fn parse_int_prefix(text: &str) -> i64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    while matches!(bytes.get(end), Some(byte) if byte.is_ascii_digit()) {
        end += 1;
    }
    text[..end].parse().unwrap_or(0)
}

/// Longest leading decimal prefix, like C `atof`: optional sign,
/// digits, fraction, and an exponent only when digits follow it.
fn parse_float_prefix(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    while matches!(bytes.get(end), Some(byte) if byte.is_ascii_digit()) {
        end += 1;
    }
    if matches!(bytes.get(end), Some(b'.')) {
        end += 1;
        while matches!(bytes.get(end), Some(byte) if byte.is_ascii_digit()) {
            end += 1;
        }
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        if matches!(bytes.get(exponent), Some(byte) if byte.is_ascii_digit()) {
            while matches!(bytes.get(exponent), Some(byte) if byte.is_ascii_digit()) {
                exponent += 1;
            }
            end = exponent;
        }
    }
    text[..end].parse().unwrap_or(0.0)
}
