//! Subfield format controls.
//!
//! Each subfield carries a format control such as `A(2)`, `I(10)`,
//! `R(12)`, `B(40)` or a binary form like `b11`/`b24`/`b48`. The first
//! character selects the representation, an optional parenthesized
//! width fixes the slot size; formats without a width are delimited by
//! the unit terminator instead.

use crate::error::{DdfError, Result};
use crate::leader::UNIT_TERMINATOR;
use crate::types::ScalarValue;

/// Parsed form of one subfield format control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubfieldFormat {
    /// `A`/`C`: character data, space-padded when a width is given.
    CharString { width: Option<usize> },
    /// `I`/`S`: base-10 integer, zero-padded when a width is given.
    Integer { width: Option<usize> },
    /// `R`/`E`: real number in character form.
    Real { width: Option<usize> },
    /// `B(n)`: bit string of `n` bits, stored as whole bytes.
    BitString { bits: usize },
    /// `b1w`: unsigned little-endian integer of `w` bytes.
    BinaryUInt { bytes: usize },
    /// `b2w`: signed little-endian integer of `w` bytes.
    BinarySInt { bytes: usize },
    /// `b4w`: IEEE float of 4 or 8 bytes.
    BinaryFloat { bytes: usize },
}

/// Parse one format control.
pub fn parse_format(text: &str) -> Result<SubfieldFormat> {
    let text = text.trim();
    let unknown = || DdfError::UnknownFormat {
        format: text.to_string(),
    };

    let mut chars = text.chars();
    let Some(letter) = chars.next() else {
        // Bare subfields fall back to unit-terminated character data.
        return Ok(SubfieldFormat::CharString { width: None });
    };
    let rest = chars.as_str();

    if letter == 'b' {
        let mut digits = rest.chars();
        let kind = digits.next().ok_or_else(unknown)?;
        let bytes: usize = digits.as_str().parse().map_err(|_| unknown())?;
        return match kind {
            '1' if (1..=8).contains(&bytes) => Ok(SubfieldFormat::BinaryUInt { bytes }),
            '2' if (1..=8).contains(&bytes) => Ok(SubfieldFormat::BinarySInt { bytes }),
            '4' if bytes == 4 || bytes == 8 => Ok(SubfieldFormat::BinaryFloat { bytes }),
            _ => Err(unknown()),
        };
    }

    let width = match rest {
        "" => None,
        _ => Some(
            rest.strip_prefix('(')
                .and_then(|inner| inner.strip_suffix(')'))
                .and_then(|digits| digits.parse::<usize>().ok())
                .ok_or_else(unknown)?,
        ),
    };

    match letter {
        'A' | 'C' => Ok(SubfieldFormat::CharString { width }),
        'I' | 'S' => Ok(SubfieldFormat::Integer { width }),
        'R' | 'E' => Ok(SubfieldFormat::Real { width }),
        'B' => {
            let bits = width.ok_or_else(unknown)?;
            Ok(SubfieldFormat::BitString { bits })
        }
        _ => Err(unknown()),
    }
}

/// Encode one value into its subfield slot.
///
/// A missing value encodes as the slot's neutral content: spaces or an
/// empty unit for character data, zero for numerics.
pub(crate) fn encode_scalar(
    out: &mut Vec<u8>,
    format: &SubfieldFormat,
    value: Option<&ScalarValue>,
) -> Result<()> {
    match *format {
        SubfieldFormat::CharString { width } => {
            let mut bytes = value.map(ScalarValue::text_bytes).unwrap_or_default();
            match width {
                Some(width) => {
                    bytes.truncate(width);
                    bytes.resize(width, b' ');
                    out.extend_from_slice(&bytes);
                }
                None => {
                    out.extend_from_slice(&bytes);
                    out.push(UNIT_TERMINATOR);
                }
            }
        }
        SubfieldFormat::Integer { width } => {
            let number = value.map(ScalarValue::as_i64).unwrap_or_default();
            match width {
                Some(width) => push_numeric_text(out, format!("{number:0width$}"), width)?,
                None => {
                    out.extend_from_slice(number.to_string().as_bytes());
                    out.push(UNIT_TERMINATOR);
                }
            }
        }
        SubfieldFormat::Real { width } => {
            let number = value.map(ScalarValue::as_f64).unwrap_or_default();
            match width {
                Some(width) => push_numeric_text(out, format!("{number:0width$}"), width)?,
                None => {
                    out.extend_from_slice(number.to_string().as_bytes());
                    out.push(UNIT_TERMINATOR);
                }
            }
        }
        SubfieldFormat::BitString { bits } => {
            let mut bytes = match value {
                Some(ScalarValue::Bytes(bytes)) => bytes.clone(),
                Some(other) => other.text_bytes(),
                None => Vec::new(),
            };
            bytes.resize(bits.div_ceil(8), 0);
            out.extend_from_slice(&bytes);
        }
        SubfieldFormat::BinaryUInt { bytes } => {
            let number = value.map(ScalarValue::as_i64).unwrap_or_default() as u64;
            out.extend_from_slice(&number.to_le_bytes()[..bytes]);
        }
        SubfieldFormat::BinarySInt { bytes } => {
            let number = value.map(ScalarValue::as_i64).unwrap_or_default();
            out.extend_from_slice(&number.to_le_bytes()[..bytes]);
        }
        SubfieldFormat::BinaryFloat { bytes } => {
            let number = value.map(ScalarValue::as_f64).unwrap_or_default();
            if bytes == 4 {
                out.extend_from_slice(&(number as f32).to_le_bytes());
            } else {
                out.extend_from_slice(&number.to_le_bytes());
            }
        }
    }
    Ok(())
}

/// Place zero-filled numeric text into a fixed slot.
fn push_numeric_text(out: &mut Vec<u8>, text: String, width: usize) -> Result<()> {
    if text.len() > width {
        return Err(DdfError::ValueOverflow { value: text, width });
    }
    out.extend_from_slice(text.as_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_character_formats() {
        assert_eq!(
            parse_format("A(2)").unwrap(),
            SubfieldFormat::CharString { width: Some(2) }
        );
        assert_eq!(
            parse_format("A").unwrap(),
            SubfieldFormat::CharString { width: None }
        );
        assert_eq!(
            parse_format("").unwrap(),
            SubfieldFormat::CharString { width: None }
        );
    }

    #[test]
    fn parses_binary_formats() {
        assert_eq!(
            parse_format("b11").unwrap(),
            SubfieldFormat::BinaryUInt { bytes: 1 }
        );
        assert_eq!(
            parse_format("b24").unwrap(),
            SubfieldFormat::BinarySInt { bytes: 4 }
        );
        assert_eq!(
            parse_format("b48").unwrap(),
            SubfieldFormat::BinaryFloat { bytes: 8 }
        );
        assert_eq!(
            parse_format("B(40)").unwrap(),
            SubfieldFormat::BitString { bits: 40 }
        );
    }

    #[test]
    fn rejects_malformed_formats() {
        assert!(parse_format("Q(2)").is_err());
        assert!(parse_format("b34").is_err());
        assert!(parse_format("I(x)").is_err());
        assert!(parse_format("b19").is_err());
    }

    #[test]
    fn encodes_fixed_width_text() {
        let mut out = Vec::new();
        encode_scalar(
            &mut out,
            &SubfieldFormat::CharString { width: Some(4) },
            Some(&ScalarValue::Text("AB".to_string())),
        )
        .unwrap();
        assert_eq!(out, b"AB  ");
    }

    #[test]
    fn encodes_unit_terminated_text() {
        let mut out = Vec::new();
        encode_scalar(
            &mut out,
            &SubfieldFormat::CharString { width: None },
            Some(&ScalarValue::Text("DSID".to_string())),
        )
        .unwrap();
        assert_eq!(out, b"DSID\x1f");
    }

    #[test]
    fn encodes_zero_padded_integers() {
        let mut out = Vec::new();
        encode_scalar(
            &mut out,
            &SubfieldFormat::Integer { width: Some(5) },
            Some(&ScalarValue::Integer(42)),
        )
        .unwrap();
        assert_eq!(out, b"00042");
    }

    #[test]
    fn integer_overflow_is_an_error() {
        let mut out = Vec::new();
        let err = encode_scalar(
            &mut out,
            &SubfieldFormat::Integer { width: Some(2) },
            Some(&ScalarValue::Integer(12345)),
        )
        .unwrap_err();
        assert!(matches!(err, DdfError::ValueOverflow { width: 2, .. }));
    }

    #[test]
    fn encodes_binary_integers_little_endian() {
        let mut out = Vec::new();
        encode_scalar(
            &mut out,
            &SubfieldFormat::BinaryUInt { bytes: 2 },
            Some(&ScalarValue::Integer(0x0102)),
        )
        .unwrap();
        assert_eq!(out, vec![0x02, 0x01]);
    }

    #[test]
    fn missing_value_encodes_neutral_content() {
        let mut out = Vec::new();
        encode_scalar(&mut out, &SubfieldFormat::Integer { width: Some(3) }, None).unwrap();
        encode_scalar(&mut out, &SubfieldFormat::CharString { width: Some(2) }, None).unwrap();
        assert_eq!(out, b"000  ");
    }
}
