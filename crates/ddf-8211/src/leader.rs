//! Record leader and directory building.
//!
//! Every DDF record opens with a 24-byte leader followed by a
//! directory of (tag, length, position) entries and a field terminator.
//! All numeric leader slots are fixed-width ASCII digit runs; a value
//! that cannot fit its slot aborts the write rather than truncating.

use crate::error::{DdfError, Result};
use crate::types::SizeFields;

/// Leader length in bytes.
pub const LEADER_LEN: usize = 24;

/// Field terminator (FT), ends the directory and every field's data.
pub const FIELD_TERMINATOR: u8 = 0x1e;

/// Unit terminator (UT), separates variable-width subfield values.
pub const UNIT_TERMINATOR: u8 = 0x1f;

/// Scalar content of one record leader.
#[derive(Debug, Clone)]
pub(crate) struct Leader {
    pub record_length: usize,
    pub interchange_level: u8,
    pub leader_identifier: u8,
    pub code_extension: u8,
    pub version: u8,
    pub app_indicator: u8,
    /// `None` writes the two-space slot used by data records.
    pub field_control_length: Option<usize>,
    pub base_address: usize,
    pub extended_char_set: [u8; 3],
    pub size_fields: SizeFields,
}

pub(crate) fn build_leader(leader: &Leader) -> Result<[u8; LEADER_LEN]> {
    let mut out = [b' '; LEADER_LEN];
    write_digits(&mut out[0..5], leader.record_length, "record length")?;
    out[5] = leader.interchange_level;
    out[6] = leader.leader_identifier;
    out[7] = leader.code_extension;
    out[8] = leader.version;
    out[9] = leader.app_indicator;
    if let Some(control_length) = leader.field_control_length {
        write_digits(&mut out[10..12], control_length, "field control length")?;
    }
    write_digits(&mut out[12..17], leader.base_address, "base address")?;
    out[17..20].copy_from_slice(&leader.extended_char_set);
    out[20] = size_digit(leader.size_fields.length, "size of field length")?;
    out[21] = size_digit(leader.size_fields.pos, "size of field position")?;
    out[22] = b'0';
    out[23] = size_digit(leader.size_fields.tag, "size of field tag")?;
    Ok(out)
}

/// Build the directory for `entries` of (tag, field data length).
///
/// Field lengths must already include each field's own terminator. The
/// returned directory ends with its field terminator.
pub(crate) fn build_directory(
    size_fields: &SizeFields,
    entries: &[(&str, usize)],
) -> Result<Vec<u8>> {
    let entry_len = size_fields.tag + size_fields.length + size_fields.pos;
    let mut out = Vec::with_capacity(entries.len() * entry_len + 1);
    let mut position = 0usize;
    for (tag, data_len) in entries {
        if tag.len() != size_fields.tag {
            return Err(DdfError::TagWidth {
                tag: (*tag).to_string(),
                expected: size_fields.tag,
                actual: tag.len(),
            });
        }
        out.extend_from_slice(tag.as_bytes());
        let start = out.len();
        out.resize(start + size_fields.length + size_fields.pos, b'0');
        write_digits(
            &mut out[start..start + size_fields.length],
            *data_len,
            "field length",
        )?;
        write_digits(
            &mut out[start + size_fields.length..start + size_fields.length + size_fields.pos],
            position,
            "field position",
        )?;
        position += data_len;
    }
    out.push(FIELD_TERMINATOR);
    Ok(out)
}

/// Write `value` as zero-filled ASCII digits filling `slot` exactly.
fn write_digits(slot: &mut [u8], value: usize, what: &'static str) -> Result<()> {
    let width = slot.len();
    let text = format!("{value:0width$}");
    if text.len() > width {
        return Err(DdfError::NumericOverflow { what, value, width });
    }
    slot.copy_from_slice(text.as_bytes());
    Ok(())
}

fn size_digit(value: usize, what: &'static str) -> Result<u8> {
    if !(1..=9).contains(&value) {
        return Err(DdfError::InvalidSizeField { what, value });
    }
    Ok(b'0' + value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leader() -> Leader {
        Leader {
            record_length: 241,
            interchange_level: b'3',
            leader_identifier: b'L',
            code_extension: b'E',
            version: b'1',
            app_indicator: b' ',
            field_control_length: Some(9),
            base_address: 73,
            extended_char_set: *b" ! ",
            size_fields: SizeFields {
                length: 3,
                pos: 4,
                tag: 4,
            },
        }
    }

    #[test]
    fn builds_ddr_leader() {
        let bytes = build_leader(&leader()).unwrap();
        assert_eq!(&bytes, b"002413LE1 0900073 ! 3404");
    }

    #[test]
    fn data_leader_blanks_field_control_slot() {
        let mut leader = leader();
        leader.field_control_length = None;
        leader.interchange_level = b' ';
        leader.leader_identifier = b'D';
        leader.code_extension = b' ';
        leader.version = b' ';
        let bytes = build_leader(&leader).unwrap();
        assert_eq!(&bytes[5..12], b" D     ");
    }

    #[test]
    fn record_length_overflow_fails() {
        let mut leader = leader();
        leader.record_length = 123_456;
        let err = build_leader(&leader).unwrap_err();
        assert!(matches!(
            err,
            DdfError::NumericOverflow {
                what: "record length",
                ..
            }
        ));
    }

    #[test]
    fn directory_accumulates_positions() {
        let size_fields = SizeFields {
            length: 3,
            pos: 4,
            tag: 4,
        };
        let dir = build_directory(&size_fields, &[("0001", 5), ("DSID", 42)]).unwrap();
        assert_eq!(&dir[..11], b"00010050000");
        assert_eq!(&dir[11..22], b"DSID0420005");
        assert_eq!(dir[22], FIELD_TERMINATOR);
    }

    #[test]
    fn directory_rejects_mismatched_tag() {
        let size_fields = SizeFields::default();
        let err = build_directory(&size_fields, &[("001", 5)]).unwrap_err();
        assert!(matches!(err, DdfError::TagWidth { expected: 4, .. }));
    }
}
