//! Module-level configuration and the field-definition catalog.

use crate::error::{DdfError, Result};
use crate::types::field_defn::FieldDefn;

/// Widths of the three directory entry slots, in ASCII digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeFields {
    /// Width of the field-length slot.
    pub length: usize,
    /// Width of the field-position slot.
    pub pos: usize,
    /// Width of the field tag.
    pub tag: usize,
}

impl Default for SizeFields {
    fn default() -> Self {
        Self {
            length: 3,
            pos: 4,
            tag: 4,
        }
    }
}

/// A DDF module: scalar leader configuration plus the ordered field
/// catalog shared by every record.
///
/// The module exclusively owns its `FieldDefn`s; record assembly
/// borrows them by reference and never clones or mutates one.
#[derive(Debug, Clone)]
pub struct DdfModule {
    pub interchange_level: u8,
    pub leader_identifier: u8,
    pub code_extension: u8,
    pub version: u8,
    pub app_indicator: u8,
    /// Written as exactly 3 bytes, space-padded or truncated.
    pub extended_char_set: String,
    pub size_fields: SizeFields,
    pub field_control_length: usize,
    fields: Vec<FieldDefn>,
}

impl Default for DdfModule {
    fn default() -> Self {
        Self {
            interchange_level: b'3',
            leader_identifier: b'L',
            code_extension: b'E',
            version: b'1',
            app_indicator: b' ',
            extended_char_set: " ! ".to_string(),
            size_fields: SizeFields::default(),
            field_control_length: 9,
            fields: Vec::new(),
        }
    }
}

impl DdfModule {
    /// Register a field definition at the end of the catalog.
    ///
    /// The tag must be unique and match the module's tag width.
    pub fn add_field(&mut self, defn: FieldDefn) -> Result<()> {
        let actual = defn.tag.len();
        if actual != self.size_fields.tag {
            return Err(DdfError::TagWidth {
                tag: defn.tag,
                expected: self.size_fields.tag,
                actual,
            });
        }
        if self.fields.iter().any(|field| field.tag == defn.tag) {
            return Err(DdfError::DuplicateTag { tag: defn.tag });
        }
        self.fields.push(defn);
        Ok(())
    }

    /// Look up a definition by the name record nodes use, which is the
    /// field's tag in the dump format.
    pub fn find_field(&self, name: &str) -> Option<&FieldDefn> {
        self.fields.iter().find(|field| field.tag == name)
    }

    /// The ordered catalog.
    pub fn fields(&self) -> &[FieldDefn] {
        &self.fields
    }

    /// Extended character set as its 3 on-disk bytes.
    pub(crate) fn extended_char_set_bytes(&self) -> [u8; 3] {
        let mut bytes = [b' '; 3];
        for (slot, byte) in bytes.iter_mut().zip(self.extended_char_set.bytes()) {
            *slot = byte;
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::field_defn::{DataTypeCode, RepeatDescriptor, StructureCode};

    fn defn(tag: &str) -> FieldDefn {
        FieldDefn::build(
            tag,
            "Test",
            StructureCode::Elementary,
            DataTypeCode::CharString,
            RepeatDescriptor::None,
            None,
        )
        .finish(None)
    }

    #[test]
    fn rejects_wrong_tag_width() {
        let mut module = DdfModule::default();
        let err = module.add_field(defn("00011")).unwrap_err();
        assert!(matches!(err, DdfError::TagWidth { expected: 4, .. }));
    }

    #[test]
    fn rejects_duplicate_tag() {
        let mut module = DdfModule::default();
        module.add_field(defn("0001")).unwrap();
        let err = module.add_field(defn("0001")).unwrap_err();
        assert!(matches!(err, DdfError::DuplicateTag { .. }));
    }

    #[test]
    fn finds_fields_by_tag() {
        let mut module = DdfModule::default();
        module.add_field(defn("DSID")).unwrap();
        assert!(module.find_field("DSID").is_some());
        assert!(module.find_field("0001").is_none());
    }

    #[test]
    fn extended_char_set_padded_to_three_bytes() {
        let mut module = DdfModule::default();
        assert_eq!(module.extended_char_set_bytes(), *b" ! ");
        module.extended_char_set = "!".to_string();
        assert_eq!(module.extended_char_set_bytes(), *b"!  ");
        module.extended_char_set = "abcdef".to_string();
        assert_eq!(module.extended_char_set_bytes(), *b"abc");
    }
}
