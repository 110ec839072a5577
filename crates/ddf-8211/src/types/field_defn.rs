//! Field definition catalog entries.
//!
//! A field definition describes one named, tagged field's structure and
//! subfield layout. Definitions are built in two phases: the builder is
//! created without format controls, subfields are attached in encounter
//! order, and the format-control string is applied when the builder is
//! finished. Format controls may reference subfield names, so they can
//! only be interpreted once every subfield is registered.

use crate::error::Result;
use crate::format::{SubfieldFormat, parse_format};

/// ISO 8211 data structure code: how a field's data is organized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StructureCode {
    /// Single data item.
    #[default]
    Elementary,
    /// Linear repetition of the subfield group.
    Vector,
    /// Multi-dimensional repetition.
    Array,
    /// Concatenated free-form data.
    Concatenated,
}

impl StructureCode {
    /// Resolve the dump-format literal for this code.
    ///
    /// Returns `None` for unrecognized text; callers decide the default.
    pub fn from_literal(text: &str) -> Option<Self> {
        match text {
            "elementary" => Some(Self::Elementary),
            "vector" => Some(Self::Vector),
            "array" => Some(Self::Array),
            "concatenated" => Some(Self::Concatenated),
            _ => None,
        }
    }

    /// ASCII digit written into the DDR field controls.
    pub fn digit(self) -> u8 {
        match self {
            Self::Elementary => b'0',
            Self::Vector => b'1',
            Self::Array => b'2',
            Self::Concatenated => b'3',
        }
    }
}

/// ISO 8211 data type code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DataTypeCode {
    #[default]
    CharString,
    ImplicitPoint,
    ExplicitPoint,
    ExplicitPointScaled,
    CharBitString,
    BitString,
    MixedDataType,
}

impl DataTypeCode {
    /// Resolve the dump-format literal for this code.
    ///
    /// Returns `None` for unrecognized text; callers decide the default.
    pub fn from_literal(text: &str) -> Option<Self> {
        match text {
            "char_string" => Some(Self::CharString),
            "implicit_point" => Some(Self::ImplicitPoint),
            "explicit_point" => Some(Self::ExplicitPoint),
            "explicit_point_scaled" => Some(Self::ExplicitPointScaled),
            "char_bit_string" => Some(Self::CharBitString),
            "bit_string" => Some(Self::BitString),
            "mixed_data_type" => Some(Self::MixedDataType),
            _ => None,
        }
    }

    /// ASCII digit written into the DDR field controls.
    pub fn digit(self) -> u8 {
        match self {
            Self::CharString => b'0',
            Self::ImplicitPoint => b'1',
            Self::ExplicitPoint => b'2',
            Self::ExplicitPointScaled => b'3',
            Self::CharBitString => b'4',
            Self::BitString => b'5',
            Self::MixedDataType => b'6',
        }
    }
}

/// Repeat-count descriptor written between the field name and the
/// format controls in a DDR entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RepeatDescriptor {
    /// Elementary fields carry no descriptor.
    #[default]
    None,
    /// Vector fields carry an empty descriptor.
    Empty,
    /// Array fields repeat a variable number of times.
    Variable,
    /// Concatenated fields pass the source descriptor through verbatim.
    Literal(String),
}

impl RepeatDescriptor {
    /// The descriptor text, or `None` when the slot is omitted entirely.
    pub fn as_descr(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Empty => Some(""),
            Self::Variable => Some("*"),
            Self::Literal(text) => Some(text),
        }
    }
}

/// One subfield slot inside a field definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SubfieldDefn {
    pub name: String,
    pub format: SubfieldFormat,
}

/// A catalog entry describing one named, tagged field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefn {
    /// Fixed-width tag, unique within the module.
    pub tag: String,
    /// Human-readable field name.
    pub name: String,
    pub structure: StructureCode,
    pub data_type: DataTypeCode,
    pub repeat: RepeatDescriptor,
    /// Format-control string emitted into the DDR entry.
    pub format_controls: Option<String>,
    /// Ordered subfield slots.
    pub subfields: Vec<SubfieldDefn>,
}

impl FieldDefn {
    /// Start a two-phase build.
    ///
    /// `format_controls` here is the construction-time string; it is
    /// replaced if `FieldDefnBuilder::finish` is given one.
    pub fn build(
        tag: impl Into<String>,
        name: impl Into<String>,
        structure: StructureCode,
        data_type: DataTypeCode,
        repeat: RepeatDescriptor,
        format_controls: Option<&str>,
    ) -> FieldDefnBuilder {
        FieldDefnBuilder {
            defn: FieldDefn {
                tag: tag.into(),
                name: name.into(),
                structure,
                data_type,
                repeat,
                format_controls: format_controls.map(str::to_owned),
                subfields: Vec::new(),
            },
        }
    }

    /// Look up a subfield slot by name.
    pub fn subfield(&self, name: &str) -> Option<&SubfieldDefn> {
        self.subfields.iter().find(|sub| sub.name == name)
    }
}

/// Builder left open for subfield attachment until explicitly finished.
#[derive(Debug)]
pub struct FieldDefnBuilder {
    defn: FieldDefn,
}

impl FieldDefnBuilder {
    /// Attach a subfield slot in encounter order.
    pub fn add_subfield(&mut self, name: impl Into<String>, format: &str) -> Result<()> {
        let format = parse_format(format)?;
        self.defn.subfields.push(SubfieldDefn {
            name: name.into(),
            format,
        });
        Ok(())
    }

    /// Apply the final format-control string and close the definition.
    ///
    /// `None` keeps whatever the construction phase set.
    pub fn finish(mut self, format_controls: Option<&str>) -> FieldDefn {
        if let Some(controls) = format_controls {
            self.defn.format_controls = Some(controls.to_owned());
        }
        self.defn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_code_literals() {
        assert_eq!(
            StructureCode::from_literal("vector"),
            Some(StructureCode::Vector)
        );
        assert_eq!(StructureCode::from_literal("unknown"), None);
        assert_eq!(StructureCode::default(), StructureCode::Elementary);
    }

    #[test]
    fn type_code_literals() {
        assert_eq!(
            DataTypeCode::from_literal("bit_string"),
            Some(DataTypeCode::BitString)
        );
        assert_eq!(DataTypeCode::from_literal(""), None);
        assert_eq!(DataTypeCode::default(), DataTypeCode::CharString);
    }

    #[test]
    fn two_phase_build_applies_controls_last() {
        let mut builder = FieldDefn::build(
            "0001",
            "Test field",
            StructureCode::Elementary,
            DataTypeCode::CharString,
            RepeatDescriptor::None,
            None,
        );
        builder.add_subfield("TXT", "A").unwrap();
        let defn = builder.finish(Some("(A)"));
        assert_eq!(defn.format_controls.as_deref(), Some("(A)"));
        assert_eq!(defn.subfields.len(), 1);
        assert!(defn.subfield("TXT").is_some());
    }

    #[test]
    fn repeat_descriptor_slots() {
        assert_eq!(RepeatDescriptor::None.as_descr(), None);
        assert_eq!(RepeatDescriptor::Empty.as_descr(), Some(""));
        assert_eq!(RepeatDescriptor::Variable.as_descr(), Some("*"));
        assert_eq!(
            RepeatDescriptor::Literal("2".to_string()).as_descr(),
            Some("2")
        );
    }
}
