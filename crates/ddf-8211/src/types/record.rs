//! Records and the values bound to their field instances.
//!
//! A record is created against a module, accumulates field instances in
//! source order, and is consumed by `DdfWriter::write_record`. Nothing
//! survives a record's write except the module it borrowed from.

use crate::types::field_defn::FieldDefn;
use crate::types::module::{DdfModule, SizeFields};

/// A typed scalar bound to one subfield slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Float(f64),
    Integer(i64),
    Text(String),
    Bytes(Vec<u8>),
}

impl ScalarValue {
    pub(crate) fn as_i64(&self) -> i64 {
        match self {
            Self::Integer(value) => *value,
            Self::Float(value) => *value as i64,
            Self::Text(text) => text.trim().parse().unwrap_or(0),
            Self::Bytes(_) => 0,
        }
    }

    pub(crate) fn as_f64(&self) -> f64 {
        match self {
            Self::Integer(value) => *value as f64,
            Self::Float(value) => *value,
            Self::Text(text) => text.trim().parse().unwrap_or(0.0),
            Self::Bytes(_) => 0.0,
        }
    }

    pub(crate) fn text_bytes(&self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.clone().into_bytes(),
            Self::Integer(value) => value.to_string().into_bytes(),
            Self::Float(value) => value.to_string().into_bytes(),
            Self::Bytes(bytes) => bytes.clone(),
        }
    }
}

/// One subfield assignment: name, occurrence slot, payload.
///
/// The occurrence index is the zero-based ordinal among same-named
/// subfields within one field instance; for repeating (vector) fields
/// it selects the repetition group the value lands in.
#[derive(Debug, Clone, PartialEq)]
pub struct SubfieldValue {
    pub name: String,
    pub occurrence: u32,
    pub value: ScalarValue,
}

/// The payload of a field instance: raw bytes or subfield assignments,
/// never both.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPayload {
    Raw(Vec<u8>),
    Subfields(Vec<SubfieldValue>),
}

/// One field occurrence inside a record, bound to its catalog entry.
#[derive(Debug, Clone)]
pub struct FieldInstance<'a> {
    pub defn: &'a FieldDefn,
    /// Zero-based ordinal among same-named fields in this record.
    pub occurrence: u32,
    pub payload: FieldPayload,
}

/// An ordered sequence of field instances plus per-record overrides of
/// the directory entry widths.
#[derive(Debug, Clone)]
pub struct DdfRecord<'a> {
    pub size_fields: SizeFields,
    fields: Vec<FieldInstance<'a>>,
}

impl<'a> DdfRecord<'a> {
    /// Create an empty record inheriting the module's entry widths.
    pub fn new(module: &DdfModule) -> Self {
        Self {
            size_fields: module.size_fields,
            fields: Vec::new(),
        }
    }

    /// Append a field instance; emission order is insertion order.
    pub fn add_field(&mut self, instance: FieldInstance<'a>) {
        self.fields.push(instance);
    }

    /// Field instances in emission order.
    pub fn fields(&self) -> &[FieldInstance<'a>] {
        &self.fields
    }
}
