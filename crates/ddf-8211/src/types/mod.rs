//! Core types for DDF container writing.

mod field_defn;
mod module;
mod record;

pub use field_defn::{
    DataTypeCode, FieldDefn, FieldDefnBuilder, RepeatDescriptor, StructureCode, SubfieldDefn,
};
pub use module::{DdfModule, SizeFields};
pub use record::{DdfRecord, FieldInstance, FieldPayload, ScalarValue, SubfieldValue};
