//! ISO 8211 (DDF) data descriptive file writer.
//!
//! This crate serializes DDF containers: a data descriptive record
//! (DDR) describing a module's field catalog, followed by data records
//! whose leader and directory let readers locate each field's bytes.
//! It is write-only; reading containers back is out of scope.
//!
//! # Example
//!
//! ```
//! use ddf_8211::{
//!     DataTypeCode, DdfModule, DdfRecord, DdfWriter, FieldDefn, FieldInstance, FieldPayload,
//!     RepeatDescriptor, ScalarValue, StructureCode, SubfieldValue,
//! };
//!
//! let mut module = DdfModule::default();
//! let mut builder = FieldDefn::build(
//!     "0001",
//!     "Record id",
//!     StructureCode::Elementary,
//!     DataTypeCode::CharString,
//!     RepeatDescriptor::None,
//!     None,
//! );
//! builder.add_subfield("RCID", "I(5)").unwrap();
//! module.add_field(builder.finish(Some("(I(5))"))).unwrap();
//!
//! let mut buffer = Vec::new();
//! let mut writer = DdfWriter::new(&mut buffer, &module).unwrap();
//! let mut record = DdfRecord::new(&module);
//! record.add_field(FieldInstance {
//!     defn: module.find_field("0001").unwrap(),
//!     occurrence: 0,
//!     payload: FieldPayload::Subfields(vec![SubfieldValue {
//!         name: "RCID".to_string(),
//!         occurrence: 0,
//!         value: ScalarValue::Integer(1),
//!     }]),
//! });
//! writer.write_record(record).unwrap();
//! writer.finish().unwrap();
//! ```

mod error;
mod format;
mod leader;
mod types;
mod writer;

pub use error::{DdfError, Result};
pub use format::{SubfieldFormat, parse_format};
pub use leader::{FIELD_TERMINATOR, LEADER_LEN, UNIT_TERMINATOR};
pub use types::{
    DataTypeCode, DdfModule, DdfRecord, FieldDefn, FieldDefnBuilder, FieldInstance, FieldPayload,
    RepeatDescriptor, ScalarValue, SizeFields, StructureCode, SubfieldDefn, SubfieldValue,
};
pub use writer::DdfWriter;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
