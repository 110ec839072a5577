//! Build DDF containers from declarative XML dump descriptions.
//!
//! A description is an XML tree with a `DDFModule` marker node whose
//! children declare the field catalog (`DDFFieldDefn`) and the records
//! to encode (`DDFRecord`). This crate interprets that tree — catalog
//! construction, tag-width validation, occurrence tracking, literal
//! decoding — and drives the `ddf-8211` writer to persist the result.
//!
//! The hard failure modes are deliberate and narrow: an unreadable or
//! malformed description, a missing `DDFModule` node, inconsistent tag
//! widths, a record naming an undeclared field, or a malformed hex
//! literal. Unrecognized structure/type/subfield-type literals are not
//! errors; the dump format treats them as defaults.

mod assemble;
mod decode;
mod error;
mod occurrence;
mod schema;
mod tree;

pub use assemble::{RunSummary, build_container};
pub use decode::{HEX_MARKER, decode_hex, decode_scalar, encode_hex};
pub use error::{ComposeError, Result};
pub use occurrence::OccurrenceTracker;
pub use schema::{
    FIELD_DEFN_ELEMENT, FIELD_ELEMENT, MODULE_ELEMENT, RECORD_ELEMENT, SUBFIELD_DEFN_ELEMENT,
    SUBFIELD_ELEMENT, build_field_defn, infer_tag_width, init_module,
};
pub use tree::{Node, parse_document};
