//! Record assembly and the single pass that drives a run.
//!
//! The module node's children are processed in document order: field
//! definitions extend the catalog, record nodes become data records.
//! The output file is created lazily when the first record appears, so
//! a description without records has no file-creation side effect.
//! Records reach the writer in tree order and fields in source order;
//! both orderings are part of the container contract.

use std::fs::File;
use std::path::Path;

use tracing::{debug, info};

use ddf_8211::{DdfModule, DdfRecord, DdfWriter, FieldInstance, FieldPayload, SubfieldValue};

use crate::decode::{HEX_MARKER, decode_hex, decode_scalar};
use crate::error::{ComposeError, Result};
use crate::occurrence::OccurrenceTracker;
use crate::schema::{
    FIELD_DEFN_ELEMENT, FIELD_ELEMENT, MODULE_ELEMENT, RECORD_ELEMENT, SUBFIELD_ELEMENT,
    build_field_defn, infer_tag_width, init_module, int_attr,
};
use crate::tree::{self, Node};

/// Counters reported after a successful run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub definitions: usize,
    pub records: usize,
    pub bytes_written: u64,
    /// False when the description held no records and no file was made.
    pub output_created: bool,
}

/// Rebuild a DDF container from a description document.
pub fn build_container(description: &Path, output: &Path) -> Result<RunSummary> {
    let root = tree::parse_document(description)?;
    let module_node =
        root.find_descendant(MODULE_ELEMENT)
            .ok_or_else(|| ComposeError::MissingModule {
                path: description.to_path_buf(),
            })?;

    let inferred = infer_tag_width(module_node)?;
    let mut module = init_module(module_node, inferred);
    debug!(
        tag_width = module.size_fields.tag,
        "module configuration resolved"
    );

    let mut writer: Option<DdfWriter<File>> = None;
    let mut summary = RunSummary::default();
    for child in &module_node.children {
        match child.name.as_str() {
            FIELD_DEFN_ELEMENT => {
                module.add_field(build_field_defn(child)?)?;
                summary.definitions += 1;
            }
            RECORD_ELEMENT => {
                if writer.is_none() {
                    // The DDR snapshots the catalog registered so far.
                    writer = Some(DdfWriter::create(output, &module)?);
                    summary.output_created = true;
                }
                let record = assemble_record(child, &module)?;
                if let Some(writer) = writer.as_mut() {
                    writer.write_record(record)?;
                }
                summary.records += 1;
            }
            _ => {}
        }
    }
    if let Some(writer) = writer {
        summary.bytes_written = writer.finish()?;
    }
    info!(
        definitions = summary.definitions,
        records = summary.records,
        bytes = summary.bytes_written,
        "container rebuilt"
    );
    Ok(summary)
}

/// Assemble one record node against the catalog.
///
/// The record-scoped occurrence tracker lives exactly as long as this
/// call; the instance-scoped trackers live per field node.
fn assemble_record<'a>(node: &Node, module: &'a DdfModule) -> Result<DdfRecord<'a>> {
    let mut record = DdfRecord::new(module);
    record.size_fields.length = int_attr(node, "_sizeFieldLength", record.size_fields.length);
    record.size_fields.pos = int_attr(node, "_sizeFieldPos", record.size_fields.pos);
    record.size_fields.tag = int_attr(node, "_sizeFieldTag", record.size_fields.tag);

    let mut field_slots = OccurrenceTracker::new();
    for field_node in node.children_named(FIELD_ELEMENT) {
        let name = field_node.attr_or("name", "");
        let defn = module
            .find_field(name)
            .ok_or_else(|| ComposeError::UndeclaredField {
                name: name.to_string(),
            })?;
        let occurrence = field_slots.allocate(name);

        // A 0x-prefixed value selects the raw path; subfield children
        // are ignored in that case, even if present.
        let payload = match field_node
            .attr("value")
            .and_then(|value| value.strip_prefix(HEX_MARKER))
        {
            Some(digits) => FieldPayload::Raw(decode_hex(digits)?),
            None => FieldPayload::Subfields(assemble_subfields(field_node)?),
        };
        record.add_field(FieldInstance {
            defn,
            occurrence,
            payload,
        });
    }
    Ok(record)
}

/// Collect the typed subfield assignments of one field node.
fn assemble_subfields(field_node: &Node) -> Result<Vec<SubfieldValue>> {
    let mut slots = OccurrenceTracker::new();
    let mut values = Vec::new();
    for sub in field_node.children_named(SUBFIELD_ELEMENT) {
        let name = sub.attr_or("name", "");
        // The slot is consumed even when the value ends up skipped.
        let occurrence = slots.allocate(name);
        if let Some(value) = decode_scalar(sub.attr_or("type", ""), &sub.text)? {
            values.push(SubfieldValue {
                name: name.to_string(),
                occurrence,
                value,
            });
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddf_8211::ScalarValue;

    fn node(name: &str, attrs: &[(&str, &str)], text: &str) -> Node {
        Node {
            name: name.to_string(),
            attributes: attrs
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect(),
            text: text.to_string(),
            children: Vec::new(),
        }
    }

    fn sample_module() -> DdfModule {
        let mut defn = node(
            FIELD_DEFN_ELEMENT,
            &[("tag", "0001"), ("dataStructCode", "elementary")],
            "",
        );
        defn.children.push(node(
            crate::schema::SUBFIELD_DEFN_ELEMENT,
            &[("name", "TXT"), ("format", "A")],
            "",
        ));
        let mut module = init_module(&node(MODULE_ELEMENT, &[], ""), 4);
        module.add_field(build_field_defn(&defn).unwrap()).unwrap();
        module
    }

    #[test]
    fn repeated_fields_get_sequential_occurrences() {
        let module = sample_module();
        let mut record_node = node(RECORD_ELEMENT, &[], "");
        for text in ["A", "B"] {
            let mut field = node(FIELD_ELEMENT, &[("name", "0001")], "");
            field.children.push(node(
                SUBFIELD_ELEMENT,
                &[("name", "TXT"), ("type", "string")],
                text,
            ));
            record_node.children.push(field);
        }
        let record = assemble_record(&record_node, &module).unwrap();
        assert_eq!(record.fields().len(), 2);
        assert_eq!(record.fields()[0].occurrence, 0);
        assert_eq!(record.fields()[1].occurrence, 1);
        for (instance, expected) in record.fields().iter().zip(["A", "B"]) {
            let FieldPayload::Subfields(values) = &instance.payload else {
                panic!("expected subfield payload");
            };
            assert_eq!(values.len(), 1);
            assert_eq!(values[0].occurrence, 0);
            assert_eq!(values[0].value, ScalarValue::Text(expected.to_string()));
        }
    }

    #[test]
    fn raw_value_wins_over_subfield_children() {
        let module = sample_module();
        let mut field = node(FIELD_ELEMENT, &[("name", "0001"), ("value", "0x4142")], "");
        field.children.push(node(
            SUBFIELD_ELEMENT,
            &[("name", "TXT"), ("type", "string")],
            "ignored",
        ));
        let mut record_node = node(RECORD_ELEMENT, &[], "");
        record_node.children.push(field);
        let record = assemble_record(&record_node, &module).unwrap();
        assert_eq!(
            record.fields()[0].payload,
            FieldPayload::Raw(vec![0x41, 0x42])
        );
    }

    #[test]
    fn unprefixed_value_takes_the_structured_path() {
        let module = sample_module();
        let mut record_node = node(RECORD_ELEMENT, &[], "");
        record_node
            .children
            .push(node(FIELD_ELEMENT, &[("name", "0001"), ("value", "4142")], ""));
        let record = assemble_record(&record_node, &module).unwrap();
        assert_eq!(record.fields()[0].payload, FieldPayload::Subfields(vec![]));
    }

    #[test]
    fn undeclared_field_is_a_reference_error() {
        let module = sample_module();
        let mut record_node = node(RECORD_ELEMENT, &[], "");
        record_node
            .children
            .push(node(FIELD_ELEMENT, &[("name", "9999")], ""));
        let err = assemble_record(&record_node, &module).unwrap_err();
        assert!(matches!(err, ComposeError::UndeclaredField { name } if name == "9999"));
    }

    #[test]
    fn skipped_subfields_still_consume_slots() {
        let mut field = node(FIELD_ELEMENT, &[("name", "0001")], "");
        field.children.push(node(
            SUBFIELD_ELEMENT,
            &[("name", "TXT"), ("type", "mystery")],
            "skipped",
        ));
        field.children.push(node(
            SUBFIELD_ELEMENT,
            &[("name", "TXT"), ("type", "string")],
            "kept",
        ));
        let values = assemble_subfields(&field).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].occurrence, 1);
    }

    #[test]
    fn record_size_field_overrides_apply() {
        let module = sample_module();
        let record_node = node(RECORD_ELEMENT, &[("_sizeFieldLength", "4")], "");
        let record = assemble_record(&record_node, &module).unwrap();
        assert_eq!(record.size_fields.length, 4);
        assert_eq!(record.size_fields.pos, module.size_fields.pos);
    }
}
