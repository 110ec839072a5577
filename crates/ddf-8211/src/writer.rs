//! DDF container writer.
//!
//! The writer emits the data descriptive record (DDR) from the module
//! catalog as soon as it is created, then one data record per
//! `DdfRecord`. Records land in the file in the order they are written,
//! fields in the order they were added; readers rebuild field positions
//! from the directory, so both orderings matter.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::format::encode_scalar;
use crate::leader::{FIELD_TERMINATOR, LEADER_LEN, Leader, UNIT_TERMINATOR, build_directory, build_leader};
use crate::types::{DdfModule, DdfRecord, FieldDefn, FieldInstance, FieldPayload, SubfieldValue};

/// DDF container writer.
pub struct DdfWriter<W: Write> {
    writer: BufWriter<W>,
    bytes_written: u64,
    records_written: u64,
}

impl<W: Write> DdfWriter<W> {
    /// Create a writer and emit the DDR for `module`'s catalog.
    pub fn new(writer: W, module: &DdfModule) -> Result<Self> {
        let mut out = Self {
            writer: BufWriter::new(writer),
            bytes_written: 0,
            records_written: 0,
        };
        let ddr = build_ddr(module)?;
        out.writer.write_all(&ddr)?;
        out.bytes_written += ddr.len() as u64;
        debug!(bytes = ddr.len(), fields = module.fields().len(), "wrote DDR");
        Ok(out)
    }

    /// Serialize one completed record. The record is consumed: written
    /// is its terminal state.
    pub fn write_record(&mut self, record: DdfRecord<'_>) -> Result<()> {
        let mut fields: Vec<(&str, Vec<u8>)> = Vec::with_capacity(record.fields().len());
        for instance in record.fields() {
            fields.push((instance.defn.tag.as_str(), encode_field(instance)?));
        }
        let leader = Leader {
            record_length: 0,
            interchange_level: b' ',
            leader_identifier: b'D',
            code_extension: b' ',
            version: b' ',
            app_indicator: b' ',
            field_control_length: None,
            base_address: 0,
            extended_char_set: [b' '; 3],
            size_fields: record.size_fields,
        };
        let bytes = assemble_record(leader, &fields)?;
        self.writer.write_all(&bytes)?;
        self.bytes_written += bytes.len() as u64;
        self.records_written += 1;
        debug!(
            record = self.records_written,
            bytes = bytes.len(),
            "wrote data record"
        );
        Ok(())
    }

    /// Number of data records written so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush and close, returning the total bytes written.
    pub fn finish(mut self) -> Result<u64> {
        self.writer.flush()?;
        Ok(self.bytes_written)
    }
}

impl DdfWriter<File> {
    /// Create the output file and emit the DDR.
    pub fn create(path: &Path, module: &DdfModule) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(file, module)
    }
}

/// Build the DDR bytes for a module catalog.
fn build_ddr(module: &DdfModule) -> Result<Vec<u8>> {
    let mut fields: Vec<(&str, Vec<u8>)> = Vec::with_capacity(module.fields().len());
    for defn in module.fields() {
        fields.push((defn.tag.as_str(), ddr_entry(defn, module.field_control_length)));
    }
    let leader = Leader {
        record_length: 0,
        interchange_level: module.interchange_level,
        leader_identifier: module.leader_identifier,
        code_extension: module.code_extension,
        version: module.version,
        app_indicator: module.app_indicator,
        field_control_length: Some(module.field_control_length),
        base_address: 0,
        extended_char_set: module.extended_char_set_bytes(),
        size_fields: module.size_fields,
    };
    assemble_record(leader, &fields)
}

/// One DDR entry: field controls, name, descriptor, format controls.
fn ddr_entry(defn: &FieldDefn, field_control_length: usize) -> Vec<u8> {
    let mut data = vec![defn.structure.digit(), defn.data_type.digit()];
    data.extend_from_slice(b"00;&");
    if data.len() < field_control_length {
        data.resize(field_control_length, b' ');
    }
    data.extend_from_slice(defn.name.as_bytes());
    let descr = defn.repeat.as_descr();
    if descr.is_some() || defn.format_controls.is_some() {
        data.push(UNIT_TERMINATOR);
        data.extend_from_slice(descr.unwrap_or_default().as_bytes());
        data.push(UNIT_TERMINATOR);
        data.extend_from_slice(defn.format_controls.as_deref().unwrap_or_default().as_bytes());
    }
    data
}

/// Encode one field instance's data area, without its terminator.
fn encode_field(instance: &FieldInstance<'_>) -> Result<Vec<u8>> {
    match &instance.payload {
        FieldPayload::Raw(bytes) => Ok(bytes.clone()),
        FieldPayload::Subfields(values) => encode_subfields(instance.defn, values),
    }
}

/// Encode subfield assignments, one repetition group per occurrence.
fn encode_subfields(defn: &FieldDefn, values: &[SubfieldValue]) -> Result<Vec<u8>> {
    let groups = values
        .iter()
        .map(|value| value.occurrence + 1)
        .max()
        .unwrap_or(1);
    let mut data = Vec::new();
    for occurrence in 0..groups {
        for sub in &defn.subfields {
            let value = values
                .iter()
                .find(|value| value.occurrence == occurrence && value.name == sub.name)
                .map(|value| &value.value);
            encode_scalar(&mut data, &sub.format, value)?;
        }
    }
    Ok(data)
}

/// Glue a leader, directory and field areas into one record.
fn assemble_record(mut leader: Leader, fields: &[(&str, Vec<u8>)]) -> Result<Vec<u8>> {
    // Field lengths include each field's own terminator.
    let entries: Vec<(&str, usize)> = fields
        .iter()
        .map(|(tag, data)| (*tag, data.len() + 1))
        .collect();
    let directory = build_directory(&leader.size_fields, &entries)?;
    let data_len: usize = entries.iter().map(|(_, len)| len).sum();
    leader.base_address = LEADER_LEN + directory.len();
    leader.record_length = leader.base_address + data_len;

    let mut out = Vec::with_capacity(leader.record_length);
    out.extend_from_slice(&build_leader(&leader)?);
    out.extend_from_slice(&directory);
    for (_, data) in fields {
        out.extend_from_slice(data);
        out.push(FIELD_TERMINATOR);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        DataTypeCode, FieldDefn, RepeatDescriptor, ScalarValue, StructureCode,
    };

    fn sample_module() -> DdfModule {
        let mut module = DdfModule::default();
        let mut builder = FieldDefn::build(
            "0001",
            "Record id",
            StructureCode::Elementary,
            DataTypeCode::CharString,
            RepeatDescriptor::None,
            None,
        );
        builder.add_subfield("RCID", "I(5)").unwrap();
        module.add_field(builder.finish(Some("(I(5))"))).unwrap();
        module
    }

    #[test]
    fn ddr_entry_layout() {
        let module = sample_module();
        let entry = ddr_entry(&module.fields()[0], module.field_control_length);
        // Controls padded to the field-control length, then the name.
        assert_eq!(&entry[..9], b"0000;&   ");
        assert_eq!(&entry[9..18], b"Record id");
        // Elementary: no descriptor slot, format controls follow.
        assert_eq!(&entry[18..], b"\x1f\x1f(I(5))");
    }

    #[test]
    fn ddr_entry_without_descriptor_or_controls_is_bare() {
        let defn = FieldDefn::build(
            "0000",
            "Title",
            StructureCode::Elementary,
            DataTypeCode::CharString,
            RepeatDescriptor::None,
            None,
        )
        .finish(None);
        let entry = ddr_entry(&defn, 9);
        assert_eq!(&entry[9..], b"Title");
    }

    #[test]
    fn ddr_entry_vector_descriptor_is_empty() {
        let mut builder = FieldDefn::build(
            "ATTV",
            "Attributes",
            StructureCode::Vector,
            DataTypeCode::MixedDataType,
            RepeatDescriptor::Empty,
            None,
        );
        builder.add_subfield("ATTL", "b12").unwrap();
        let entry = ddr_entry(&builder.finish(Some("(b12)")), 9);
        assert_eq!(entry[0], b'1');
        assert_eq!(entry[1], b'6');
        assert_eq!(&entry[9..], b"Attributes\x1f\x1f(b12)");
    }

    #[test]
    fn writes_ddr_and_one_record() {
        let module = sample_module();
        let mut buffer = Vec::new();
        let mut writer = DdfWriter::new(&mut buffer, &module).unwrap();
        let mut record = DdfRecord::new(&module);
        record.add_field(FieldInstance {
            defn: module.find_field("0001").unwrap(),
            occurrence: 0,
            payload: FieldPayload::Subfields(vec![SubfieldValue {
                name: "RCID".to_string(),
                occurrence: 0,
                value: ScalarValue::Integer(7),
            }]),
        });
        writer.write_record(record).unwrap();
        assert_eq!(writer.records_written(), 1);
        let bytes = writer.finish().unwrap();
        assert_eq!(bytes as usize, buffer.len());

        // DDR leader: declared length matches the DDR slice.
        let ddr_len: usize = std::str::from_utf8(&buffer[..5]).unwrap().parse().unwrap();
        assert_eq!(buffer[6], b'L');
        // Data record follows immediately and covers the rest.
        let rec = &buffer[ddr_len..];
        let rec_len: usize = std::str::from_utf8(&rec[..5]).unwrap().parse().unwrap();
        assert_eq!(rec.len(), rec_len);
        assert_eq!(rec[6], b'D');
        // Data record directory: tag 0001, length 6 ("00007" + FT), pos 0.
        let base: usize = std::str::from_utf8(&rec[12..17]).unwrap().parse().unwrap();
        assert_eq!(&rec[24..28], b"0001");
        assert_eq!(&rec[base..rec_len - 1], b"00007");
        assert_eq!(rec[rec_len - 1], FIELD_TERMINATOR);
    }

    #[test]
    fn create_writes_ddr_to_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.ddf");
        let module = sample_module();
        let writer = DdfWriter::create(&path, &module).unwrap();
        let bytes = writer.finish().unwrap();
        let on_disk = std::fs::read(&path).unwrap();
        assert_eq!(bytes as usize, on_disk.len());
        assert_eq!(on_disk[6], b'L');
    }

    #[test]
    fn raw_payload_written_verbatim() {
        let module = sample_module();
        let mut buffer = Vec::new();
        let mut writer = DdfWriter::new(&mut buffer, &module).unwrap();
        let mut record = DdfRecord::new(&module);
        record.add_field(FieldInstance {
            defn: module.find_field("0001").unwrap(),
            occurrence: 0,
            payload: FieldPayload::Raw(vec![0x41, 0x42]),
        });
        writer.write_record(record).unwrap();
        writer.finish().unwrap();
        let tail = &buffer[buffer.len() - 3..];
        assert_eq!(tail, &[0x41, 0x42, FIELD_TERMINATOR]);
    }
}
