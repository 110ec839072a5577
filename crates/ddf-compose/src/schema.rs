//! Catalog construction: tag-width validation, module configuration,
//! field-definition building.

use tracing::debug;

use ddf_8211::{DataTypeCode, DdfModule, FieldDefn, RepeatDescriptor, StructureCode};

use crate::error::{ComposeError, Result};
use crate::tree::Node;

/// Root marker element carrying the module attributes.
pub const MODULE_ELEMENT: &str = "DDFModule";
/// Field-definition child element.
pub const FIELD_DEFN_ELEMENT: &str = "DDFFieldDefn";
/// Subfield-descriptor child of a field definition.
pub const SUBFIELD_DEFN_ELEMENT: &str = "DDFSubfieldDefn";
/// Record child element.
pub const RECORD_ELEMENT: &str = "DDFRecord";
/// Field child of a record.
pub const FIELD_ELEMENT: &str = "DDFField";
/// Subfield-value child of a record field.
pub const SUBFIELD_ELEMENT: &str = "DDFSubfield";

/// Infer the module tag width from the field-definition nodes.
///
/// The first tag's length sets the width; any later tag of a different
/// length is fatal, before any record is processed. Zero definitions
/// infer width 0, which only an explicit override can replace.
pub fn infer_tag_width(module_node: &Node) -> Result<usize> {
    let mut width: Option<usize> = None;
    for defn in module_node.children_named(FIELD_DEFN_ELEMENT) {
        let tag = defn.attr_or("tag", "");
        match width {
            None => width = Some(tag.len()),
            Some(expected) if expected != tag.len() => {
                return Err(ComposeError::TagWidth {
                    tag: tag.to_string(),
                    expected,
                    actual: tag.len(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(width.unwrap_or(0))
}

/// Build a module from the root marker's scalar attributes.
///
/// Every attribute is independently optional; an explicit
/// `_sizeFieldTag` always takes precedence over the inferred width.
pub fn init_module(module_node: &Node, inferred_tag_width: usize) -> DdfModule {
    let mut module = DdfModule::default();
    module.interchange_level = char_attr(module_node, "_interchangeLevel", module.interchange_level);
    module.leader_identifier = char_attr(module_node, "_leaderIden", module.leader_identifier);
    module.code_extension = char_attr(
        module_node,
        "_inlineCodeExtensionIndicator",
        module.code_extension,
    );
    module.version = char_attr(module_node, "_versionNumber", module.version);
    module.app_indicator = char_attr(module_node, "_appIndicator", module.app_indicator);
    if let Some(charset) = module_node.attr("_extendedCharSet") {
        module.extended_char_set = charset.to_string();
    }
    module.size_fields.length = int_attr(module_node, "_sizeFieldLength", module.size_fields.length);
    module.size_fields.pos = int_attr(module_node, "_sizeFieldPos", module.size_fields.pos);
    module.size_fields.tag = int_attr(module_node, "_sizeFieldTag", inferred_tag_width);
    module.field_control_length = int_attr(
        module_node,
        "_fieldControlLength",
        module.field_control_length,
    );
    module
}

/// Build one field definition from its description node.
///
/// Unrecognized structure or type literals silently fall back to their
/// defaults; the dump format is lenient here by contract. The build is
/// two-phase: format controls are withheld
/// until every subfield is attached, then applied explicitly, because
/// the format-control language may reference subfield names.
pub fn build_field_defn(node: &Node) -> Result<FieldDefn> {
    let struct_text = node.attr_or("dataStructCode", "");
    let structure = StructureCode::from_literal(struct_text).unwrap_or_else(|| {
        if !struct_text.is_empty() {
            debug!(code = struct_text, "unrecognized dataStructCode, using elementary");
        }
        StructureCode::default()
    });
    let type_text = node.attr_or("dataTypeCode", "");
    let data_type = DataTypeCode::from_literal(type_text).unwrap_or_else(|| {
        if !type_text.is_empty() {
            debug!(code = type_text, "unrecognized dataTypeCode, using char_string");
        }
        DataTypeCode::default()
    });

    let repeat = match structure {
        StructureCode::Elementary => RepeatDescriptor::None,
        StructureCode::Vector => RepeatDescriptor::Empty,
        StructureCode::Array => RepeatDescriptor::Variable,
        StructureCode::Concatenated => {
            RepeatDescriptor::Literal(node.attr_or("arrayDescr", "").to_string())
        }
    };

    // Format controls are honored at creation only for elementary
    // fields; the attribute is re-applied below either way.
    let creation_controls = match structure {
        StructureCode::Elementary => node.attr("formatControls"),
        _ => None,
    };

    let mut builder = FieldDefn::build(
        node.attr_or("tag", ""),
        node.attr_or("fieldName", ""),
        structure,
        data_type,
        repeat,
        creation_controls,
    );
    for sub in node.children_named(SUBFIELD_DEFN_ELEMENT) {
        builder.add_subfield(sub.attr_or("name", ""), sub.attr_or("format", ""))?;
    }
    Ok(builder.finish(node.attr("formatControls")))
}

/// First byte of an attribute value, or the default.
fn char_attr(node: &Node, name: &str, default: u8) -> u8 {
    node.attr(name)
        .and_then(|value| value.bytes().next())
        .unwrap_or(default)
}

/// Integer attribute with C atoi leniency: garbage parses as zero.
pub(crate) fn int_attr(node: &Node, name: &str, default: usize) -> usize {
    match node.attr(name) {
        None => default,
        Some(text) => text.trim().parse().unwrap_or_else(|_| {
            debug!(attribute = name, value = text, "non-numeric attribute, using 0");
            0
        }),
    }
}
