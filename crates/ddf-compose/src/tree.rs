//! Ordered tree view of a description document.
//!
//! Descriptions are small (they describe fixture files), so the whole
//! document is loaded into an owned tree before interpretation; the
//! tree is then held read-only for the rest of the run.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::error::{ComposeError, Result};

/// One element: name, attributes, text content, ordered children.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Node>,
}

impl Node {
    /// Attribute value by exact name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value or a default.
    pub fn attr_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attr(name).unwrap_or(default)
    }

    /// Ordered children with the given element name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Depth-first search for an element, this node included.
    pub fn find_descendant(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_descendant(name))
    }
}

/// Load a description document into a tree.
///
/// The returned node is a synthetic document root whose children are
/// the file's top-level elements.
pub fn parse_document(path: &Path) -> Result<Node> {
    let file = File::open(path).map_err(|source| ComposeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    reader.config_mut().trim_text(true);

    let parse_error = |source| ComposeError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut stack = vec![Node {
        name: "#document".to_string(),
        ..Node::default()
    }];
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(parse_error)? {
            Event::Start(start) => {
                let node = node_from_start(&start).map_err(parse_error)?;
                stack.push(node);
            }
            Event::Empty(start) => {
                let node = node_from_start(&start).map_err(parse_error)?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(node);
                }
            }
            Event::End(_) => {
                // The reader checks tag balance, so the document root
                // always stays on the stack.
                if stack.len() > 1 {
                    let node = stack.pop().unwrap_or_default();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(node);
                    }
                }
            }
            Event::Text(text) => {
                let value = text
                    .decode()
                    .map_err(quick_xml::Error::from)
                    .map_err(parse_error)?;
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&value);
                }
            }
            // Entity and character references arrive as their own
            // events; text events never contain them.
            Event::GeneralRef(entity) => {
                if let Some(node) = stack.last_mut() {
                    append_reference(&entity, &mut node.text).map_err(parse_error)?;
                }
            }
            Event::CData(data) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(stack.swap_remove(0))
}

/// Resolve one general reference into `out`.
///
/// Character references and the predefined XML entities resolve to the
/// character they name; any other entity keeps its source spelling.
fn append_reference(
    entity: &BytesRef<'_>,
    out: &mut String,
) -> std::result::Result<(), quick_xml::Error> {
    if let Some(resolved) = entity.resolve_char_ref().map_err(quick_xml::Error::from)? {
        out.push(resolved);
        return Ok(());
    }
    let name = entity.decode().map_err(quick_xml::Error::from)?;
    match name.as_ref() {
        "amp" => out.push('&'),
        "lt" => out.push('<'),
        "gt" => out.push('>'),
        "apos" => out.push('\''),
        "quot" => out.push('"'),
        other => {
            out.push('&');
            out.push_str(other);
            out.push(';');
        }
    }
    Ok(())
}

fn node_from_start(start: &BytesStart<'_>) -> std::result::Result<Node, quick_xml::Error> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(Node {
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}
