//! Validated, typed field values.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Serialize, Serializer, ser::SerializeMap, ser::SerializeSeq};

use crate::{block::ValidatedBlock, collection::CollectionName, path::FieldPath};

/// Validated fields of an entry or object, in schema order.
pub type Fields = IndexMap<String, Value>;

/// A value that passed its field's validation.
///
/// Serializes back to the plain shape it was read from, so a validated value
/// compares equal to its raw input.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Single or multiline text (also slug-field names).
    Text(String),
    /// Checkbox state.
    Bool(bool),
    /// Integer or decimal, as written.
    Number(serde_json::Number),
    /// Calendar date.
    Date(NaiveDate),
    /// Absolute or relative URL.
    Url(String),
    /// Asset reference as written in the document.
    Image(String),
    /// Unresolved reference into another collection.
    Reference(Reference),
    /// Optional date, URL, image or relationship left blank, as written.
    Blank(String),
    /// Fixed set of named sub-fields.
    Object(Fields),
    /// Ordered items of one type.
    Array(Vec<Value>),
    /// Ordered page-builder blocks.
    Blocks(Vec<ValidatedBlock>),
    /// Block with no configurable fields.
    Empty,
}

/// A slug pointing into a named collection, resolved after loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    /// Target collection.
    pub collection: CollectionName,
    /// Target slug, as written.
    pub slug: String,
}

impl Value {
    /// Text content of text-like values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Url(s) | Self::Image(s) | Self::Blank(s) => Some(s.as_str()),
            Self::Reference(r) => Some(r.slug.as_str()),
            _ => None,
        }
    }

    /// Checkbox state.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&serde_json::Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Date value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Object fields.
    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Array items.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Page-builder blocks.
    pub fn as_blocks(&self) -> Option<&[ValidatedBlock]> {
        match self {
            Self::Blocks(blocks) => Some(blocks),
            _ => None,
        }
    }

    /// Relationship reference.
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Collect every reference below this value, with its path.
    pub fn collect_references<'a>(&'a self, path: &FieldPath, out: &mut Vec<(FieldPath, &'a Reference)>) {
        match self {
            Self::Reference(r) => out.push((path.clone(), r)),
            Self::Object(fields) => {
                for (name, value) in fields {
                    value.collect_references(&path.field(name), out);
                }
            }
            Self::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    item.collect_references(&path.index(i), out);
                }
            }
            Self::Blocks(blocks) => {
                for block in blocks {
                    block.value.collect_references(&path.index(block.position), out);
                }
            }
            Self::Text(_)
            | Self::Bool(_)
            | Self::Number(_)
            | Self::Date(_)
            | Self::Url(_)
            | Self::Image(_)
            | Self::Blank(_)
            | Self::Empty => {}
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) | Self::Url(s) | Self::Image(s) | Self::Blank(s) => serializer.serialize_str(s),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            Self::Reference(r) => serializer.serialize_str(&r.slug),
            Self::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Blocks(blocks) => {
                let mut seq = serializer.serialize_seq(Some(blocks.len()))?;
                for block in blocks {
                    seq.serialize_element(block)?;
                }
                seq.end()
            }
            Self::Empty => serializer.serialize_map(Some(0))?.end(),
        }
    }
}
