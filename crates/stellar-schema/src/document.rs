//! Raw documents as loaded from storage, and the entries they validate into.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::{Serialize, Serializer};
use serde_json::Value as Raw;
use stellar_core::{RawDocument, RawFields};

use crate::{
    block::ValidatedBlock,
    collection::CollectionName,
    page::PageName,
    path::FieldPath,
    schema::EntrySchema,
    value::{Fields, Reference, Value},
};

/// Identity of a document: a collection entry or a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentId {
    Entry { collection: CollectionName, slug: String },
    Page(PageName),
}

impl DocumentId {
    pub fn entry(collection: CollectionName, slug: impl Into<String>) -> Self {
        Self::Entry {
            collection,
            slug: slug.into(),
        }
    }

    pub fn page(page: PageName) -> Self {
        Self::Page(page)
    }

    /// Schema this document validates against.
    pub fn schema(&self) -> &'static EntrySchema {
        match self {
            Self::Entry { collection, .. } => collection.schema(),
            Self::Page(page) => page.schema(),
        }
    }

    pub fn collection(&self) -> Option<CollectionName> {
        match self {
            Self::Entry { collection, .. } => Some(*collection),
            Self::Page(_) => None,
        }
    }

    pub fn slug(&self) -> Option<&str> {
        match self {
            Self::Entry { slug, .. } => Some(slug),
            Self::Page(_) => None,
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry { collection, slug } => write!(f, "{collection}/{slug}"),
            Self::Page(page) => write!(f, "{page}"),
        }
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A decoded document awaiting validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    /// File the document was read from.
    pub path: PathBuf,
    pub fields: RawFields,
    pub body: Option<String>,
}

impl Document {
    pub fn new(id: DocumentId, path: impl Into<PathBuf>, raw: RawDocument) -> Self {
        Self {
            id,
            path: path.into(),
            fields: raw.fields,
            body: raw.body,
        }
    }

    /// Whether the raw `draft` flag is set. Used before validation has run.
    pub fn is_marked_draft(&self) -> bool {
        matches!(self.fields.get("draft"), Some(Raw::Bool(true)))
    }

    /// Directory relative image references resolve against.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// A document that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub id: DocumentId,
    #[serde(skip)]
    pub path: PathBuf,
    pub fields: Fields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Entry {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Text of a text-like field.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Whether the entry is a draft. A missing flag means published.
    pub fn is_draft(&self) -> bool {
        self.get("draft").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Page-builder blocks in render order; empty when there is no builder.
    pub fn blocks(&self) -> &[ValidatedBlock] {
        self.get("builder").and_then(Value::as_blocks).unwrap_or_default()
    }

    /// Every relationship in the entry, with its full field path.
    pub fn references(&self) -> Vec<(FieldPath, &Reference)> {
        let mut out = Vec::new();
        for (name, value) in &self.fields {
            value.collect_references(&FieldPath::root().field(name), &mut out);
        }
        out
    }
}
