//! Entry schemas and the authoring descriptor.
//!
//! Each collection and page declares one [`EntrySchema`]. Load-time
//! validation and the authoring UI both read it, so there is nothing to keep
//! in sync by hand.

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    asset::AssetSource,
    collection::CollectionName,
    document::{Document, DocumentId, Entry},
    error::ValidationError,
    field::{Field, FieldContext, ObjectSchema, validate_fields},
    page::PageName,
    path::FieldPath,
    slug::is_valid_slug,
};

/// Fields, body and presentation of one kind of document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySchema {
    /// Label shown to editors.
    pub label: String,

    /// Storage directory relative to the data directory.
    pub path: String,

    /// Field the entry slug is derived from. Pages have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug_field: Option<String>,

    /// Fields shown in the entry list.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,

    /// Where the rendered page can be previewed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,

    /// Frontmatter fields, in editor order.
    pub fields: ObjectSchema,

    /// Rich-text body, stored after the frontmatter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyField>,
}

impl EntrySchema {
    /// Schema for a collection whose slugs come from `slug_field`.
    pub fn collection(label: impl Into<String>, path: impl Into<String>, slug_field: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            slug_field: Some(slug_field.into()),
            columns: Vec::new(),
            preview_url: None,
            fields: ObjectSchema::new(),
            body: None,
        }
    }

    /// Schema for a page stored at a fixed path.
    pub fn singleton(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            slug_field: None,
            columns: Vec::new(),
            preview_url: None,
            fields: ObjectSchema::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn columns<'a>(mut self, columns: impl IntoIterator<Item = &'a str>) -> Self {
        self.columns = columns.into_iter().map(str::to_string).collect();
        self
    }

    #[must_use]
    pub fn preview_url(mut self, url: impl Into<String>) -> Self {
        self.preview_url = Some(url.into());
        self
    }

    /// Append a field. Later fields with the same name replace earlier ones.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    #[must_use]
    pub fn body(mut self, body: BodyField) -> Self {
        self.body = Some(body);
        self
    }

    /// Validate a document, collecting every failure.
    ///
    /// The entry holds every field that validated, even when others did not.
    /// Relationship targets are not looked up here; that needs the whole
    /// site and happens in [`resolve_references`](crate::resolve::resolve_references).
    pub fn validate_document(&self, doc: &Document, assets: &dyn AssetSource) -> DocumentOutcome {
        let mut errors = Vec::new();

        if let DocumentId::Entry { slug, .. } = &doc.id
            && !is_valid_slug(slug)
        {
            errors.push(ValidationError::InvalidSlug { slug: slug.clone() });
        }

        let ctx = FieldContext::new(assets, doc.directory());
        let fields = validate_fields(&self.fields, &doc.fields, &FieldPath::root(), &ctx, &mut errors);

        if let Some(body) = &self.body
            && body.required
            && doc.body.as_deref().is_none_or(|b| b.trim().is_empty())
        {
            errors.push(ValidationError::RequiredFieldMissing {
                path: FieldPath::root().field(&body.name),
            });
        }

        DocumentOutcome {
            entry: Entry {
                id: doc.id.clone(),
                path: doc.path.clone(),
                fields,
                body: doc.body.clone(),
            },
            errors,
        }
    }
}

/// Result of validating one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOutcome {
    /// Everything that validated. Complete only when `errors` is empty.
    pub entry: Entry,
    pub errors: Vec<ValidationError>,
}

impl DocumentOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The entry, or every error if any field failed.
    pub fn into_result(self) -> Result<Entry, Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(self.entry)
        } else {
            Err(self.errors)
        }
    }
}

/// The rich-text body of a document.
#[derive(Debug, Clone, Serialize)]
pub struct BodyField {
    /// Name the body is exposed under.
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub options: RichTextOptions,
}

impl BodyField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, options: RichTextOptions) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            description: None,
            required: false,
            options,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Formatting the rich-text editor offers.
///
/// Bodies are stored as opaque text; embedded components are not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RichTextOptions {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
    /// Allowed heading levels.
    pub heading: Vec<u8>,
    pub blockquote: bool,
    pub ordered_list: bool,
    pub unordered_list: bool,
    pub table: bool,
    pub link: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<RichTextImages>,
    pub divider: bool,
    pub code_block: bool,
}

/// Where images pasted into a body are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RichTextImages {
    pub directory: String,
    pub public_path: String,
}

impl RichTextOptions {
    /// Every formatting option, headings 2 through 6, images stored in `image_directory`.
    pub fn full(image_directory: impl Into<String>) -> Self {
        Self {
            bold: true,
            italic: true,
            strikethrough: true,
            code: true,
            heading: vec![2, 3, 4, 5, 6],
            blockquote: true,
            ordered_list: true,
            unordered_list: true,
            table: true,
            link: true,
            image: Some(RichTextImages {
                directory: image_directory.into(),
                public_path: "../".to_string(),
            }),
            divider: true,
            code_block: true,
        }
    }
}

/// The complete authoring descriptor: every collection and page schema.
#[derive(Debug, Serialize)]
pub struct AuthoringSchema {
    pub collections: IndexMap<&'static str, &'static EntrySchema>,
    pub singletons: IndexMap<&'static str, &'static EntrySchema>,
}

impl AuthoringSchema {
    pub fn new() -> Self {
        Self {
            collections: CollectionName::ALL
                .into_iter()
                .map(|c| (c.as_str(), c.schema()))
                .collect(),
            singletons: PageName::ALL.into_iter().map(|p| (p.as_str(), p.schema())).collect(),
        }
    }
}

impl Default for AuthoringSchema {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;
    use stellar_core::RawFields;

    use super::*;
    use crate::{asset::KnownAssets, value::Value};

    fn document(id: DocumentId, fields: serde_json::Value, body: Option<&str>) -> Document {
        let fields: RawFields = serde_json::from_value(fields).expect("fields");
        Document {
            id,
            path: PathBuf::from("src/data/services/design/index.mdx"),
            fields,
            body: body.map(str::to_string),
        }
    }

    fn assets() -> KnownAssets {
        KnownAssets::new("public").with("src/data/services/design/main.jpg")
    }

    #[test]
    fn test_validate_service() {
        let doc = document(
            DocumentId::entry(CollectionName::Services, "design"),
            json!({
                "title": "Design",
                "description": "We design things.",
                "image": "./main.jpg",
            }),
            Some("Body text"),
        );

        let entry = CollectionName::Services
            .schema()
            .validate_document(&doc, &assets())
            .into_result()
            .expect("valid");

        assert_eq!(entry.get("title"), Some(&Value::Text("Design".into())));
        assert_eq!(entry.get("draft"), Some(&Value::Bool(false)));
        assert!(!entry.is_draft());
        assert_eq!(entry.body.as_deref(), Some("Body text"));
    }

    #[test]
    fn test_collects_every_error() {
        let doc = document(
            DocumentId::entry(CollectionName::Services, "Bad Slug"),
            json!({ "title": "Design", "description": "x".repeat(161), "image": "./nope.jpg" }),
            None,
        );

        let outcome = CollectionName::Services.schema().validate_document(&doc, &assets());
        // The title survives its siblings' failures.
        assert_eq!(outcome.entry.text("title"), Some("Design"));
        assert!(outcome.entry.get("description").is_none());

        let errors = outcome.into_result().expect_err("invalid");
        assert_eq!(errors.len(), 3);
        assert!(matches!(&errors[0], ValidationError::InvalidSlug { slug } if slug == "Bad Slug"));
        assert!(matches!(errors[1], ValidationError::LengthOutOfBounds { len: 161, .. }));
        assert!(matches!(errors[2], ValidationError::MissingAsset { .. }));
    }

    #[test]
    fn test_required_body() {
        let schema = EntrySchema::collection("Notes", "notes", "title")
            .field("title", Field::slug("Title", "Slug"))
            .body(BodyField::new("content", "Content", RichTextOptions::full("notes/")).required());

        let doc = document(DocumentId::entry(CollectionName::Blog, "a"), json!({}), Some("  \n"));
        let errors = schema.validate_document(&doc, &assets()).into_result().expect_err("invalid");
        assert_eq!(
            errors,
            vec![ValidationError::RequiredFieldMissing {
                path: FieldPath::root().field("content")
            }]
        );
    }

    #[test]
    fn test_authoring_descriptor() {
        let json = serde_json::to_value(AuthoringSchema::new()).expect("serialize");

        let collections: Vec<_> = json["collections"].as_object().expect("map").keys().cloned().collect();
        assert_eq!(collections, ["blog", "authors", "services", "testimonials"]);

        let blog = &json["collections"]["blog"];
        assert_eq!(blog["slugField"], "title");
        assert_eq!(blog["fields"]["title"]["kind"], "slug");
        assert_eq!(
            blog["fields"]["description"]["validation"],
            json!({ "isRequired": true, "length": { "min": 1, "max": 160 } })
        );
        assert_eq!(blog["body"]["options"]["heading"], json!([2, 3, 4, 5, 6]));

        let home = &json["singletons"]["home"];
        assert_eq!(home["previewUrl"], "/");
        assert_eq!(home["fields"]["builder"]["kind"], "blocks");
        assert_eq!(home["fields"]["builder"]["catalog"]["hero"]["label"], "Hero");
        assert!(home["fields"]["builder"]["catalog"].get("team").is_none());
    }
}
