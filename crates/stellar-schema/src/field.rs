//! Field definitions and their validation rules.
//!
//! A [`Field`] is declared once and serves two purposes: it serializes into
//! the authoring descriptor (labels, help text, validation hints), and it
//! validates raw document values into typed [`Value`]s at load time.

use std::{fmt, path::Path};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as Raw;
use stellar_core::{RawFields, frontmatter::json_kind, link};

use crate::{
    asset::AssetSource,
    block::{self, BlockCatalog},
    collection::CollectionName,
    error::{Result, ValidationError},
    path::FieldPath,
    value::{Fields, Reference, Value},
};

/// Named sub-fields of an object, in display order.
pub type ObjectSchema = IndexMap<String, Field>;

/// Inclusive length bounds, counted in characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LengthBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

impl LengthBounds {
    /// Bounds with both ends given.
    pub fn new(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Whether `len` lies within the bounds.
    pub fn contains(&self, len: usize) -> bool {
        self.min.is_none_or(|min| len >= min) && self.max.is_none_or(|max| len <= max)
    }
}

impl fmt::Display for LengthBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{min}..={max}"),
            (Some(min), None) => write!(f, "{min}.."),
            (None, Some(max)) => write!(f, "..={max}"),
            (None, None) => f.write_str(".."),
        }
    }
}

/// Constraints on a text field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextValidation {
    pub is_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<LengthBounds>,
}

/// A declared field: presentation metadata plus its kind.
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    /// Label shown to editors.
    pub label: String,

    /// Help text shown to editors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Storage type and constraints.
    #[serde(flatten)]
    pub kind: FieldKind,
}

/// The closed set of field kinds.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FieldKind {
    /// Plain text.
    Text {
        multiline: bool,
        validation: TextValidation,
    },
    /// Human-entered name from which an entry slug is derived.
    Slug {
        slug_label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        slug_description: Option<String>,
        validation: TextValidation,
    },
    /// Boolean, `false` unless set.
    Checkbox { default_value: bool },
    /// Integer or decimal number.
    Number { required: bool },
    /// Calendar date.
    Date { required: bool },
    /// Absolute or relative URL.
    Url { required: bool },
    /// Reference to an image asset.
    Image {
        required: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        directory: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        public_path: Option<String>,
    },
    /// Slug of an entry in another collection.
    Relationship {
        collection: CollectionName,
        required: bool,
    },
    /// Fixed set of named sub-fields.
    Object { fields: ObjectSchema },
    /// Ordered items of one type.
    Array {
        item: Box<Field>,
        #[serde(skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
    },
    /// Ordered page-builder blocks from a closed catalog.
    Blocks { catalog: BlockCatalog },
    /// No configurable fields.
    Empty,
}

impl Field {
    fn new(label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            label: label.into(),
            description: None,
            kind,
        }
    }

    /// Single-line text, optional.
    pub fn text(label: impl Into<String>) -> Self {
        Self::new(
            label,
            FieldKind::Text {
                multiline: false,
                validation: TextValidation::default(),
            },
        )
    }

    /// Name field that an entry's slug is derived from.
    pub fn slug(label: impl Into<String>, slug_label: impl Into<String>) -> Self {
        Self::new(
            label,
            FieldKind::Slug {
                slug_label: slug_label.into(),
                slug_description: None,
                validation: TextValidation::default(),
            },
        )
    }

    /// Checkbox defaulting to `false`.
    pub fn checkbox(label: impl Into<String>) -> Self {
        Self::new(label, FieldKind::Checkbox { default_value: false })
    }

    /// Number, optional.
    pub fn number(label: impl Into<String>) -> Self {
        Self::new(label, FieldKind::Number { required: false })
    }

    /// Date, optional.
    pub fn date(label: impl Into<String>) -> Self {
        Self::new(label, FieldKind::Date { required: false })
    }

    /// URL, optional.
    pub fn url(label: impl Into<String>) -> Self {
        Self::new(label, FieldKind::Url { required: false })
    }

    /// Image reference, optional.
    pub fn image(label: impl Into<String>) -> Self {
        Self::new(
            label,
            FieldKind::Image {
                required: false,
                directory: None,
                public_path: None,
            },
        )
    }

    /// Reference into `collection`, optional.
    pub fn relationship(label: impl Into<String>, collection: CollectionName) -> Self {
        Self::new(
            label,
            FieldKind::Relationship {
                collection,
                required: false,
            },
        )
    }

    /// Object with the given sub-fields, in order.
    pub fn object<'a>(label: impl Into<String>, fields: impl IntoIterator<Item = (&'a str, Field)>) -> Self {
        Self::new(
            label,
            FieldKind::Object {
                fields: fields.into_iter().map(|(name, f)| (name.to_string(), f)).collect(),
            },
        )
    }

    /// Array of `item`.
    pub fn array(label: impl Into<String>, item: Field) -> Self {
        Self::new(
            label,
            FieldKind::Array {
                item: Box::new(item),
                min_length: None,
            },
        )
    }

    /// Page-builder sequence over `catalog`.
    pub fn blocks(label: impl Into<String>, catalog: BlockCatalog) -> Self {
        Self::new(label, FieldKind::Blocks { catalog })
    }

    /// Field with nothing to configure.
    pub fn empty(label: impl Into<String>) -> Self {
        Self::new(label, FieldKind::Empty)
    }

    /// Attach help text.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the field required. Composite kinds and checkboxes are unaffected.
    #[must_use]
    pub fn required(mut self) -> Self {
        match &mut self.kind {
            FieldKind::Text { validation, .. } | FieldKind::Slug { validation, .. } => {
                validation.is_required = true;
            }
            FieldKind::Number { required }
            | FieldKind::Date { required }
            | FieldKind::Url { required }
            | FieldKind::Image { required, .. }
            | FieldKind::Relationship { required, .. } => *required = true,
            FieldKind::Checkbox { .. }
            | FieldKind::Object { .. }
            | FieldKind::Array { .. }
            | FieldKind::Blocks { .. }
            | FieldKind::Empty => {}
        }
        self
    }

    /// Render a text field as a multiline editor.
    #[must_use]
    pub fn multiline(mut self) -> Self {
        if let FieldKind::Text { multiline, .. } = &mut self.kind {
            *multiline = true;
        }
        self
    }

    /// Bound the character length of a text field.
    #[must_use]
    pub fn length(mut self, min: usize, max: usize) -> Self {
        if let FieldKind::Text { validation, .. } | FieldKind::Slug { validation, .. } = &mut self.kind {
            validation.length = Some(LengthBounds::new(min, max));
        }
        self
    }

    /// Help text for the slug half of a slug field.
    #[must_use]
    pub fn slug_description(mut self, description: impl Into<String>) -> Self {
        if let FieldKind::Slug { slug_description, .. } = &mut self.kind {
            *slug_description = Some(description.into());
        }
        self
    }

    /// Require at least `min` array items.
    #[must_use]
    pub fn min_items(mut self, min: usize) -> Self {
        if let FieldKind::Array { min_length, .. } = &mut self.kind {
            *min_length = Some(min);
        }
        self
    }

    /// Where the authoring UI stores uploaded images.
    #[must_use]
    pub fn directory(mut self, dir: impl Into<String>) -> Self {
        if let FieldKind::Image { directory, .. } = &mut self.kind {
            *directory = Some(dir.into());
        }
        self
    }

    /// Prefix written in front of uploaded image file names.
    #[must_use]
    pub fn public_path(mut self, path: impl Into<String>) -> Self {
        if let FieldKind::Image { public_path, .. } = &mut self.kind {
            *public_path = Some(path.into());
        }
        self
    }

    /// Whether an absent value is an error.
    pub fn is_required(&self) -> bool {
        match &self.kind {
            FieldKind::Text { validation, .. } | FieldKind::Slug { validation, .. } => validation.is_required,
            FieldKind::Number { required }
            | FieldKind::Date { required }
            | FieldKind::Url { required }
            | FieldKind::Image { required, .. }
            | FieldKind::Relationship { required, .. } => *required,
            FieldKind::Array { min_length, .. } => min_length.is_some_and(|min| min > 0),
            FieldKind::Checkbox { .. } | FieldKind::Object { .. } | FieldKind::Blocks { .. } | FieldKind::Empty => {
                false
            }
        }
    }

    /// Validate a raw value, appending every failure to `errors`.
    ///
    /// Returns `None` when the value is absent and has no default, or when
    /// it could not be validated at all. `null` counts as absent.
    pub fn validate(
        &self,
        raw: Option<&Raw>,
        path: &FieldPath,
        ctx: &FieldContext<'_>,
        errors: &mut Vec<ValidationError>,
    ) -> Option<Value> {
        let raw = raw.filter(|v| !v.is_null());

        let result = match &self.kind {
            FieldKind::Text { validation, .. } | FieldKind::Slug { validation, .. } => {
                validate_text(raw, validation, path)
            }
            FieldKind::Checkbox { default_value } => validate_checkbox(raw, *default_value, path).map(Some),
            FieldKind::Number { required } => validate_number(raw, *required, path),
            FieldKind::Date { required } => validate_date(raw, *required, path),
            FieldKind::Url { required } => validate_url(raw, *required, path),
            FieldKind::Image { required, .. } => validate_image(raw, *required, path, ctx),
            FieldKind::Relationship { collection, required } => {
                validate_relationship(raw, *collection, *required, path)
            }
            FieldKind::Object { fields } => return validate_object(fields, raw, path, ctx, errors),
            FieldKind::Array { item, min_length } => {
                return validate_array(item, *min_length, raw, path, ctx, errors);
            }
            FieldKind::Blocks { catalog } => return validate_block_field(catalog, raw, path, ctx, errors),
            FieldKind::Empty => validate_empty(raw, path).map(Some),
        };

        result.unwrap_or_else(|e| {
            errors.push(e);
            None
        })
    }
}

/// What field validation may look at besides the raw value.
#[derive(Clone, Copy)]
pub struct FieldContext<'a> {
    /// Asset lookup for image fields.
    pub assets: &'a dyn AssetSource,
    /// Directory of the document being validated.
    pub document_dir: &'a Path,
}

impl<'a> FieldContext<'a> {
    /// Create a context for a document stored in `document_dir`.
    pub fn new(assets: &'a dyn AssetSource, document_dir: &'a Path) -> Self {
        Self { assets, document_dir }
    }
}

impl fmt::Debug for FieldContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldContext")
            .field("document_dir", &self.document_dir)
            .finish_non_exhaustive()
    }
}

fn type_mismatch(path: &FieldPath, expected: &'static str, found: &Raw) -> ValidationError {
    ValidationError::TypeMismatch {
        path: path.clone(),
        expected,
        found: json_kind(found),
    }
}

/// A present string, or `None` when absent. Other shapes are mismatches.
fn present_string<'r>(raw: Option<&'r Raw>, path: &FieldPath) -> Result<Option<&'r str>> {
    match raw {
        None => Ok(None),
        Some(Raw::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(type_mismatch(path, "string", other)),
    }
}

fn missing(required: bool, path: &FieldPath) -> Result<Option<Value>> {
    if required {
        Err(ValidationError::RequiredFieldMissing { path: path.clone() })
    } else {
        Ok(None)
    }
}

/// A blank string: missing when required, otherwise kept as written.
fn blank(text: &str, required: bool, path: &FieldPath) -> Result<Option<Value>> {
    if required {
        Err(ValidationError::RequiredFieldMissing { path: path.clone() })
    } else {
        Ok(Some(Value::Blank(text.to_string())))
    }
}

/// Validate a text value against its required flag and length bounds.
pub fn validate_text(raw: Option<&Raw>, rules: &TextValidation, path: &FieldPath) -> Result<Option<Value>> {
    let Some(text) = present_string(raw, path)? else {
        return missing(rules.is_required, path);
    };

    if rules.is_required && text.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing { path: path.clone() });
    }

    if let Some(bounds) = rules.length {
        let len = text.chars().count();
        if !bounds.contains(len) {
            return Err(ValidationError::LengthOutOfBounds {
                path: path.clone(),
                len,
                bounds,
            });
        }
    }

    Ok(Some(Value::Text(text.to_string())))
}

/// Validate a checkbox; absence yields the default.
pub fn validate_checkbox(raw: Option<&Raw>, default_value: bool, path: &FieldPath) -> Result<Value> {
    match raw {
        None => Ok(Value::Bool(default_value)),
        Some(Raw::Bool(b)) => Ok(Value::Bool(*b)),
        Some(other) => Err(type_mismatch(path, "boolean", other)),
    }
}

/// Validate a JSON number. Numeric strings are not coerced.
pub fn validate_number(raw: Option<&Raw>, required: bool, path: &FieldPath) -> Result<Option<Value>> {
    match raw {
        None => missing(required, path),
        Some(Raw::Number(n)) => Ok(Some(Value::Number(n.clone()))),
        Some(other) => Err(type_mismatch(path, "number", other)),
    }
}

/// Validate a date given as `YYYY-MM-DD` or a full timestamp.
pub fn validate_date(raw: Option<&Raw>, required: bool, path: &FieldPath) -> Result<Option<Value>> {
    let Some(text) = present_string(raw, path)? else {
        return missing(required, path);
    };
    if text.trim().is_empty() {
        return blank(text, required, path);
    }

    parse_date(text)
        .map(|d| Some(Value::Date(d)))
        .ok_or_else(|| ValidationError::InvalidDate {
            path: path.clone(),
            value: text.to_string(),
        })
}

/// Parse a calendar date from the formats documents use.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Validate an absolute or relative URL.
pub fn validate_url(raw: Option<&Raw>, required: bool, path: &FieldPath) -> Result<Option<Value>> {
    let Some(text) = present_string(raw, path)? else {
        return missing(required, path);
    };
    if text.trim().is_empty() {
        return blank(text, required, path);
    }

    match link::parse_link(text) {
        Ok(_) => Ok(Some(Value::Url(text.to_string()))),
        Err(_) => Err(ValidationError::InvalidUrl {
            path: path.clone(),
            value: text.to_string(),
        }),
    }
}

/// Validate that an image reference resolves to an existing asset.
pub fn validate_image(
    raw: Option<&Raw>,
    required: bool,
    path: &FieldPath,
    ctx: &FieldContext<'_>,
) -> Result<Option<Value>> {
    let Some(reference) = present_string(raw, path)? else {
        return missing(required, path);
    };
    if reference.trim().is_empty() {
        return blank(reference, required, path);
    }

    if ctx.assets.exists(ctx.document_dir, reference) {
        Ok(Some(Value::Image(reference.to_string())))
    } else {
        Err(ValidationError::MissingAsset {
            path: path.clone(),
            asset: reference.to_string(),
        })
    }
}

/// Validate a relationship slug. Existence is checked after loading.
pub fn validate_relationship(
    raw: Option<&Raw>,
    collection: CollectionName,
    required: bool,
    path: &FieldPath,
) -> Result<Option<Value>> {
    let Some(slug) = present_string(raw, path)? else {
        return missing(required, path);
    };
    if slug.trim().is_empty() {
        return blank(slug, required, path);
    }

    Ok(Some(Value::Reference(Reference {
        collection,
        slug: slug.to_string(),
    })))
}

/// Validate a block value that declares no fields.
pub fn validate_empty(raw: Option<&Raw>, path: &FieldPath) -> Result<Value> {
    match raw {
        None => Ok(Value::Empty),
        Some(Raw::Object(map)) if map.is_empty() => Ok(Value::Empty),
        Some(other) => Err(type_mismatch(path, "no value", other)),
    }
}

/// Validate an object; absent objects validate as empty.
pub fn validate_object(
    schema: &ObjectSchema,
    raw: Option<&Raw>,
    path: &FieldPath,
    ctx: &FieldContext<'_>,
    errors: &mut Vec<ValidationError>,
) -> Option<Value> {
    let empty = RawFields::new();
    let map = match raw {
        None => &empty,
        Some(Raw::Object(map)) => map,
        Some(other) => {
            errors.push(type_mismatch(path, "object", other));
            return None;
        }
    };

    Some(Value::Object(validate_fields(schema, map, path, ctx, errors)))
}

/// Validate each declared field of `map`. Undeclared keys are ignored.
pub fn validate_fields(
    schema: &ObjectSchema,
    map: &RawFields,
    path: &FieldPath,
    ctx: &FieldContext<'_>,
    errors: &mut Vec<ValidationError>,
) -> Fields {
    let mut fields = Fields::with_capacity(schema.len());
    for (name, field) in schema {
        if let Some(value) = field.validate(map.get(name), &path.field(name), ctx, errors) {
            fields.insert(name.clone(), value);
        }
    }
    fields
}

/// Validate an array element-wise, then its minimum length.
pub fn validate_array(
    item: &Field,
    min_length: Option<usize>,
    raw: Option<&Raw>,
    path: &FieldPath,
    ctx: &FieldContext<'_>,
    errors: &mut Vec<ValidationError>,
) -> Option<Value> {
    let items: &[Raw] = match raw {
        None => &[],
        Some(Raw::Array(items)) => items,
        Some(other) => {
            errors.push(type_mismatch(path, "array", other));
            return None;
        }
    };

    if let Some(min) = min_length
        && items.len() < min
    {
        errors.push(ValidationError::MinArrayLengthViolation {
            path: path.clone(),
            min,
            len: items.len(),
        });
    }

    if raw.is_none() {
        return None;
    }

    let mut values = Vec::with_capacity(items.len());
    for (i, raw_item) in items.iter().enumerate() {
        let item_path = path.index(i);
        // A null item would otherwise pass as an empty object.
        if raw_item.is_null() {
            errors.push(ValidationError::RequiredFieldMissing { path: item_path });
            continue;
        }
        let before = errors.len();
        match item.validate(Some(raw_item), &item_path, ctx, errors) {
            Some(value) => values.push(value),
            // Holes are not allowed, even in arrays of optional items.
            None if errors.len() == before => {
                errors.push(ValidationError::RequiredFieldMissing { path: item_path });
            }
            None => {}
        }
    }

    Some(Value::Array(values))
}

fn validate_block_field(
    catalog: &BlockCatalog,
    raw: Option<&Raw>,
    path: &FieldPath,
    ctx: &FieldContext<'_>,
    errors: &mut Vec<ValidationError>,
) -> Option<Value> {
    let items = match raw {
        None => return None,
        Some(Raw::Array(items)) => items,
        Some(other) => {
            errors.push(type_mismatch(path, "array of blocks", other));
            return None;
        }
    };

    let outcome = block::validate_blocks(items, catalog, path, ctx);
    errors.extend(outcome.errors);
    Some(Value::Blocks(outcome.blocks))
}
