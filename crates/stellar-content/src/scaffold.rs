//! New-entry scaffolding.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use serde_json::{Value as Raw, json};
use stellar_core::RawFields;
use stellar_schema::{CollectionName, EntrySchema, Field, FieldKind, Slug};
use thiserror::Error;
use tracing::info;

use crate::collector::DOCUMENT_EXTENSIONS;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An entry with the derived slug already exists.
    #[error("entry already exists: {0}")]
    Exists(PathBuf),

    /// The name yields no usable slug.
    #[error("cannot derive a slug from '{0}'")]
    InvalidName(String),
}

/// Write `<data_dir>/<collection>/<slug>/index.mdx` with every schema field.
///
/// Returns the path written. Never overwrites an existing entry.
pub fn scaffold_entry(data_dir: &Path, collection: CollectionName, name: &str) -> Result<PathBuf, ScaffoldError> {
    let slug = Slug::from_name(name).ok_or_else(|| ScaffoldError::InvalidName(name.to_string()))?;
    let collection_dir = data_dir.join(collection.as_str());
    let entry_dir = collection_dir.join(slug.as_str());

    if entry_dir.exists() {
        return Err(ScaffoldError::Exists(entry_dir));
    }
    if let Some(existing) = DOCUMENT_EXTENSIONS
        .iter()
        .map(|ext| collection_dir.join(format!("{slug}.{ext}")))
        .find(|path| path.exists())
    {
        return Err(ScaffoldError::Exists(existing));
    }

    let schema = collection.schema();
    let fields = template_fields(schema, name, Local::now().date_naive());
    let mut content = format!("---\n{}---\n", serde_yaml::to_string(&fields)?);
    if let Some(body) = &schema.body {
        content.push_str(&format!("\n{} goes here.\n", body.label));
    }

    fs::create_dir_all(&entry_dir)?;
    let path = entry_dir.join("index.mdx");
    fs::write(&path, content)?;

    info!(%collection, %slug, path = %path.display(), "Scaffolded entry");
    Ok(path)
}

/// Frontmatter with a placeholder for every field; the slug field gets `name`.
pub fn template_fields(schema: &EntrySchema, name: &str, today: NaiveDate) -> RawFields {
    schema
        .fields
        .iter()
        .map(|(key, field)| {
            let value = if schema.slug_field.as_deref() == Some(key.as_str()) {
                json!(name)
            } else {
                placeholder(field, today)
            };
            (key.clone(), value)
        })
        .collect()
}

fn placeholder(field: &Field, today: NaiveDate) -> Raw {
    match &field.kind {
        FieldKind::Text { .. }
        | FieldKind::Slug { .. }
        | FieldKind::Url { .. }
        | FieldKind::Image { .. }
        | FieldKind::Relationship { .. } => json!(""),
        FieldKind::Checkbox { default_value } => json!(default_value),
        FieldKind::Number { .. } => json!(0),
        FieldKind::Date { .. } => json!(today.format("%Y-%m-%d").to_string()),
        FieldKind::Object { fields } => Raw::Object(
            fields
                .iter()
                .map(|(key, f)| (key.clone(), placeholder(f, today)))
                .collect(),
        ),
        FieldKind::Array { .. } | FieldKind::Blocks { .. } => json!([]),
        FieldKind::Empty => json!({}),
    }
}
