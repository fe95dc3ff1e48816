//! Frontmatter parsing for content documents.
//!
//! Documents are decoded into a [`RawFields`] map of field name to raw JSON
//! value. Validation against a schema happens later; this layer only cares
//! about the on-disk encoding.

use std::path::Path;

use serde_json::Value;

use crate::error::{CoreError, Result};

/// Field name to raw value, in document order.
pub type RawFields = serde_json::Map<String, Value>;

/// Storage format of a document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Frontmatter followed by a rich-text body (`.md`, `.mdx`, `.mdoc`).
    Markdown,
    /// Pure data file without a body (`.yaml`, `.yml`).
    Data,
}

impl DocumentFormat {
    /// Determine document format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "mdx" | "mdoc" | "markdown" => Some(Self::Markdown),
            "yaml" | "yml" => Some(Self::Data),
            _ => None,
        }
    }

    /// Determine document format from a path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// A decoded document: raw fields plus the optional body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument {
    /// Metadata fields.
    pub fields: RawFields,

    /// Rich-text body, present only for markdown documents.
    pub body: Option<String>,
}

/// Split content into frontmatter and body.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();
    let after_first = &content[delimiter.len()..];

    // The closing delimiter must start a line; an empty block closes immediately.
    let closing_pos = if after_first.trim_start_matches([' ', '\t', '\r']).starts_with('\n')
        && after_first.trim_start().starts_with(delimiter)
    {
        after_first.find(delimiter)?
    } else {
        after_first.find(&format!("\n{delimiter}"))? + 1
    };

    let frontmatter = after_first[..closing_pos].trim();
    let body = after_first[closing_pos + delimiter.len()..].trim_start();

    Some((format, frontmatter, body))
}

/// Parse a document in the given format.
pub fn parse_document(content: &str, format: DocumentFormat, path: &Path) -> Result<RawDocument> {
    match format {
        DocumentFormat::Data => Ok(RawDocument {
            fields: decode_yaml(content, path)?,
            body: None,
        }),
        DocumentFormat::Markdown => {
            let Some((fm_format, fm_str, body)) = split_frontmatter(content) else {
                // No frontmatter found, the whole file is body
                return Ok(RawDocument {
                    fields: RawFields::new(),
                    body: Some(content.to_string()),
                });
            };

            let fields = match fm_format {
                FrontmatterFormat::Yaml => decode_yaml(fm_str, path)?,
                FrontmatterFormat::Toml => decode_toml(fm_str, path)?,
            };

            Ok(RawDocument {
                fields,
                body: Some(body.to_string()),
            })
        }
    }
}

fn decode_yaml(source: &str, path: &Path) -> Result<RawFields> {
    if source.trim().is_empty() {
        return Ok(RawFields::new());
    }

    let value: Value =
        serde_yaml::from_str(source).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    into_fields(value, path)
}

fn decode_toml(source: &str, path: &Path) -> Result<RawFields> {
    let table: toml::Table =
        toml::from_str(source).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    into_fields(toml_to_json(toml::Value::Table(table)), path)
}

fn into_fields(value: Value, path: &Path) -> Result<RawFields> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(RawFields::new()),
        other => Err(CoreError::frontmatter(
            path,
            format!("expected a mapping of fields, found {}", json_kind(&other)),
        )),
    }
}

/// Convert a TOML value to JSON. Datetimes become their string form.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Short name of a JSON value's shape, for messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_yaml_frontmatter() {
        let content = r#"---
title: "Hello World"
pubDate: 2024-01-14
---

This is the body content."#;

        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Yaml);
        assert!(fm.contains("title:"));
        assert!(body.starts_with("This is the body"));
    }

    #[test]
    fn test_split_toml_frontmatter() {
        let content = r#"+++
title = "Hello World"
+++

This is the body content."#;

        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Toml);
        assert!(fm.contains("title ="));
        assert!(body.starts_with("This is the body"));
    }

    #[test]
    fn test_split_keeps_horizontal_rules_in_body() {
        let content = "---\ntitle: x\n---\nabove\n\n---\n\nbelow";
        let (_, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(fm, "title: x");
        assert!(body.contains("---"));
        assert!(body.ends_with("below"));
    }

    #[test]
    fn test_split_empty_frontmatter() {
        let (_, fm, body) = split_frontmatter("---\n---\nJust body").expect("split");
        assert!(fm.is_empty());
        assert_eq!(body, "Just body");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "Just some content without frontmatter.";
        assert!(split_frontmatter(content).is_none());
    }

    #[test]
    fn test_parse_yaml_document() {
        let content = r#"---
title: "Test Post"
pubDate: 2024-01-14
draft: false
authors:
  - jane-doe
---

Content here."#;

        let doc = parse_document(content, DocumentFormat::Markdown, Path::new("index.mdx"))
            .expect("parse");

        assert_eq!(doc.fields["title"], "Test Post");
        assert_eq!(doc.fields["pubDate"], "2024-01-14");
        assert_eq!(doc.fields["draft"], false);
        assert_eq!(doc.fields["authors"], serde_json::json!(["jane-doe"]));
        assert_eq!(doc.body.as_deref(), Some("Content here."));
    }

    #[test]
    fn test_parse_yaml_keeps_field_order() {
        let content = "---\nzeta: 1\nalpha: 2\n---\n";
        let doc = parse_document(content, DocumentFormat::Markdown, Path::new("index.md"))
            .expect("parse");
        let keys: Vec<_> = doc.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }

    #[test]
    fn test_parse_toml_document_datetime_as_string() {
        let content = r#"+++
title = "Test Post"
draft = true
pubDate = 2024-01-14
+++

Content here."#;

        let doc = parse_document(content, DocumentFormat::Markdown, Path::new("index.md"))
            .expect("parse");

        assert_eq!(doc.fields["title"], "Test Post");
        assert_eq!(doc.fields["draft"], true);
        assert_eq!(doc.fields["pubDate"], "2024-01-14");
    }

    #[test]
    fn test_parse_data_document() {
        let content = "name: Jane Doe\nquote: Great work\nfeatured: true\n";
        let doc = parse_document(content, DocumentFormat::Data, Path::new("index.yaml"))
            .expect("parse");

        assert_eq!(doc.fields["name"], "Jane Doe");
        assert_eq!(doc.fields["featured"], true);
        assert!(doc.body.is_none());
    }

    #[test]
    fn test_parse_markdown_without_frontmatter() {
        let doc = parse_document("# Heading", DocumentFormat::Markdown, Path::new("index.md"))
            .expect("parse");
        assert!(doc.fields.is_empty());
        assert_eq!(doc.body.as_deref(), Some("# Heading"));
    }

    #[test]
    fn test_non_mapping_frontmatter_is_rejected() {
        let content = "---\n- just\n- a list\n---\nbody";
        let err = parse_document(content, DocumentFormat::Markdown, Path::new("index.md"))
            .unwrap_err();
        assert!(err.to_string().contains("expected a mapping"));
    }

    #[test]
    fn test_document_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_extension("MDX"),
            Some(DocumentFormat::Markdown)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("a/index.yml")),
            Some(DocumentFormat::Data)
        );
        assert_eq!(DocumentFormat::from_extension("png"), None);
    }
}
