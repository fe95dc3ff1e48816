//! Validation errors.
//!
//! Every variant carries enough location information for an editor to find
//! the offending value without re-running validation.

use thiserror::Error;

use crate::{
    block::BlockType, collection::CollectionName, document::DocumentId, field::LengthBounds,
    path::FieldPath,
};

/// Result type for single-value validation.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required value is absent or blank.
    #[error("{path}: required field is missing")]
    RequiredFieldMissing { path: FieldPath },

    /// Text length outside the declared bounds.
    #[error("{path}: length {len} is outside {bounds}")]
    LengthOutOfBounds {
        path: FieldPath,
        len: usize,
        bounds: LengthBounds,
    },

    /// Value does not parse to a calendar date.
    #[error("{path}: '{value}' is not a valid date")]
    InvalidDate { path: FieldPath, value: String },

    /// Value is not a valid absolute or relative URL.
    #[error("{path}: '{value}' is not a valid URL")]
    InvalidUrl { path: FieldPath, value: String },

    /// Raw value has the wrong shape for its field.
    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: FieldPath,
        expected: &'static str,
        found: &'static str,
    },

    /// Image reference does not resolve to an asset.
    #[error("{path}: image '{asset}' does not exist")]
    MissingAsset { path: FieldPath, asset: String },

    /// Array shorter than its declared minimum.
    #[error("{path}: {len} item(s) given, at least {min} required")]
    MinArrayLengthViolation {
        path: FieldPath,
        min: usize,
        len: usize,
    },

    /// Block discriminant not registered in the page's catalog.
    #[error("block {index}: unknown block type '{discriminant}'")]
    UnknownBlockType { index: usize, discriminant: String },

    /// A field inside a block failed validation.
    #[error("block {index} ({discriminant}): {source}")]
    BlockFieldValidation {
        discriminant: BlockType,
        index: usize,
        source: Box<ValidationError>,
    },

    /// Relationship target does not exist.
    #[error("{path}: '{slug}' does not exist in collection '{collection}'")]
    DanglingReference {
        referrer: DocumentId,
        path: FieldPath,
        collection: CollectionName,
        slug: String,
    },

    /// Entry slug is not URL-safe.
    #[error("'{slug}' is not a URL-safe slug")]
    InvalidSlug { slug: String },

    /// Two documents claim the same identity.
    #[error("'{slug}' is defined by more than one document")]
    DuplicateSlug { slug: String },
}

impl ValidationError {
    /// Field path of the failure, when it has one.
    ///
    /// Block field failures report the path inside the block value.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Self::RequiredFieldMissing { path }
            | Self::LengthOutOfBounds { path, .. }
            | Self::InvalidDate { path, .. }
            | Self::InvalidUrl { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::MissingAsset { path, .. }
            | Self::MinArrayLengthViolation { path, .. }
            | Self::DanglingReference { path, .. } => Some(path),
            Self::BlockFieldValidation { source, .. } => source.path(),
            Self::UnknownBlockType { .. } | Self::InvalidSlug { .. } | Self::DuplicateSlug { .. } => {
                None
            }
        }
    }

    /// Block position, for errors raised inside a page builder.
    pub fn block_index(&self) -> Option<usize> {
        match self {
            Self::UnknownBlockType { index, .. } | Self::BlockFieldValidation { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}
