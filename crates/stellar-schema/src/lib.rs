//! Stellar Schema
//!
//! The content model of a Stellar site: field primitives, the page-builder
//! block catalog, collection and page schemas, and the validation pipeline
//! that turns raw documents into a resolved, publishable index.
//!
//! Schemas are declared once. The same [`Field`] definitions drive load-time
//! validation and serialize into the [`AuthoringSchema`] consumed by the
//! editing UI.

pub mod asset;
pub mod block;
pub mod collection;
pub mod document;
pub mod draft;
pub mod error;
pub mod field;
pub mod page;
pub mod path;
pub mod resolve;
pub mod schema;
pub mod site;
pub mod slug;
pub mod value;

pub use asset::{AssetSource, KnownAssets};
pub use block::{Block, BlockCatalog, BlockType, BuilderOutcome, EmptyBlock, ValidatedBlock, validate_blocks};
pub use collection::{Authors, Blog, CollectionKind, CollectionName, Ref, Services, Testimonials};
pub use document::{Document, DocumentId, Entry};
pub use error::{Result, ValidationError};
pub use field::{Field, FieldContext, FieldKind};
pub use page::PageName;
pub use path::FieldPath;
pub use resolve::{ContentIndex, DanglingReference, resolve_references};
pub use schema::{AuthoringSchema, DocumentOutcome, EntrySchema};
pub use site::{Diagnostics, DocumentErrors, SiteReport, Warning, validate_site};
pub use slug::{Slug, slugify};
pub use value::{Fields, Reference, Value};
