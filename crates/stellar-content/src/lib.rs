//! Stellar Content
//!
//! Loads a site's documents from disk and runs them through the schema
//! pipeline: collection, validation, relationship resolution and draft
//! filtering.

pub mod assets;
pub mod build;
pub mod collector;
pub mod scaffold;

pub use assets::FsAssets;
pub use build::{BuildError, BuildStats, ContentBuild, ContentBuilder};
pub use collector::{CollectedContent, CollectorError, ContentCollector, LoadFailure};
pub use scaffold::{ScaffoldError, scaffold_entry};
