//! Build orchestration.
//!
//! Collects documents, validates the site, resolves relationships and
//! applies the draft filter.

use std::time::Instant;

use stellar_core::{Config, CoreError};
use stellar_schema::{ContentIndex, SiteReport, validate_site};
use thiserror::Error;
use tracing::info;

use crate::{
    assets::FsAssets,
    collector::{CollectorError, ContentCollector, LoadFailure},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Documents decoded from disk.
    pub documents: usize,

    /// Entries and pages that passed validation.
    pub valid: usize,

    /// Valid entries and pages left after the draft filter.
    pub published: usize,

    /// Individual validation errors, drafts included.
    pub errors: usize,

    /// Files that could not be loaded.
    pub failures: usize,

    pub warnings: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Everything a content build produced.
#[derive(Debug)]
pub struct ContentBuild {
    pub report: SiteReport,
    pub failures: Vec<LoadFailure>,
    /// The set to render.
    pub published: ContentIndex,
    pub stats: BuildStats,
}

impl ContentBuild {
    /// Whether the site can be published.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty() && self.report.is_ok()
    }
}

/// Loads and validates a site's content.
#[derive(Debug)]
pub struct ContentBuilder {
    config: Config,
    include_drafts: bool,
}

impl ContentBuilder {
    /// Create a builder; drafts follow `build.drafts`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let include_drafts = config.build.drafts;
        Self { config, include_drafts }
    }

    /// Override whether drafts are published.
    #[must_use]
    pub fn with_drafts(mut self, include: bool) -> Self {
        self.include_drafts = include;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute collection, validation, resolution and draft filtering.
    pub fn build(&self) -> Result<ContentBuild> {
        let start = Instant::now();
        let data_dir = self.config.data_dir();

        info!(
            data = %data_dir.display(),
            drafts = self.include_drafts,
            "Starting content build"
        );

        let collected = ContentCollector::new(&data_dir).collect()?;
        let assets = FsAssets::new(self.config.public_dir());
        let report = validate_site(&collected.documents, &assets);

        let published = if self.include_drafts {
            report.index.clone()
        } else {
            report.index.published()
        };

        let stats = BuildStats {
            documents: collected.documents.len(),
            valid: report.index.len(),
            published: published.len(),
            errors: report.diagnostics.error_count(),
            failures: collected.failures.len(),
            warnings: report.diagnostics.warnings.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            documents = stats.documents,
            published = stats.published,
            errors = stats.errors,
            duration_ms = stats.duration_ms,
            "Content build complete"
        );

        Ok(ContentBuild {
            report,
            failures: collected.failures,
            published,
            stats,
        })
    }
}
