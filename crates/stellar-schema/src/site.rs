//! Whole-site validation.
//!
//! Documents are validated independently and in parallel. Resolution starts
//! only once every document is done, then all failures are reported
//! together, grouped by document.

use std::{
    collections::HashMap,
    fmt,
    path::PathBuf,
    time::Instant,
};

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    asset::AssetSource,
    document::{Document, DocumentId, Entry},
    error::ValidationError,
    page::PageName,
    path::FieldPath,
    resolve::{ContentIndex, resolve_references},
    schema::DocumentOutcome,
};

/// A problem that does not fail the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A published entry links to a draft.
    DraftReference {
        referrer: DocumentId,
        path: FieldPath,
        target: DocumentId,
    },
    /// A page has no document.
    MissingPage(PageName),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DraftReference { referrer, path, target } => {
                write!(f, "{referrer}: {path} points at draft '{target}'")
            }
            Self::MissingPage(page) => write!(f, "page '{page}' has no document"),
        }
    }
}

/// All failures of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentErrors {
    pub id: DocumentId,
    pub path: PathBuf,
    /// Errors of drafts are reported but never fail the build.
    pub draft: bool,
    pub errors: Vec<ValidationError>,
}

/// Every failure and warning found in a site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Failures grouped by document, in the order first reported.
    pub errors: IndexMap<DocumentId, DocumentErrors>,
    pub warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Errors that must fail the build.
    pub fn blocking(&self) -> impl Iterator<Item = &DocumentErrors> {
        self.errors.values().filter(|e| !e.draft)
    }

    pub fn has_blocking_errors(&self) -> bool {
        self.blocking().next().is_some()
    }

    /// Total number of individual errors, drafts included.
    pub fn error_count(&self) -> usize {
        self.errors.values().map(|e| e.errors.len()).sum()
    }

    /// Errors of one document.
    pub fn for_document(&self, id: &DocumentId) -> Option<&DocumentErrors> {
        self.errors.get(id)
    }

    /// Add an error to its document's group. The first push fixes the
    /// group's path and draft flag.
    fn push(&mut self, id: DocumentId, path: PathBuf, draft: bool, error: ValidationError) {
        self.errors
            .entry(id.clone())
            .or_insert_with(|| DocumentErrors {
                id,
                path,
                draft,
                errors: Vec::new(),
            })
            .errors
            .push(error);
    }
}

/// The validated site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteReport {
    /// Every valid entry and page, drafts included, plus the partial
    /// entries of invalid documents.
    pub index: ContentIndex,
    pub diagnostics: Diagnostics,
}

impl SiteReport {
    /// Whether the site can be published.
    pub fn is_ok(&self) -> bool {
        !self.diagnostics.has_blocking_errors()
    }
}

/// Validate every document, then resolve relationships across the site.
pub fn validate_site(documents: &[Document], assets: &dyn AssetSource) -> SiteReport {
    let start = Instant::now();
    info!(documents = documents.len(), "Validating content");

    let mut report = SiteReport::default();

    // The first document with an id wins; later ones are duplicates.
    let mut seen: HashMap<&DocumentId, &Document> = HashMap::with_capacity(documents.len());
    let mut unique = Vec::with_capacity(documents.len());
    for doc in documents {
        if let Some(first) = seen.get(&doc.id) {
            warn!(id = %doc.id, first = %first.path.display(), duplicate = %doc.path.display(), "Duplicate document");
            report.diagnostics.push(
                doc.id.clone(),
                doc.path.clone(),
                doc.is_marked_draft(),
                ValidationError::DuplicateSlug {
                    slug: doc.id.to_string(),
                },
            );
        } else {
            seen.insert(&doc.id, doc);
            unique.push(doc);
        }
    }

    let results: Vec<(&Document, DocumentOutcome)> = unique
        .par_iter()
        .map(|doc| {
            debug!(id = %doc.id, path = %doc.path.display(), "Validating document");
            (*doc, doc.id.schema().validate_document(doc, assets))
        })
        .collect();

    for (doc, DocumentOutcome { entry, errors }) in results {
        if errors.is_empty() {
            report.index.insert(entry);
            continue;
        }

        let draft = doc.is_marked_draft();
        warn!(id = %doc.id, errors = errors.len(), draft, "Document failed validation");
        report.index.mark_invalid(entry);
        for error in errors {
            report.diagnostics.push(doc.id.clone(), doc.path.clone(), draft, error);
        }
    }

    for page in PageName::ALL {
        let id = DocumentId::page(page);
        if report.index.page(page).is_none() && !report.index.is_invalid(&id) {
            warn!(%page, "Page has no document");
            report.diagnostics.warnings.push(Warning::MissingPage(page));
        }
    }

    // References of invalid documents are checked too; their errors join
    // the document's existing group.
    let resolution = resolve_references(&report.index);
    for error in resolution.errors {
        if let ValidationError::DanglingReference { referrer, .. } = &error
            && let Some(entry) = referrer_entry(&report.index, referrer)
        {
            let (id, path, draft) = (entry.id.clone(), entry.path.clone(), entry.is_draft());
            report.diagnostics.push(id, path, draft, error);
        }
    }
    report.diagnostics.warnings.extend(resolution.warnings);

    info!(
        entries = report.index.len(),
        errors = report.diagnostics.error_count(),
        warnings = report.diagnostics.warnings.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Content validated"
    );

    report
}

fn referrer_entry<'a>(index: &'a ContentIndex, id: &DocumentId) -> Option<&'a Entry> {
    let valid = match id {
        DocumentId::Entry { collection, slug } => index.resolve(*collection, slug).ok(),
        DocumentId::Page(page) => index.page(*page),
    };
    valid.or_else(|| index.partial(id))
}
