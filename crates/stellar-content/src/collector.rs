//! Document collection.
//!
//! Walks the data directory and decodes every collection entry and page
//! document. A file that cannot be read or decoded is recorded as a failure
//! and never stops the others from loading.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rayon::prelude::*;
use stellar_core::{CoreError, DocumentFormat, frontmatter::parse_document};
use stellar_schema::{CollectionName, Document, DocumentId, PageName};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Frontmatter or data decoding error.
    #[error(transparent)]
    Decode(#[from] CoreError),

    /// File name does not map to a document.
    #[error("invalid content path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// A document that could not be loaded.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: CollectorError,
}

/// Everything found under the data directory.
#[derive(Debug, Default)]
pub struct CollectedContent {
    /// Decoded documents, collections first, in path order.
    pub documents: Vec<Document>,

    /// Files that failed to load.
    pub failures: Vec<LoadFailure>,
}

/// Collector that maps the data directory onto document identities.
#[derive(Debug, Clone)]
pub struct ContentCollector {
    data_dir: PathBuf,
}

impl ContentCollector {
    /// Create a collector rooted at `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Collect every document.
    ///
    /// Only a failure to traverse the data directory itself is an error.
    pub fn collect(&self) -> Result<CollectedContent> {
        info!(dir = %self.data_dir.display(), "Collecting content");

        let mut files = Vec::new();
        for collection in CollectionName::ALL {
            self.find_entries(collection, &mut files)?;
        }
        for page in PageName::ALL {
            if let Some(path) = self.find_page(page) {
                files.push((DocumentId::page(page), path));
            }
        }
        debug!(count = files.len(), "Found content files");

        let loaded: Vec<_> = files
            .into_par_iter()
            .map(|(id, path)| match load_document(id, &path) {
                Ok(doc) => Ok(doc),
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "Failed to load document");
                    Err(LoadFailure { path, error })
                }
            })
            .collect();

        let mut content = CollectedContent::default();
        for result in loaded {
            match result {
                Ok(doc) => content.documents.push(doc),
                Err(failure) => content.failures.push(failure),
            }
        }

        info!(
            documents = content.documents.len(),
            failures = content.failures.len(),
            "Content collection complete"
        );

        Ok(content)
    }

    /// Entries of a collection: `<slug>.<ext>` or `<slug>/index.<ext>`.
    fn find_entries(&self, collection: CollectionName, files: &mut Vec<(DocumentId, PathBuf)>) -> Result<()> {
        let dir = self.data_dir.join(collection.as_str());
        if !dir.is_dir() {
            debug!(%collection, dir = %dir.display(), "Collection directory missing");
            return Ok(());
        }

        let walker = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_ignored(e));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || DocumentFormat::from_path(entry.path()).is_none() {
                continue;
            }

            let slug = match entry.depth() {
                1 => file_stem(entry.path()),
                _ if file_stem(entry.path()).as_deref() == Some("index") => entry
                    .path()
                    .parent()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned()),
                // Other files inside an entry directory belong to that entry.
                _ => continue,
            };

            let Some(slug) = slug else {
                return Err(CollectorError::InvalidPath(entry.into_path()));
            };
            files.push((DocumentId::entry(collection, slug), entry.into_path()));
        }

        Ok(())
    }

    /// The first `index.<ext>` present in the page's directory.
    fn find_page(&self, page: PageName) -> Option<PathBuf> {
        let dir = self.data_dir.join(page.directory());
        DOCUMENT_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("index.{ext}")))
            .find(|path| path.is_file())
    }
}

/// Extensions tried for page documents, in priority order.
pub const DOCUMENT_EXTENSIONS: [&str; 5] = ["mdx", "md", "mdoc", "yaml", "yml"];

fn is_ignored(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('_') || name.starts_with('.'))
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

/// Read and decode one document.
pub fn load_document(id: DocumentId, path: &Path) -> Result<Document> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| CollectorError::InvalidPath(path.to_path_buf()))?;
    let content = fs::read_to_string(path)?;
    let raw = parse_document(&content, format, path)?;
    Ok(Document::new(id, path, raw))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("write");
    }

    #[test]
    fn test_collects_both_entry_layouts() {
        let dir = TempDir::new().expect("tempdir");
        write(dir.path(), "blog/first/index.mdx", "---\ntitle: First\n---\nBody");
        write(dir.path(), "blog/second.md", "---\ntitle: Second\n---\n");
        write(dir.path(), "blog/first/hero.jpg", "jpg");
        write(dir.path(), "testimonials/jane/index.yaml", "name: Jane\n");

        let content = ContentCollector::new(dir.path()).collect().expect("collect");
        let ids: Vec<_> = content.documents.iter().map(|d| d.id.to_string()).collect();
        assert_eq!(ids, ["blog/first", "blog/second", "testimonials/jane"]);
        assert_eq!(content.documents[0].body.as_deref(), Some("Body"));
        assert!(content.documents[2].body.is_none());
    }

    #[test]
    fn test_skips_underscore_and_hidden() {
        let dir = TempDir::new().expect("tempdir");
        write(dir.path(), "blog/_template/index.md", "---\ntitle: T\n---\n");
        write(dir.path(), "blog/_draft.md", "---\ntitle: D\n---\n");
        write(dir.path(), "blog/.hidden.md", "---\ntitle: H\n---\n");

        let content = ContentCollector::new(dir.path()).collect().expect("collect");
        assert!(content.documents.is_empty());
    }

    #[test]
    fn test_pages_found_by_directory() {
        let dir = TempDir::new().expect("tempdir");
        write(dir.path(), "otherPages/privacy-policy/index.md", "---\ntitle: Privacy\n---\n");
        write(dir.path(), "otherPages/home/index.yaml", "title: Home\n");

        let content = ContentCollector::new(dir.path()).collect().expect("collect");
        let ids: Vec<_> = content.documents.iter().map(|d| d.id.clone()).collect();
        assert_eq!(
            ids,
            [DocumentId::page(PageName::Home), DocumentId::page(PageName::PrivacyPolicy)]
        );
    }

    #[test]
    fn test_decode_failure_is_isolated() {
        let dir = TempDir::new().expect("tempdir");
        write(dir.path(), "services/good/index.md", "---\ntitle: Good\n---\n");
        write(dir.path(), "services/bad/index.md", "---\ntitle: [unclosed\n---\n");

        let content = ContentCollector::new(dir.path()).collect().expect("collect");
        assert_eq!(content.documents.len(), 1);
        assert_eq!(content.failures.len(), 1);
        assert!(content.failures[0].path.ends_with("services/bad/index.md"));
        assert!(matches!(content.failures[0].error, CollectorError::Decode(_)));
    }

    #[test]
    fn test_missing_data_dir_is_empty() {
        let dir = TempDir::new().expect("tempdir");
        let content = ContentCollector::new(dir.path().join("nope")).collect().expect("collect");
        assert!(content.documents.is_empty());
    }
}
