//! Cross-collection relationship resolution.
//!
//! Runs strictly after every document has been validated: the index must
//! hold the complete set of entries before a reference can be called
//! dangling.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::{
    collection::{CollectionKind, CollectionName, Ref},
    document::{DocumentId, Entry},
    error::ValidationError,
    page::PageName,
    site::Warning,
};

/// A reference whose target is not in the index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{slug}' does not exist in collection '{collection}'")]
pub struct DanglingReference {
    pub collection: CollectionName,
    pub slug: String,
}

/// Every valid entry and page, keyed for lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentIndex {
    entries: BTreeMap<CollectionName, BTreeMap<String, Entry>>,
    pages: BTreeMap<PageName, Entry>,
    /// Partial entries of documents that failed validation.
    invalid: BTreeMap<DocumentId, Entry>,
}

impl ContentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a valid entry, returning any entry it replaces.
    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        match &entry.id {
            DocumentId::Entry { collection, slug } => self
                .entries
                .entry(*collection)
                .or_default()
                .insert(slug.clone(), entry),
            DocumentId::Page(page) => self.pages.insert(*page, entry),
        }
    }

    /// Record a document that failed validation, keeping whatever of it
    /// did validate.
    pub fn mark_invalid(&mut self, partial: Entry) {
        self.invalid.insert(partial.id.clone(), partial);
    }

    /// Whether `id` exists but failed validation.
    pub fn is_invalid(&self, id: &DocumentId) -> bool {
        self.invalid.contains_key(id)
    }

    /// The surviving fields of a document that failed validation.
    pub fn partial(&self, id: &DocumentId) -> Option<&Entry> {
        self.invalid.get(id)
    }

    /// Partial entries of every invalid document, in id order.
    pub fn partials(&self) -> impl Iterator<Item = &Entry> {
        self.invalid.values()
    }

    /// Look up an entry by collection and slug.
    pub fn resolve(&self, collection: CollectionName, slug: &str) -> Result<&Entry, DanglingReference> {
        self.entries
            .get(&collection)
            .and_then(|entries| entries.get(slug))
            .ok_or_else(|| DanglingReference {
                collection,
                slug: slug.to_string(),
            })
    }

    /// Resolve a typed reference.
    pub fn get<C: CollectionKind>(&self, reference: &Ref<C>) -> Result<&Entry, DanglingReference> {
        self.resolve(C::NAME, reference.slug())
    }

    /// Entries of one collection, in slug order.
    pub fn entries(&self, collection: CollectionName) -> impl Iterator<Item = &Entry> {
        self.entries.get(&collection).into_iter().flat_map(|entries| entries.values())
    }

    pub fn page(&self, page: PageName) -> Option<&Entry> {
        self.pages.get(&page)
    }

    pub fn pages(&self) -> impl Iterator<Item = &Entry> {
        self.pages.values()
    }

    /// All entries, collection by collection, then all pages.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values().flat_map(|entries| entries.values()).chain(self.pages.values())
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum::<usize>() + self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep only the entries `keep` accepts. Partial entries are unchanged.
    pub fn filter(&self, mut keep: impl FnMut(&Entry) -> bool) -> Self {
        let mut filtered = Self {
            invalid: self.invalid.clone(),
            ..Self::default()
        };
        for entry in self.iter().filter(|&e| keep(e)) {
            filtered.insert(entry.clone());
        }
        filtered
    }
}

/// Outcome of the resolution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Dangling references, one per broken field.
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<Warning>,
}

/// Check every relationship in the index, partial entries included.
///
/// A reference to a document that exists but is itself invalid is not
/// reported; that document already carries its own errors. A published
/// entry that points at a draft is a warning, since the link disappears
/// from the published site.
pub fn resolve_references(index: &ContentIndex) -> Resolution {
    let mut resolution = Resolution::default();

    for entry in index.iter().chain(index.partials()) {
        for (path, reference) in entry.references() {
            match index.resolve(reference.collection, &reference.slug) {
                Ok(target) => {
                    if target.is_draft() && !entry.is_draft() {
                        resolution.warnings.push(Warning::DraftReference {
                            referrer: entry.id.clone(),
                            path,
                            target: target.id.clone(),
                        });
                    }
                }
                Err(_) if index.is_invalid(&DocumentId::entry(reference.collection, &reference.slug)) => {
                    debug!(referrer = %entry.id, %path, "Reference to invalid document skipped");
                }
                Err(DanglingReference { collection, slug }) => {
                    resolution.errors.push(ValidationError::DanglingReference {
                        referrer: entry.id.clone(),
                        path,
                        collection,
                        slug,
                    });
                }
            }
        }
    }

    resolution
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{
        collection::Authors,
        value::{Fields, Reference, Value},
    };

    fn author(slug: &str, draft: bool) -> Entry {
        let mut fields = Fields::new();
        fields.insert("name".into(), Value::Text(slug.to_uppercase()));
        if draft {
            fields.insert("draft".into(), Value::Bool(true));
        }
        Entry {
            id: DocumentId::entry(CollectionName::Authors, slug),
            path: PathBuf::new(),
            fields,
            body: None,
        }
    }

    fn post(slug: &str, authors: &[&str]) -> Entry {
        let mut fields = Fields::new();
        fields.insert(
            "authors".into(),
            Value::Array(
                authors
                    .iter()
                    .map(|a| {
                        Value::Reference(Reference {
                            collection: CollectionName::Authors,
                            slug: a.to_string(),
                        })
                    })
                    .collect(),
            ),
        );
        Entry {
            id: DocumentId::entry(CollectionName::Blog, slug),
            path: PathBuf::new(),
            fields,
            body: None,
        }
    }

    #[test]
    fn test_resolve_returns_exact_entry() {
        let mut index = ContentIndex::new();
        index.insert(author("jane", false));
        index.insert(author("john", false));

        let found = index.resolve(CollectionName::Authors, "john").expect("exists");
        assert_eq!(found.text("name"), Some("JOHN"));

        let typed = index.get(&Ref::<Authors>::new("jane")).expect("exists");
        assert_eq!(typed.id, DocumentId::entry(CollectionName::Authors, "jane"));

        assert_eq!(
            index.resolve(CollectionName::Authors, "ghost"),
            Err(DanglingReference {
                collection: CollectionName::Authors,
                slug: "ghost".into()
            })
        );
        // Same slug, wrong collection.
        assert!(index.resolve(CollectionName::Blog, "jane").is_err());
    }

    #[test]
    fn test_dangling_reported_with_referrer_and_path() {
        let mut index = ContentIndex::new();
        index.insert(author("jane", false));
        index.insert(post("hello", &["jane", "ghost"]));

        let resolution = resolve_references(&index);
        assert_eq!(
            resolution.errors,
            vec![ValidationError::DanglingReference {
                referrer: DocumentId::entry(CollectionName::Blog, "hello"),
                path: crate::path::FieldPath::root().field("authors").index(1),
                collection: CollectionName::Authors,
                slug: "ghost".into(),
            }]
        );
    }

    #[test]
    fn test_invalid_target_not_reported_as_dangling() {
        let mut index = ContentIndex::new();
        index.mark_invalid(author("broken", false));
        index.insert(post("hello", &["broken"]));

        assert!(resolve_references(&index).errors.is_empty());
        assert!(index.is_invalid(&DocumentId::entry(CollectionName::Authors, "broken")));
        // Partial entries are not resolvable targets.
        assert!(index.resolve(CollectionName::Authors, "broken").is_err());
    }

    #[test]
    fn test_partial_referrer_still_resolved() {
        let mut index = ContentIndex::new();
        index.insert(author("jane", false));
        index.mark_invalid(post("broken", &["jane", "ghost"]));

        let resolution = resolve_references(&index);
        assert_eq!(
            resolution.errors,
            vec![ValidationError::DanglingReference {
                referrer: DocumentId::entry(CollectionName::Blog, "broken"),
                path: crate::path::FieldPath::root().field("authors").index(1),
                collection: CollectionName::Authors,
                slug: "ghost".into(),
            }]
        );
        assert_eq!(index.len(), 1);
        assert_eq!(index.partials().count(), 1);
    }

    #[test]
    fn test_draft_target_warns() {
        let mut index = ContentIndex::new();
        index.insert(author("jane", true));
        index.insert(post("hello", &["jane"]));

        let resolution = resolve_references(&index);
        assert!(resolution.errors.is_empty());
        assert!(matches!(
            &resolution.warnings[..],
            [Warning::DraftReference { target, .. }] if *target == DocumentId::entry(CollectionName::Authors, "jane")
        ));
    }

    #[test]
    fn test_iteration_and_filter() {
        let mut index = ContentIndex::new();
        index.insert(author("b", false));
        index.insert(author("a", true));
        assert_eq!(index.len(), 2);

        let slugs: Vec<_> = index
            .entries(CollectionName::Authors)
            .filter_map(|e| e.id.slug())
            .collect();
        assert_eq!(slugs, ["a", "b"]);

        let kept = index.filter(|e| !e.is_draft());
        assert_eq!(kept.len(), 1);
        assert_eq!(index.len(), 2);
        assert!(index.insert(author("b", false)).is_some());
    }
}
