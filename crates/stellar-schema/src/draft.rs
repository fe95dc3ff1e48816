//! Draft filtering.
//!
//! The filter is the same for every collection and page: an entry is
//! published unless its `draft` flag is `true`.

use tracing::debug;

use crate::{document::Entry, resolve::ContentIndex};

/// Whether an entry belongs in the published set.
pub fn is_published(entry: &Entry) -> bool {
    !entry.is_draft()
}

/// The published subset of `entries`, in input order.
pub fn published<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> impl Iterator<Item = &'a Entry> {
    entries.into_iter().filter(|entry| is_published(entry))
}

impl ContentIndex {
    /// A copy of the index without drafts.
    pub fn published(&self) -> ContentIndex {
        let published = self.filter(is_published);
        debug!(
            total = self.len(),
            published = published.len(),
            "Filtered drafts"
        );
        published
    }
}
