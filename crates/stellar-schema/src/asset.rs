//! Asset lookup for image fields.
//!
//! Validation only checks that an image reference resolves to an existing
//! asset; reading or processing the asset is someone else's job.

use std::{
    collections::HashSet,
    path::{Component, Path, PathBuf},
};

/// Answers whether an image reference points at an existing asset.
pub trait AssetSource: Send + Sync {
    /// Whether `reference`, written in a document stored in `document_dir`,
    /// resolves to an existing asset.
    fn exists(&self, document_dir: &Path, reference: &str) -> bool;
}

/// Resolve an image reference to a normalized asset path.
///
/// References starting with `/` resolve under `public_dir`; everything else is
/// relative to the referring document. Remote URLs are not assets and yield
/// `None`.
pub fn resolve_asset_path(public_dir: &Path, document_dir: &Path, reference: &str) -> Option<PathBuf> {
    if reference.is_empty() || reference.contains("://") {
        return None;
    }

    let joined = match reference.strip_prefix('/') {
        Some(rest) => public_dir.join(rest),
        None => document_dir.join(reference),
    };

    Some(normalize(&joined))
}

/// Lexically normalize a path, folding `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// An in-memory asset set, for previews and tests.
#[derive(Debug, Clone, Default)]
pub struct KnownAssets {
    public_dir: PathBuf,
    assets: HashSet<PathBuf>,
}

impl KnownAssets {
    /// Create an empty set whose absolute references resolve under `public_dir`.
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
            assets: HashSet::new(),
        }
    }

    /// Register an asset path.
    #[must_use]
    pub fn with(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path);
        self
    }

    /// Register an asset path.
    pub fn insert(&mut self, path: impl AsRef<Path>) {
        self.assets.insert(normalize(path.as_ref()));
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether no assets are registered.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetSource for KnownAssets {
    fn exists(&self, document_dir: &Path, reference: &str) -> bool {
        resolve_asset_path(&self.public_dir, document_dir, reference)
            .is_some_and(|path| self.assets.contains(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(Path::new("src/data/blog/post/../../assets/x.png")),
            PathBuf::from("src/data/assets/x.png")
        );
        assert_eq!(normalize(Path::new("./a/./b")), PathBuf::from("a/b"));
        assert_eq!(normalize(Path::new("../up")), PathBuf::from("../up"));
    }

    #[test]
    fn test_resolve_relative_and_public() {
        let public = Path::new("public");
        let doc = Path::new("src/data/blog/hello");

        assert_eq!(
            resolve_asset_path(public, doc, "../hello/hero.jpg"),
            Some(PathBuf::from("src/data/blog/hello/hero.jpg"))
        );
        assert_eq!(
            resolve_asset_path(public, doc, "/images/logo.png"),
            Some(PathBuf::from("public/images/logo.png"))
        );
        assert_eq!(resolve_asset_path(public, doc, "https://cdn.example.com/a.png"), None);
        assert_eq!(resolve_asset_path(public, doc, ""), None);
    }

    #[test]
    fn test_known_assets() {
        let assets = KnownAssets::new("public")
            .with("src/data/authors/jane/avatar.jpg")
            .with("public/images/og.png");

        assert_eq!(assets.len(), 2);
        assert!(assets.exists(Path::new("src/data/authors/jane"), "./avatar.jpg"));
        assert!(assets.exists(Path::new("src/data/authors/jane"), "../jane/avatar.jpg"));
        assert!(assets.exists(Path::new("anywhere"), "/images/og.png"));
        assert!(!assets.exists(Path::new("src/data/authors/john"), "./avatar.jpg"));
    }
}
