//! Asset lookup on the filesystem.

use std::path::{Path, PathBuf};

use stellar_schema::{AssetSource, asset::resolve_asset_path};

/// Resolves image references against the files on disk.
#[derive(Debug, Clone)]
pub struct FsAssets {
    public_dir: PathBuf,
}

impl FsAssets {
    /// Absolute references (`/images/x.png`) resolve under `public_dir`.
    #[must_use]
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
        }
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }
}

impl AssetSource for FsAssets {
    fn exists(&self, document_dir: &Path, reference: &str) -> bool {
        resolve_asset_path(&self.public_dir, document_dir, reference).is_some_and(|path| path.is_file())
    }
}
