//! Filesystem asset resolver.
//!
//! Probes `<root>/<kind dir>/<id>` and `<root>/data/<kind dir>/<id>`; when
//! neither exists the first location is reported anyway so downstream tools
//! can show a placeholder.

use crate::loader::DataRoot;
use pixnet_core::{AssetKind, AssetResolver, DefaultAssetLayout};
use std::path::PathBuf;

/// [`AssetResolver`] backed by a data directory.
#[derive(Debug, Clone)]
pub struct FsAssetResolver {
    root: DataRoot,
    fallback: DefaultAssetLayout,
}

impl FsAssetResolver {
    /// Resolve assets under `root`.
    #[must_use]
    pub fn new(root: DataRoot) -> Self {
        let fallback = DefaultAssetLayout::new(root.path());
        Self { root, fallback }
    }
}

impl AssetResolver for FsAssetResolver {
    fn resolve(&self, kind: AssetKind, image_id: &str) -> Option<PathBuf> {
        self.root.find_file(&[kind.dir_name(), image_id])
    }

    fn default_path(&self, kind: AssetKind, image_id: &str) -> PathBuf {
        self.fallback.default_path(kind, image_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_existing_nested_location() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let nested = tmp.path().join("data").join("thumbs");
        std::fs::create_dir_all(&nested).expect("mkdir");
        std::fs::write(nested.join("a.jpg"), b"jpeg").expect("write");

        let resolver = FsAssetResolver::new(DataRoot::new(tmp.path()));

        assert_eq!(
            resolver.locate(AssetKind::Thumbnail, "a.jpg"),
            nested.join("a.jpg")
        );
        assert_eq!(
            resolver.locate(AssetKind::Original, "a.jpg"),
            tmp.path().join("originals").join("a.jpg")
        );
    }

    #[test]
    fn direct_location_wins_over_nested() {
        let tmp = tempfile::tempdir().expect("tempdir");
        for dir in [tmp.path().join("originals"), tmp.path().join("data").join("originals")] {
            std::fs::create_dir_all(&dir).expect("mkdir");
            std::fs::write(dir.join("b.jpg"), b"jpeg").expect("write");
        }

        let resolver = FsAssetResolver::new(DataRoot::new(tmp.path()));
        assert_eq!(
            resolver.resolve(AssetKind::Original, "b.jpg"),
            Some(tmp.path().join("originals").join("b.jpg"))
        );
    }
}
