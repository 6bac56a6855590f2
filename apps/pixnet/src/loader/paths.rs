//! Candidate locations inside a data root.
//!
//! A data root stores its artifacts either directly (`<root>/layouts/...`) or
//! one level down (`<root>/data/layouts/...`). Every lookup tries both, in
//! that order.

use glob::Pattern;
use std::path::{Path, PathBuf};

/// A data directory and its fallback subdirectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRoot {
    root: PathBuf,
}

impl DataRoot {
    /// Wrap a data directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory itself.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// `<root>/<rel>` and `<root>/data/<rel>`, in lookup order.
    #[must_use]
    pub fn locations(&self, rel: &[&str]) -> [PathBuf; 2] {
        let direct = rel.iter().fold(self.root.clone(), |p, part| p.join(part));
        let nested = rel
            .iter()
            .fold(self.root.join("data"), |p, part| p.join(part));
        [direct, nested]
    }

    /// First existing file among [`Self::locations`].
    #[must_use]
    pub fn find_file(&self, rel: &[&str]) -> Option<PathBuf> {
        self.locations(rel).into_iter().find(|p| p.is_file())
    }

    /// First existing directory among [`Self::locations`].
    #[must_use]
    pub fn find_dir(&self, rel: &[&str]) -> Option<PathBuf> {
        self.locations(rel).into_iter().find(|p| p.is_dir())
    }
}

/// Files in `dir` whose names match the glob `pattern`, sorted by name.
///
/// `dir` is escaped, so only `pattern` carries wildcards. A missing
/// directory or an invalid pattern yields no matches.
#[must_use]
pub fn glob_files(dir: &Path, pattern: &str) -> Vec<PathBuf> {
    let full = Path::new(&Pattern::escape(&dir.to_string_lossy())).join(pattern);
    let paths = match glob::glob(&full.to_string_lossy()) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::debug!("Invalid glob pattern {}: {}", full.display(), e);
            return Vec::new();
        }
    };

    let mut matches: Vec<PathBuf> = paths
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    matches.sort();
    matches
}
