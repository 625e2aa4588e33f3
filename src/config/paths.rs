//! `[paths]` section configuration.
//!
//! Directory layout of a help root. Relative paths are resolved against the
//! root directory (`--root`, default `./`) when the config is loaded.
//!
//! ```text
//! <root>/
//! ├── kbase.toml
//! ├── pages/<name>/page.md     topics
//! ├── pages/<name>/<asset>     per-topic files
//! ├── assets/css/...           site-wide files
//! └── views/*.html             template overrides
//! ```

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `[paths]` section in kbase.toml.
///
/// # Example
/// ```toml
/// [paths]
/// pages = "topics"
/// assets = "static"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    /// Root directory, set from the CLI.
    #[serde(skip)]
    #[educe(Default = defaults::paths::root())]
    pub root: Option<PathBuf>,

    /// Topic folders.
    #[serde(default = "defaults::paths::pages")]
    #[educe(Default = defaults::paths::pages())]
    pub pages: PathBuf,

    /// Site-wide static files.
    #[serde(default = "defaults::paths::assets")]
    #[educe(Default = defaults::paths::assets())]
    pub assets: PathBuf,

    /// Template overrides (`index.html`, `topic.html`).
    #[serde(default = "defaults::paths::views")]
    #[educe(Default = defaults::paths::views())]
    pub views: PathBuf,
}

impl PathsSection {
    /// Resolve every directory against `root`.
    pub fn resolve(&mut self, root: &Path) {
        let root = normalize_path(root);
        self.pages = normalize_path(&root.join(&self.pages));
        self.assets = normalize_path(&root.join(&self.assets));
        self.views = normalize_path(&root.join(&self.views));
        self.root = Some(root);
    }
}

/// Normalize a path to absolute, using canonicalize if the path exists
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        // For non-existent paths, manually make them absolute
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}
