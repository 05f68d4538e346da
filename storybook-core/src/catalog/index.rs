use std::path::{Path, PathBuf};
use rustc_hash::FxHashSet;
use walkdir::WalkDir;

use crate::catalog::Catalog;

/// Files present under the assets root, keyed by their catalog URL (`/images/a.png`).
pub struct AssetIndex {
    root: PathBuf,
    urls: FxHashSet<String>,
}

impl AssetIndex {
    pub fn scan(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        log::info!("Scanning assets in {:?}...", root);

        let mut urls = FxHashSet::default();
        for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Ok(rel) = path.strip_prefix(&root) {
                let parts: Vec<_> = rel.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                urls.insert(format!("/{}", parts.join("/")));
            }
        }

        log::info!("Asset scan complete. Files: {}", urls.len());
        Self { root, urls }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        let url = url.trim();
        if url.starts_with('/') {
            self.urls.contains(url)
        } else {
            self.urls.contains(&format!("/{}", url))
        }
    }

    /// Catalog URLs with no file behind them, in slide order.
    pub fn missing(&self, catalog: &Catalog) -> Vec<String> {
        let mut out = Vec::new();
        for index in 0..catalog.len() {
            for url in catalog.asset_urls(index) {
                if !self.contains(&url) && !out.contains(&url) {
                    out.push(url);
                }
            }
        }
        out
    }
}
