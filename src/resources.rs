//! Static resource lookup.
//!
//! Request targets are resolved against a root directory by plain
//! concatenation. There is no normalization and no traversal guard.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;

use crate::config::ResourceConfig;

/// Outcome of resolving a request target.
#[derive(Debug)]
pub enum Resolution {
    Found(Vec<u8>),
    /// The target could not be read. `fallback` holds the not-found page, or
    /// is empty when that page is unreadable too.
    NotFound { fallback: Vec<u8>, source: io::Error },
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    /// The bytes to serve, whichever variant this is.
    pub fn into_body(self) -> Vec<u8> {
        match self {
            Resolution::Found(body) => body,
            Resolution::NotFound { fallback, .. } => fallback,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
    not_found: String,
    index: String,
}

impl Resolver {
    pub fn new(root: impl Into<PathBuf>, not_found: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            not_found: not_found.into(),
            index: index.into(),
        }
    }

    pub fn from_config(cfg: &ResourceConfig) -> Self {
        Self::new(cfg.root.clone(), cfg.not_found.clone(), cfg.index.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path a target maps to.
    ///
    /// `/a/b.html` becomes `<root>/a/b.html`; a target ending in `/` maps to
    /// the index file inside that directory.
    pub fn path_for(&self, target: &str) -> PathBuf {
        let relative = target.trim_start_matches('/');
        let mut path = self.root.join(relative);
        if target.ends_with('/') {
            path.push(&self.index);
        }
        path
    }

    /// Reads the whole resource for `target`, falling back to the not-found
    /// page.
    pub async fn resolve(&self, target: &str) -> Resolution {
        match tokio::fs::read(self.path_for(target)).await {
            Ok(body) => Resolution::Found(body),
            Err(source) => {
                let fallback = tokio::fs::read(self.root.join(&self.not_found))
                    .await
                    .unwrap_or_else(|e| {
                        tracing::warn!(error = %e, page = %self.not_found, "not-found page unreadable");
                        Vec::new()
                    });
                Resolution::NotFound { fallback, source }
            }
        }
    }

    /// Opens the resource for `target` for streaming.
    pub async fn open(&self, target: &str) -> io::Result<File> {
        File::open(self.path_for(target)).await
    }
}
