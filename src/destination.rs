//! Destination classification and base-path resolution.
//!
//! A destination ending in a path separator names a directory and gets one
//! output per source ([`DestinationMode::Individual`]). Anything else names a
//! single file that receives every source, compiled and joined in order
//! ([`DestinationMode::Concatenated`]).

use crate::config::BasePath;
use crate::paths::normalize;
use serde::Serialize;
use std::path::{Path, PathBuf, is_separator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationMode {
    /// One output file per source.
    Individual,
    /// All sources joined into the destination file.
    Concatenated,
}

impl DestinationMode {
    pub fn label(self) -> &'static str {
        match self {
            DestinationMode::Individual => "individual",
            DestinationMode::Concatenated => "concatenated",
        }
    }
}

/// Classify a destination by its shape.
pub fn classify(destination: &str) -> DestinationMode {
    if destination.ends_with(is_separator) {
        DestinationMode::Individual
    } else {
        DestinationMode::Concatenated
    }
}

/// Base directory for reconstructing structure in individual mode.
///
/// An explicit override is returned verbatim. Otherwise this is the longest
/// common ancestor of the sources' parent directories, which does not depend
/// on source order. No shared ancestor yields the empty path.
pub fn resolve_base_path(sources: &[PathBuf], base: &BasePath) -> PathBuf {
    if let BasePath::Explicit(path) = base {
        return path.clone();
    }

    let mut parents = sources.iter().map(|source| {
        normalize(source)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });
    let Some(first) = parents.next() else {
        return PathBuf::new();
    };
    parents.fold(first, |common, dir| shared_prefix(&common, &dir))
}

fn shared_prefix(a: &Path, b: &Path) -> PathBuf {
    a.components()
        .zip(b.components())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x)
        .collect()
}
