//! File read/write collaborator.
//!
//! The pipeline only touches the disk through [`FileSystem`], so tests can
//! swap in an in-memory implementation that records every operation.

use std::io;
use std::path::{Path, PathBuf};

pub trait FileSystem {
    /// Read a UTF-8 text file.
    fn read_text(&self, path: &Path) -> io::Result<String>;

    /// Write a text file, creating parent directories as needed.
    fn write_text(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// [`FileSystem`] over `std::fs`, resolving relative paths against a root.
#[derive(Debug, Clone)]
pub struct NativeFs {
    root: PathBuf,
}

impl NativeFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl FileSystem for NativeFs {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(self.resolve(path))
    }

    fn write_text(&self, path: &Path, contents: &str) -> io::Result<()> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(target, contents)
    }
}
