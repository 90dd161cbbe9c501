//! Source pattern expansion.
//!
//! Turns the ordered `src` patterns of a file set into an ordered list of
//! existing files. Ordering matters downstream: expansion order is compile
//! order is concatenation order.
//!
//! ## Pattern Rules
//!
//! - Patterns are expanded left to right; matches of one pattern come back in
//!   the sorted order `glob` produces.
//! - Only regular files are kept; directories matched by a pattern are skipped.
//! - A file matched by several patterns appears once, at its first position.
//! - A pattern starting with `!` removes every earlier match it matches.
//! - Literal paths that don't exist simply expand to nothing.

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("Invalid source pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("Unable to read glob match: {0}")]
    Walk(#[from] glob::GlobError),
}

/// Expands source patterns into concrete, existing file paths.
pub trait SourceExpander {
    fn expand(&self, patterns: &[String]) -> Result<Vec<PathBuf>, ExpandError>;
}

/// Filesystem expander backed by the `glob` crate.
///
/// Relative patterns are resolved against `root` and come back relative to
/// it, so they read the same way the patterns were written. Absolute
/// patterns are used as-is and come back absolute.
#[derive(Debug, Clone)]
pub struct GlobExpander {
    root: PathBuf,
}

impl GlobExpander {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn rooted_pattern(&self, pattern: &str) -> String {
        if self.root.as_os_str().is_empty() || Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            let root = Pattern::escape(&self.root.to_string_lossy());
            format!("{}/{}", root.trim_end_matches('/'), pattern)
        }
    }
}

fn compile_pattern(pattern: &str) -> Result<Pattern, ExpandError> {
    Pattern::new(pattern).map_err(|source| ExpandError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl SourceExpander for GlobExpander {
    fn expand(&self, patterns: &[String]) -> Result<Vec<PathBuf>, ExpandError> {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        let mut files: Vec<PathBuf> = Vec::new();

        for pattern in patterns {
            if let Some(excluded) = pattern.strip_prefix('!') {
                let exclusion = compile_pattern(excluded)?;
                files.retain(|f| !exclusion.matches_path_with(f, options));
                continue;
            }

            // Validate against the pattern as written so errors name it.
            compile_pattern(pattern)?;
            let rooted = self.rooted_pattern(pattern);
            let matches = glob::glob_with(&rooted, options).map_err(|source| {
                ExpandError::Pattern {
                    pattern: pattern.clone(),
                    source,
                }
            })?;

            for entry in matches {
                let path = entry?;
                if !path.is_file() {
                    continue;
                }
                let relative = path
                    .strip_prefix(&self.root)
                    .map(Path::to_path_buf)
                    .unwrap_or(path);
                if !files.contains(&relative) {
                    files.push(relative);
                }
            }
        }

        Ok(files)
    }
}
