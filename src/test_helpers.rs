//! Shared test doubles for the style-build test suite.
//!
//! Every collaborator the pipeline drives has an in-memory stand-in here, so
//! unit tests exercise ordering and abort behavior without touching disk or a
//! real compiler.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let fs = MemoryFs::with_files(&[("a.less", ".a {}")]);
//! let expander = ScriptedExpander::literal();
//! let compiler = StubCompiler::new();
//! let reporter = RecordingReporter::new();
//! ```

use crate::compiler::{CompileError, ParseOptions, RenderOptions, StyleCompiler};
use crate::expand::{ExpandError, SourceExpander};
use crate::fs::FileSystem;
use crate::output::{Reporter, format_event};
use crate::pipeline::TaskEvent;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// =========================================================================
// File system
// =========================================================================

/// One recorded file system call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOp {
    Read(PathBuf),
    Write(PathBuf),
}

/// In-memory [`FileSystem`] that records every call.
#[derive(Default)]
pub struct MemoryFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
    denied: Mutex<BTreeSet<PathBuf>>,
    ops: Mutex<Vec<FsOp>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let fs = Self::new();
        {
            let mut map = fs.files.lock().unwrap();
            for (path, text) in files {
                map.insert(PathBuf::from(path), text.to_string());
            }
        }
        fs
    }

    /// Current contents of `path`, if present.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    /// Make writes to `path` fail with permission denied.
    pub fn deny_write(&self, path: impl AsRef<Path>) {
        self.denied.lock().unwrap().insert(path.as_ref().to_path_buf());
    }

    pub fn ops(&self) -> Vec<FsOp> {
        self.ops.lock().unwrap().clone()
    }

    /// Paths read, in call order.
    pub fn reads(&self) -> Vec<PathBuf> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                FsOp::Read(p) => Some(p),
                FsOp::Write(_) => None,
            })
            .collect()
    }

    /// Paths written, in call order. Denied writes are not included.
    pub fn writes(&self) -> Vec<PathBuf> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                FsOp::Write(p) => Some(p),
                FsOp::Read(_) => None,
            })
            .collect()
    }
}

impl FileSystem for MemoryFs {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        self.ops.lock().unwrap().push(FsOp::Read(path.to_path_buf()));
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No such file or directory"))
    }

    fn write_text(&self, path: &Path, contents: &str) -> io::Result<()> {
        if self.denied.lock().unwrap().contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"));
        }
        self.ops.lock().unwrap().push(FsOp::Write(path.to_path_buf()));
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

// =========================================================================
// Compiler
// =========================================================================

const PARSE_ERROR_MARKER: &str = "!error";
const RENDER_ERROR_MARKER: &str = "!render-error";

/// Compiler stand-in. The tree is the source text itself.
///
/// - `!render-error` anywhere fails the render phase.
/// - `!error` anywhere else fails the parse phase at the marker's position.
/// - Compressed output strips all whitespace; otherwise text passes through.
#[derive(Default)]
pub struct StubCompiler {
    formatter: bool,
    parse_calls: Mutex<Vec<ParseOptions>>,
}

impl StubCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stub that formats its own errors.
    pub fn with_formatter() -> Self {
        Self {
            formatter: true,
            ..Self::default()
        }
    }

    /// Parse options seen, in call order.
    pub fn parse_calls(&self) -> Vec<ParseOptions> {
        self.parse_calls.lock().unwrap().clone()
    }
}

/// 1-based line and column of the first `!error` that isn't `!render-error`.
fn parse_error_position(source: &str) -> Option<(usize, usize)> {
    source.lines().enumerate().find_map(|(i, line)| {
        line.match_indices(PARSE_ERROR_MARKER)
            .find(|(at, _)| !line[*at..].starts_with(RENDER_ERROR_MARKER))
            .map(|(at, _)| (i + 1, at + 1))
    })
}

impl StyleCompiler for StubCompiler {
    type Tree = String;

    fn parse(&self, source: &str, options: &ParseOptions) -> Result<String, CompileError> {
        self.parse_calls.lock().unwrap().push(options.clone());
        match parse_error_position(source) {
            Some((line, column)) => Err(CompileError::parse("unexpected token").at(line, column)),
            None => Ok(source.to_string()),
        }
    }

    fn render(&self, tree: &String, options: &RenderOptions) -> Result<String, CompileError> {
        if tree.contains(RENDER_ERROR_MARKER) {
            return Err(CompileError::render("render failed"));
        }
        if options.compressed() {
            Ok(tree.chars().filter(|c| !c.is_whitespace()).collect())
        } else {
            Ok(tree.clone())
        }
    }

    fn format_error(&self, error: &CompileError) -> Option<String> {
        self.formatter
            .then(|| format!("stub error in {}: {}", error.file, error.message))
    }
}

// =========================================================================
// Expander
// =========================================================================

/// Expander with canned results per pattern.
///
/// Unknown patterns match nothing, or themselves in literal mode.
#[derive(Default)]
pub struct ScriptedExpander {
    literal: bool,
    matches: BTreeMap<String, Vec<PathBuf>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedExpander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pattern expands to the path it names.
    pub fn literal() -> Self {
        Self {
            literal: true,
            ..Self::default()
        }
    }

    pub fn with(mut self, pattern: &str, paths: &[&str]) -> Self {
        self.matches.insert(
            pattern.to_string(),
            paths.iter().map(PathBuf::from).collect(),
        );
        self
    }

    /// Pattern lists received, one entry per `expand` call.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl SourceExpander for ScriptedExpander {
    fn expand(&self, patterns: &[String]) -> Result<Vec<PathBuf>, ExpandError> {
        self.calls.lock().unwrap().push(patterns.to_vec());
        let mut out: Vec<PathBuf> = Vec::new();
        for pattern in patterns {
            let found = match self.matches.get(pattern) {
                Some(paths) => paths.clone(),
                None if self.literal => vec![PathBuf::from(pattern)],
                None => Vec::new(),
            };
            for path in found {
                if !out.contains(&path) {
                    out.push(path);
                }
            }
        }
        Ok(out)
    }
}

// =========================================================================
// Reporter
// =========================================================================

/// Keeps every event it receives.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<TaskEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TaskEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Plain-text lines as the console would print them, verbose included.
    pub fn lines(&self) -> Vec<String> {
        self.events()
            .iter()
            .flat_map(|e| format_event(e, false))
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &TaskEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_parse_error_position() {
        assert_eq!(parse_error_position(".b {\n  !error\n}"), Some((2, 3)));
        assert_eq!(parse_error_position(".a { !render-error }"), None);
        assert_eq!(parse_error_position(".a {}"), None);
    }

    #[test]
    fn denied_write_leaves_no_trace() {
        let fs = MemoryFs::new();
        fs.deny_write("x.css");
        assert!(fs.write_text(Path::new("x.css"), "a").is_err());
        assert!(fs.writes().is_empty());
        assert_eq!(fs.file("x.css"), None);
    }
}
