//! Stylesheet compiler trait and error detail.
//!
//! Compilation is two-phase: [`StyleCompiler::parse`] turns source text into
//! a backend-specific tree, and [`StyleCompiler::render`] turns that tree
//! into CSS. Each phase sees only its own option subset.
//!
//! The production implementation is
//! [`GrassCompiler`](super::grass_backend::GrassCompiler).

use super::options::{ParseOptions, RenderOptions};
use thiserror::Error;

/// Which step of compiling a source failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// The source could not be read.
    Read,
    /// Malformed source syntax or an unresolved reference.
    Parse,
    /// The tree could not be rendered to CSS.
    Render,
}

/// A compiler failure, attributed to a file and optionally a position.
///
/// Lines and columns are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    /// File the error is attributed to. Empty until the adapter fills it in,
    /// unless the backend knows better (e.g. an error inside an import).
    pub file: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub message: String,
}

impl CompileError {
    fn new(kind: CompileErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            file: String::new(),
            line: None,
            column: None,
            message: message.into(),
        }
    }

    pub fn read(message: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::Read, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::Parse, message)
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::Render, message)
    }

    /// Attach a 1-based position.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Attribute the error to `file` unless it already names one.
    pub fn in_file(mut self, file: &str) -> Self {
        if self.file.is_empty() {
            self.file = file.to_string();
        }
        self
    }
}

/// Trait for stylesheet compiler backends.
///
/// The rest of the crate is backend-agnostic: the pipeline only sees parse,
/// render, and the optional error formatter.
pub trait StyleCompiler {
    /// Intermediate representation handed from parse to render.
    type Tree;

    /// Phase 1: source text to tree.
    fn parse(&self, source: &str, options: &ParseOptions) -> Result<Self::Tree, CompileError>;

    /// Phase 2: tree to CSS text.
    fn render(&self, tree: &Self::Tree, options: &RenderOptions) -> Result<String, CompileError>;

    /// Backend-specific error formatting. `None` uses the default
    /// `<file>: [L<line>:C<column>] <message>` layout.
    fn format_error(&self, _error: &CompileError) -> Option<String> {
        None
    }
}
