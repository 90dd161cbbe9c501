//! Sass/SCSS backend built on the `grass` crate. Pure Rust, no external
//! `sass` binary needed.
//!
//! | Phase | grass call |
//! |---|---|
//! | **Parse** | `from_string` with expanded output and the search paths as load paths |
//! | **Render** | expanded CSS as-is, or re-emitted with `OutputStyle::Compressed` |
//!
//! grass has no equivalent of `optimization`, `strict_imports` or
//! `dump_line_numbers`; they are accepted and ignored. `yuicompress` selects
//! the same compressed style as `compress`.

use super::backend::{CompileError, StyleCompiler};
use super::options::{ParseOptions, RenderOptions};
use grass::{Options, OutputStyle};
use std::path::PathBuf;

/// Name grass gives the input of `from_string`.
const STRING_INPUT_NAME: &str = "stdin";

/// Expanded CSS produced by the parse phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub css: String,
}

#[derive(Debug, Clone, Default)]
pub struct GrassCompiler {
    /// Directory relative search paths are resolved against.
    root: PathBuf,
}

impl GrassCompiler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn load_paths(&self, options: &ParseOptions) -> Vec<PathBuf> {
        options
            .search_paths()
            .iter()
            .map(|p| self.root.join(p))
            .collect()
    }
}

impl StyleCompiler for GrassCompiler {
    type Tree = Stylesheet;

    fn parse(&self, source: &str, options: &ParseOptions) -> Result<Stylesheet, CompileError> {
        let load_paths = self.load_paths(options);
        let grass_options = Options::default()
            .load_paths(&load_paths)
            .style(OutputStyle::Expanded);

        grass::from_string(source, &grass_options)
            .map(|css| Stylesheet { css })
            .map_err(|err| {
                let rendered = err.to_string();
                match err.kind() {
                    grass::ErrorKind::ParseError { message, loc, .. } => {
                        let mut error = CompileError::parse(message.to_string())
                            .at(loc.begin.line + 1, loc.begin.column + 1);
                        let file = loc.file.name();
                        if file != STRING_INPUT_NAME {
                            error.file = file.to_string();
                        }
                        error
                    }
                    _ => CompileError::parse(rendered),
                }
            })
    }

    fn render(&self, tree: &Stylesheet, options: &RenderOptions) -> Result<String, CompileError> {
        if !options.compressed() {
            return Ok(tree.css.clone());
        }
        let grass_options = Options::default().style(OutputStyle::Compressed);
        grass::from_string(tree.css.as_str(), &grass_options)
            .map_err(|err| CompileError::render(err.to_string()))
    }
}
