//! Parse-time and render-time option subsets.
//!
//! Built once per file set from the merged [`TaskOptions`]; each compile
//! request then fills in its per-source defaults.

use crate::config::TaskOptions;
use std::path::{Path, PathBuf};

/// Options consumed by the parse phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Search paths for imports. `None` means the source's own directory.
    pub paths: Option<Vec<PathBuf>>,
    pub optimization: u8,
    /// File name used to attribute errors. `None` means the source path.
    pub filename: Option<String>,
    pub strict_imports: bool,
    pub dump_line_numbers: bool,
}

impl ParseOptions {
    pub fn from_task(options: &TaskOptions) -> Self {
        Self {
            paths: options.paths.clone(),
            optimization: options.optimization,
            filename: options.filename.clone(),
            strict_imports: options.strict_imports,
            dump_line_numbers: options.dump_line_numbers,
        }
    }

    /// Copy with defaults filled in for one source file.
    pub fn for_source(&self, source: &Path) -> Self {
        let paths = self.paths.clone().unwrap_or_else(|| {
            vec![source.parent().map(Path::to_path_buf).unwrap_or_default()]
        });
        let filename = self
            .filename
            .clone()
            .unwrap_or_else(|| source.to_string_lossy().into_owned());
        Self {
            paths: Some(paths),
            filename: Some(filename),
            ..self.clone()
        }
    }

    /// Search paths, empty when unset.
    pub fn search_paths(&self) -> &[PathBuf] {
        self.paths.as_deref().unwrap_or(&[])
    }
}

/// Options consumed by the render phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub compress: bool,
    /// Alternate compressor. Implies compressed output.
    pub yuicompress: bool,
}

impl RenderOptions {
    pub fn from_task(options: &TaskOptions) -> Self {
        Self {
            compress: options.compress,
            yuicompress: options.yuicompress,
        }
    }

    pub fn compressed(&self) -> bool {
        self.compress || self.yuicompress
    }
}

/// Everything needed to compile one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub source: PathBuf,
    pub parse: ParseOptions,
    pub render: RenderOptions,
}

impl CompileRequest {
    pub fn new(source: PathBuf, parse: &ParseOptions, render: RenderOptions) -> Self {
        let parse = parse.for_source(&source);
        Self {
            source,
            parse,
            render,
        }
    }

    /// Name errors for this source are attributed to.
    pub fn display_name(&self) -> String {
        self.parse
            .filename
            .clone()
            .unwrap_or_else(|| self.source.to_string_lossy().into_owned())
    }
}
