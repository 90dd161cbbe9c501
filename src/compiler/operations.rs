//! Compile one source file through a [`StyleCompiler`].

use super::backend::{CompileError, StyleCompiler};
use super::options::CompileRequest;
use crate::fs::FileSystem;

/// Result of compiling one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    Success(String),
    Failure(CompileError),
}

impl CompileOutcome {
    pub fn into_result(self) -> Result<String, CompileError> {
        match self {
            CompileOutcome::Success(css) => Ok(css),
            CompileOutcome::Failure(err) => Err(err),
        }
    }
}

/// Read, parse, and render one source.
///
/// Every failure is attributed to the request's display name unless the
/// backend already pinned it to another file.
pub fn compile<C: StyleCompiler>(
    compiler: &C,
    fs: &dyn FileSystem,
    request: &CompileRequest,
) -> CompileOutcome {
    let name = request.display_name();

    let text = match fs.read_text(&request.source) {
        Ok(text) => text,
        Err(e) => return CompileOutcome::Failure(CompileError::read(e.to_string()).in_file(&name)),
    };

    let tree = match compiler.parse(&text, &request.parse) {
        Ok(tree) => tree,
        Err(e) => return CompileOutcome::Failure(e.in_file(&name)),
    };

    match compiler.render(&tree, &request.render) {
        Ok(css) => CompileOutcome::Success(css),
        Err(e) => CompileOutcome::Failure(e.in_file(&name)),
    }
}
