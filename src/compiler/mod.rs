//! Stylesheet compilation.
//!
//! The module is split into:
//! - **Backend**: [`StyleCompiler`] trait + [`CompileError`]
//! - **Options**: the parse-time and render-time subsets of the task options
//! - **Operations**: [`compile`], the read → parse → render adapter
//! - **grass backend**: [`GrassCompiler`], the production implementation

pub mod backend;
pub mod grass_backend;
pub mod operations;
mod options;

pub use backend::{CompileError, CompileErrorKind, StyleCompiler};
pub use grass_backend::GrassCompiler;
pub use operations::{CompileOutcome, compile};
pub use options::{CompileRequest, ParseOptions, RenderOptions};
