//! # Style Build
//!
//! Compiles configured sets of stylesheets into CSS. Each file set names its
//! source patterns and one destination; the destination's shape picks the
//! output layout.
//!
//! # Architecture: Resolve, Compile, Write
//!
//! ```text
//! styles.toml ──→ file sets ──→ resolve ──→ compile ──→ write
//!                              (expand,     (read,      (one file per
//!                               classify,    parse,      source, or one
//!                               lay out)     render)     joined file)
//! ```
//!
//! File sets run strictly one after another, sources strictly in expansion
//! order. The first failure anywhere ends the whole run: one error line is
//! reported, nothing further is compiled or written, and the process exits
//! non-zero.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `styles.toml` loading, option defaults, per-set option overlays |
//! | [`expand`] | Glob expansion of source patterns, with `!` exclusions |
//! | [`destination`] | Individual vs. concatenated classification, base path resolution |
//! | [`paths`] | Lexical normalization and per-source output paths |
//! | [`plan`] | Resolves a file set into concrete source → output pairs |
//! | [`compiler`] | Two-phase compiler trait, the grass backend, the compile adapter |
//! | [`pipeline`] | The ordered, fail-fast state machine that drives a run |
//! | [`report`] | Error line formatting and the abort signal |
//! | [`output`] | Event formatting and the console reporter |
//! | [`fs`] | Text file reads and writes under a project root |
//!
//! # Design Decisions
//!
//! ## Destination Shape Picks the Mode
//!
//! A destination ending in a path separator (`public/css/`) is a directory:
//! every source gets its own `.css` file, mirroring its directory structure
//! below the common base path (or flattened). Anything else (`site.css`) is
//! a single file holding all compiled sources joined by newlines.
//!
//! ## All-or-Nothing Concatenation
//!
//! A concatenated target is written once, after every source compiled. If any
//! source fails, the target is left untouched rather than half-written.
//! Individual outputs are written as they compile, so earlier ones survive a
//! later failure.
//!
//! ## Backend Behind a Trait
//!
//! The pipeline only knows [`compiler::StyleCompiler`]: parse to a tree,
//! render the tree to CSS. The shipped backend is [`compiler::GrassCompiler`];
//! tests use an in-memory stub so ordering and abort behavior are checked
//! without a real compiler or disk.

pub mod compiler;
pub mod config;
pub mod destination;
pub mod expand;
pub mod fs;
pub mod output;
pub mod paths;
pub mod pipeline;
pub mod plan;
pub mod report;

#[cfg(test)]
pub(crate) mod test_helpers;
