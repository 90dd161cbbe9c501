//! Output path derivation for individual-mode file sets.
//!
//! Every source compiles to `<dest_dir>/<relative dir>/<stem>.css`, where the
//! relative directory is the source's parent with the base path stripped, or
//! nothing at all when flattening:
//!
//! ```text
//! dest_dir = build/   base = dir
//!
//! dir/a.scss          → build/a.css
//! dir/sub/b.scss      → build/sub/b.css      (flatten: build/b.css)
//! ```
//!
//! All functions here are pure; nothing touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Extension given to every compiled output.
pub const OUTPUT_EXTENSION: &str = "css";

/// Lexically normalize a path: drop `.` segments and fold `..` into the
/// preceding segment where there is one.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if can_pop {
                    out.pop();
                } else {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Output file name for a source: only its last extension swapped for
/// `.css`, so `theme.dark.scss` becomes `theme.dark.css`.
pub fn output_file_name(source: &Path) -> PathBuf {
    let stem = source.file_stem().unwrap_or(source.as_os_str());
    PathBuf::from(format!("{}.{OUTPUT_EXTENSION}", stem.to_string_lossy()))
}

/// Derive the output path of one source in an individual-mode file set.
///
/// A source outside `base_path` keeps its full parent directory.
pub fn build_individual_destination(
    dest_dir: &Path,
    source: &Path,
    base_path: &Path,
    flatten: bool,
) -> PathBuf {
    let dest_dir = normalize(dest_dir);
    let source = normalize(source);
    let file_name = output_file_name(&source);

    if flatten {
        return dest_dir.join(file_name);
    }

    let parent = source.parent().unwrap_or(Path::new(""));
    let base = normalize(base_path);
    let relative = parent.strip_prefix(&base).unwrap_or(parent);
    dest_dir.join(relative).join(file_name)
}
