//! Task configuration module.
//!
//! Loads and validates `styles.toml`: the task-wide `[options]` table and the
//! ordered list of `[[files]]` file-set definitions. Each file set may carry
//! its own `[files.options]` overlay, merged on top of the task options.
//!
//! ## Config File
//!
//! ```toml
//! [options]
//! base_path = "auto"        # "auto", false, or an explicit directory
//! flatten = false           # drop directory structure for individual outputs
//!
//! # Parse-time compiler options
//! paths = ["styles/shared"] # search paths (default: the source's directory)
//! optimization = 1          # 0-2
//! filename = "site.scss"    # file name used in error messages
//! strict_imports = false
//! dump_line_numbers = false
//!
//! # Render-time compiler options
//! compress = false
//! yuicompress = false
//!
//! [[files]]
//! src = ["styles/**/*.scss", "!styles/**/_*.scss"]
//! dest = "public/css/"      # trailing separator: one output per source
//!
//! [[files]]
//! src = ["vendor/reset.scss", "styles/site.scss"]
//! dest = "public/site.css"  # file-like: sources concatenated in order
//!
//! [files.options]
//! compress = true           # applies to this file set only
//! ```
//!
//! Unknown keys under `[options]` are ignored so compiler passthrough options
//! from other tools don't break the build. Unknown keys anywhere else are
//! rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Highest optimization level accepted by the compiler options.
pub const MAX_OPTIMIZATION: u8 = 2;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level `styles.toml` contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StylesConfig {
    /// Task-wide options, the base layer for every file set.
    pub options: TaskOptions,
    /// File sets, processed strictly in declaration order.
    pub files: Vec<FileSetDefinition>,
}

/// One group of source patterns mapped to a single destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSetDefinition {
    /// Source patterns, expanded in order. A leading `!` excludes matches.
    pub src: Vec<String>,
    /// Destination. A trailing path separator makes it a directory.
    pub dest: String,
    /// Options overlay merged on top of the task options for this set only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<toml::Table>,
}

impl FileSetDefinition {
    pub fn new(src: &[&str], dest: &str) -> Self {
        Self {
            src: src.iter().map(|s| s.to_string()).collect(),
            dest: dest.to_string(),
            options: None,
        }
    }
}

/// Options governing layout and compilation of a file set.
///
/// `base_path` and `flatten` drive output layout; the remaining fields are
/// passed through to the compiler, split into parse-time and render-time
/// subsets by [`crate::compiler::ParseOptions`] and
/// [`crate::compiler::RenderOptions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskOptions {
    pub base_path: BasePath,
    pub flatten: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<PathBuf>>,
    pub optimization: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub strict_imports: bool,
    pub dump_line_numbers: bool,
    pub compress: bool,
    pub yuicompress: bool,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            base_path: BasePath::Auto,
            flatten: false,
            paths: None,
            optimization: 1,
            filename: None,
            strict_imports: false,
            dump_line_numbers: false,
            compress: false,
            yuicompress: false,
        }
    }
}

impl TaskOptions {
    /// Validate option values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.optimization > MAX_OPTIMIZATION {
            return Err(ConfigError::Validation(format!(
                "optimization must be 0-{MAX_OPTIMIZATION}"
            )));
        }
        Ok(())
    }

    /// Resolve the effective options for one file set.
    ///
    /// The overlay is merged table-wise on top of `self`, then deserialized
    /// and validated. Without an overlay this is a plain clone.
    pub fn with_overlay(&self, overlay: Option<&toml::Table>) -> Result<TaskOptions, ConfigError> {
        let Some(overlay) = overlay else {
            return Ok(self.clone());
        };
        let base = toml::Value::try_from(self)?;
        let merged = merge_toml(base, toml::Value::Table(overlay.clone()));
        let options: TaskOptions = merged.try_into()?;
        options.validate()?;
        Ok(options)
    }
}

/// Root directory used to reconstruct structure for individual outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBasePath", into = "RawBasePath")]
pub enum BasePath {
    /// Longest common ancestor directory of the file set's sources.
    #[default]
    Auto,
    /// Explicit directory, used verbatim.
    Explicit(PathBuf),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawBasePath {
    Flag(bool),
    Path(String),
}

impl TryFrom<RawBasePath> for BasePath {
    type Error = String;

    fn try_from(raw: RawBasePath) -> Result<Self, Self::Error> {
        match raw {
            RawBasePath::Flag(false) => Ok(BasePath::Auto),
            RawBasePath::Flag(true) => {
                Err("base_path must be \"auto\", false, or a directory".to_string())
            }
            RawBasePath::Path(p) if p.is_empty() || p == "auto" => Ok(BasePath::Auto),
            RawBasePath::Path(p) => Ok(BasePath::Explicit(PathBuf::from(p))),
        }
    }
}

impl From<BasePath> for RawBasePath {
    fn from(base: BasePath) -> Self {
        match base {
            BasePath::Auto => RawBasePath::Path("auto".to_string()),
            BasePath::Explicit(p) => RawBasePath::Path(p.to_string_lossy().into_owned()),
        }
    }
}

impl StylesConfig {
    /// Validate the task options, every file set, and every overlay merge.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.options.validate()?;
        for (i, set) in self.files.iter().enumerate() {
            let n = i + 1;
            if set.dest.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "files[{n}].dest must not be empty"
                )));
            }
            if set.src.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "files[{n}].src must list at least one pattern"
                )));
            }
            self.options.with_overlay(set.options.as_ref())?;
        }
        Ok(())
    }
}

// =============================================================================
// Config loading and merging
// =============================================================================

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<StylesConfig, ConfigError> {
    let config: StylesConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load `styles.toml` from the given path.
pub fn load_config(path: &Path) -> Result<StylesConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `styles.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Style Build Configuration
# =========================
# Every [[files]] entry maps source patterns to one destination. File sets
# are compiled strictly in the order they appear; the first error stops the
# whole build.
#
# Paths are relative to the directory containing this file.

# ---------------------------------------------------------------------------
# Task options (apply to every file set)
# ---------------------------------------------------------------------------
[options]
# Root for reconstructing directory structure in per-file outputs.
# "auto" (or false) uses the deepest directory shared by all sources.
base_path = "auto"

# Write per-file outputs directly into the destination directory,
# discarding source subdirectories.
flatten = false

# --- Parse-time compiler options ---

# Search paths for @import / @use. Defaults to the source file's directory.
# paths = ["styles/shared"]

# Optimization level (0-2).
optimization = 1

# File name reported in error messages (defaults to each source path).
# filename = "site.scss"

strict_imports = false
dump_line_numbers = false

# --- Render-time compiler options ---

# Emit compressed CSS.
compress = false

# Alternate compressor; implies compressed output.
yuicompress = false

# ---------------------------------------------------------------------------
# File sets
# ---------------------------------------------------------------------------

# Destination ending in "/": one .css file per source.
[[files]]
src = ["styles/**/*.scss", "!styles/**/_*.scss"]
dest = "public/css/"

# Destination naming a file: sources compiled and joined in order.
# [[files]]
# src = ["vendor/reset.scss", "styles/site.scss"]
# dest = "public/site.css"
#
# [files.options]
# compress = true
"##
}
