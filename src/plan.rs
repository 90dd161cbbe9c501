//! File-set resolution: expansion, classification, and output paths.
//!
//! Resolving a file set never compiles or writes anything. The pipeline
//! resolves each set right before compiling it; the `plan` command resolves
//! them all up front to show what a build would produce.

use crate::config::{FileSetDefinition, TaskOptions};
use crate::destination::{self, DestinationMode};
use crate::expand::SourceExpander;
use crate::paths::{build_individual_destination, normalize};
use crate::pipeline::TaskError;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One source and the file its compiled output lands in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedOutput {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// A file set with concrete sources and a fixed layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFileSet {
    /// Position in declaration order (0-based).
    pub index: usize,
    /// Destination as configured.
    pub dest: String,
    /// Normalized destination path.
    pub destination: PathBuf,
    pub mode: DestinationMode,
    /// Set only for individual mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<PathBuf>,
    /// Task options with this set's overlay applied.
    pub options: TaskOptions,
    /// Sources in expansion order. In concatenated mode every entry points
    /// at the one destination.
    pub outputs: Vec<PlannedOutput>,
}

impl ResolvedFileSet {
    pub fn resolve(
        index: usize,
        definition: &FileSetDefinition,
        task_options: &TaskOptions,
        expander: &dyn SourceExpander,
    ) -> Result<Self, TaskError> {
        let options = task_options
            .with_overlay(definition.options.as_ref())
            .map_err(|source| TaskError::Options {
                dest: definition.dest.clone(),
                source,
            })?;

        let sources = expander.expand(&definition.src)?;
        if sources.is_empty() {
            return Err(TaskError::NoSources {
                dest: definition.dest.clone(),
            });
        }

        let mode = destination::classify(&definition.dest);
        let dest_path = normalize(Path::new(&definition.dest));

        let (base_path, outputs) = match mode {
            DestinationMode::Individual => {
                let base = destination::resolve_base_path(&sources, &options.base_path);
                let outputs: Vec<PlannedOutput> = sources
                    .into_iter()
                    .map(|source| PlannedOutput {
                        destination: build_individual_destination(
                            &dest_path,
                            &source,
                            &base,
                            options.flatten,
                        ),
                        source,
                    })
                    .collect();
                ensure_distinct_outputs(&definition.dest, &outputs)?;
                (Some(base), outputs)
            }
            DestinationMode::Concatenated => {
                let outputs = sources
                    .into_iter()
                    .map(|source| PlannedOutput {
                        source,
                        destination: dest_path.clone(),
                    })
                    .collect();
                (None, outputs)
            }
        };

        Ok(Self {
            index,
            dest: definition.dest.clone(),
            destination: dest_path,
            mode,
            base_path,
            options,
            outputs,
        })
    }

    pub fn sources(&self) -> impl Iterator<Item = &Path> {
        self.outputs.iter().map(|o| o.source.as_path())
    }
}

/// Two sources of one individual set must not share an output file.
fn ensure_distinct_outputs(dest: &str, outputs: &[PlannedOutput]) -> Result<(), TaskError> {
    let mut seen: HashMap<&Path, &Path> = HashMap::new();
    for output in outputs {
        if let Some(first) = seen.insert(output.destination.as_path(), output.source.as_path()) {
            return Err(TaskError::DuplicateOutput {
                dest: dest.to_string(),
                path: output.destination.clone(),
                first: first.to_path_buf(),
                second: output.source.clone(),
            });
        }
    }
    Ok(())
}

/// Resolve every file set in order, stopping at the first error.
pub fn plan(
    file_sets: &[FileSetDefinition],
    options: &TaskOptions,
    expander: &dyn SourceExpander,
) -> Result<Vec<ResolvedFileSet>, TaskError> {
    file_sets
        .iter()
        .enumerate()
        .map(|(index, definition)| ResolvedFileSet::resolve(index, definition, options, expander))
        .collect()
}
