//! Task orchestration: the ordered, fail-fast compile pipeline.
//!
//! A run walks the configured file sets strictly in declaration order. Each
//! set is resolved (expanded, classified, laid out), then its sources are
//! compiled one at a time:
//!
//! ```text
//! individual     compile a → write a → compile b → write b → ...
//! concatenated   compile a → compile b → ... → write joined
//! ```
//!
//! ## State Machine
//!
//! The run is a queue of [`Step`]s processed one at a time by
//! [`Pipeline::step`]. Resolving a file set pushes that set's steps to the
//! front of the queue, so they run before the next set is resolved.
//!
//! ```text
//! Running ──(queue drained)──→ Completed
//!    │
//!    └──(first error anywhere)──→ Aborted
//! ```
//!
//! The first error is reported once, the queue is dropped, and nothing else
//! runs: not the remaining sources of the set, not any later set. Outputs
//! already written stay on disk; a concatenated target whose sources didn't
//! all compile is never written.

use crate::compiler::{self, CompileError, CompileRequest, ParseOptions, RenderOptions, StyleCompiler};
use crate::config::{ConfigError, FileSetDefinition, TaskOptions};
use crate::destination::DestinationMode;
use crate::expand::{ExpandError, SourceExpander};
use crate::fs::FileSystem;
use crate::output::Reporter;
use crate::plan::ResolvedFileSet;
use crate::report;
use serde::Serialize;
use std::collections::VecDeque;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Unable to compile {dest}; no valid source files were found.")]
    NoSources { dest: String },
    #[error(
        "Unable to compile {dest}; {} and {} would both be written to {}.",
        first.display(),
        second.display(),
        path.display()
    )]
    DuplicateOutput {
        dest: String,
        path: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("Source expansion failed: {0}")]
    Expand(#[from] ExpandError),
    #[error("Invalid options for {dest}: {source}")]
    Options {
        dest: String,
        #[source]
        source: ConfigError,
    },
    #[error("{0}")]
    Compile(#[from] CompileError),
    #[error("Unable to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Running,
    Completed,
    Aborted,
}

/// Everything the pipeline reports, in the order it happens.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    FileSetStarted {
        index: usize,
        dest: String,
        mode: DestinationMode,
        sources: usize,
    },
    OptionsResolved {
        options: TaskOptions,
    },
    Compiling {
        source: PathBuf,
    },
    ArtifactWritten {
        path: PathBuf,
    },
    Failed {
        message: String,
    },
    /// Emitted exactly once per run.
    Finished {
        state: RunState,
        artifacts: usize,
    },
}

/// A written output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputArtifact {
    pub path: PathBuf,
    pub contents: String,
}

/// Final result of a run.
#[derive(Debug)]
pub struct RunReport {
    pub state: RunState,
    /// Artifacts in write order.
    pub artifacts: Vec<OutputArtifact>,
    /// The error that aborted the run, if any.
    pub error: Option<TaskError>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.state == RunState::Completed
    }
}

/// External capabilities the pipeline drives.
pub struct Collaborators<'a, C> {
    pub expander: &'a dyn SourceExpander,
    pub fs: &'a dyn FileSystem,
    pub compiler: &'a C,
    pub reporter: &'a dyn Reporter,
}

enum Step {
    ResolveFileSet(usize),
    CompileIndividual {
        request: CompileRequest,
        destination: PathBuf,
    },
    CompileMember {
        request: CompileRequest,
    },
    WriteConcatenated {
        destination: PathBuf,
    },
}

pub struct Pipeline<'a, C: StyleCompiler> {
    file_sets: &'a [FileSetDefinition],
    options: &'a TaskOptions,
    collaborators: Collaborators<'a, C>,
    queue: VecDeque<Step>,
    state: RunState,
    /// Compiled members of the concatenated set in progress.
    pending: Vec<String>,
    artifacts: Vec<OutputArtifact>,
    error: Option<TaskError>,
}

impl<'a, C: StyleCompiler> Pipeline<'a, C> {
    pub fn new(
        file_sets: &'a [FileSetDefinition],
        options: &'a TaskOptions,
        collaborators: Collaborators<'a, C>,
    ) -> Self {
        Self {
            file_sets,
            options,
            collaborators,
            queue: (0..file_sets.len()).map(Step::ResolveFileSet).collect(),
            state: RunState::Running,
            pending: Vec::new(),
            artifacts: Vec::new(),
            error: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn artifacts(&self) -> &[OutputArtifact] {
        &self.artifacts
    }

    /// Run the next step and return the resulting state.
    ///
    /// Once the state leaves `Running` further calls do nothing.
    pub fn step(&mut self) -> RunState {
        if self.state != RunState::Running {
            return self.state;
        }
        match self.queue.pop_front() {
            None => self.finish(RunState::Completed),
            Some(step) => {
                if let Err(err) = self.execute(step) {
                    self.abort(err);
                }
            }
        }
        self.state
    }

    /// Drive the queue to completion or abort.
    pub fn run(mut self) -> RunReport {
        while self.step() == RunState::Running {}
        RunReport {
            state: self.state,
            artifacts: self.artifacts,
            error: self.error,
        }
    }

    fn execute(&mut self, step: Step) -> Result<(), TaskError> {
        match step {
            Step::ResolveFileSet(index) => self.resolve(index),
            Step::CompileIndividual {
                request,
                destination,
            } => {
                let css = self.compile(&request)?;
                self.write(destination, css)
            }
            Step::CompileMember { request } => {
                let css = self.compile(&request)?;
                self.pending.push(css);
                Ok(())
            }
            Step::WriteConcatenated { destination } => {
                let joined = std::mem::take(&mut self.pending).join("\n");
                self.write(destination, joined)
            }
        }
    }

    fn resolve(&mut self, index: usize) -> Result<(), TaskError> {
        let file_sets = self.file_sets;
        let set = ResolvedFileSet::resolve(
            index,
            &file_sets[index],
            self.options,
            self.collaborators.expander,
        )?;

        let reporter = self.collaborators.reporter;
        reporter.report(&TaskEvent::FileSetStarted {
            index,
            dest: set.dest.clone(),
            mode: set.mode,
            sources: set.outputs.len(),
        });
        reporter.report(&TaskEvent::OptionsResolved {
            options: set.options.clone(),
        });

        // Built once per set, shared by every compile in it.
        let parse = ParseOptions::from_task(&set.options);
        let render = RenderOptions::from_task(&set.options);

        let mut steps: Vec<Step> = Vec::with_capacity(set.outputs.len() + 1);
        match set.mode {
            DestinationMode::Individual => {
                for output in set.outputs {
                    steps.push(Step::CompileIndividual {
                        request: CompileRequest::new(output.source, &parse, render),
                        destination: output.destination,
                    });
                }
            }
            DestinationMode::Concatenated => {
                for output in set.outputs {
                    steps.push(Step::CompileMember {
                        request: CompileRequest::new(output.source, &parse, render),
                    });
                }
                steps.push(Step::WriteConcatenated {
                    destination: set.destination,
                });
            }
        }

        for step in steps.into_iter().rev() {
            self.queue.push_front(step);
        }
        Ok(())
    }

    fn compile(&self, request: &CompileRequest) -> Result<String, TaskError> {
        self.collaborators.reporter.report(&TaskEvent::Compiling {
            source: request.source.clone(),
        });
        let outcome = compiler::compile(self.collaborators.compiler, self.collaborators.fs, request);
        Ok(outcome.into_result()?)
    }

    fn write(&mut self, path: PathBuf, contents: String) -> Result<(), TaskError> {
        if let Err(source) = self.collaborators.fs.write_text(&path, &contents) {
            return Err(TaskError::Write { path, source });
        }
        self.collaborators
            .reporter
            .report(&TaskEvent::ArtifactWritten { path: path.clone() });
        self.artifacts.push(OutputArtifact { path, contents });
        Ok(())
    }

    fn abort(&mut self, err: TaskError) {
        let fatal = report::report(self.collaborators.compiler, self.collaborators.reporter, &err);
        self.queue.clear();
        self.pending.clear();
        self.error = Some(err);
        self.finish(fatal.into());
    }

    fn finish(&mut self, state: RunState) {
        self.state = state;
        self.collaborators.reporter.report(&TaskEvent::Finished {
            state,
            artifacts: self.artifacts.len(),
        });
    }
}

/// Compile every file set in order, stopping at the first error.
pub fn run_task<C: StyleCompiler>(
    file_sets: &[FileSetDefinition],
    options: &TaskOptions,
    collaborators: Collaborators<'_, C>,
) -> RunReport {
    Pipeline::new(file_sets, options, collaborators).run()
}
