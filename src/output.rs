//! CLI output formatting for task runs and plans.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! File public/css/a.css created.
//! File public/css/pages/home.css created.
//! File public/site.css created.
//!
//! Done, without errors.
//! ```
//!
//! With `--verbose`, each file set is introduced by its destination, mode and
//! effective options, and every compile is announced:
//!
//! ```text
//! File set 1 → public/css/ (individual, 2 sources)
//!     Options: base_path=auto, flatten=false, paths=<source dir>, ...
//!     Compiling styles/a.scss
//! File public/css/a.css created.
//! ```
//!
//! On failure, one error line names the file and position:
//!
//! ```text
//! styles/b.scss: [L2:C10] Undefined variable.
//! Error compiling styles.
//! ```
//!
//! ## Plan
//!
//! ```text
//! 001 public/css/ (individual, base: styles)
//!     styles/a.scss → public/css/a.css
//! 002 public/site.css (concatenated)
//!     vendor/reset.scss
//!     styles/site.scss
//! ```
//!
//! # Architecture
//!
//! Format functions (returning `Vec<String>` or `String`) are pure and carry
//! no I/O. [`ConsoleReporter`] is the thin printer on top. Color is applied
//! only when asked for, so tests compare plain text.

use crate::config::{BasePath, TaskOptions};
use crate::destination::DestinationMode;
use crate::pipeline::{RunState, TaskEvent};
use crate::plan::ResolvedFileSet;
use colored::Colorize;
use std::path::Path;

/// Receives pipeline events in the order they happen.
pub trait Reporter {
    fn report(&self, event: &TaskEvent);
}

/// Severity an event is shown at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Verbose,
    Info,
    Error,
}

pub fn event_level(event: &TaskEvent) -> Level {
    match event {
        TaskEvent::FileSetStarted { .. }
        | TaskEvent::OptionsResolved { .. }
        | TaskEvent::Compiling { .. } => Level::Verbose,
        TaskEvent::ArtifactWritten { .. } => Level::Info,
        TaskEvent::Failed { .. } => Level::Error,
        TaskEvent::Finished { state, .. } => match state {
            RunState::Aborted => Level::Error,
            _ => Level::Info,
        },
    }
}

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn paint_path(path: &Path, color: bool) -> String {
    let text = path.display().to_string();
    if color { text.as_str().cyan().to_string() } else { text }
}

/// Render options the way the old task's verbose flag dump did: one line,
/// `key=value` pairs in declaration order.
pub fn format_options(options: &TaskOptions) -> String {
    let base_path = match &options.base_path {
        BasePath::Auto => "auto".to_string(),
        BasePath::Explicit(p) => p.display().to_string(),
    };
    let paths = match &options.paths {
        Some(paths) => {
            let list: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
            format!("[{}]", list.join(", "))
        }
        None => "<source dir>".to_string(),
    };
    let filename = options.filename.as_deref().unwrap_or("<source>");
    format!(
        "Options: base_path={base_path}, flatten={}, paths={paths}, optimization={}, \
         filename={filename}, strict_imports={}, dump_line_numbers={}, compress={}, yuicompress={}",
        options.flatten,
        options.optimization,
        options.strict_imports,
        options.dump_line_numbers,
        options.compress,
        options.yuicompress,
    )
}

/// Format one pipeline event as display lines.
pub fn format_event(event: &TaskEvent, color: bool) -> Vec<String> {
    match event {
        TaskEvent::FileSetStarted {
            index,
            dest,
            mode,
            sources,
        } => {
            let noun = if *sources == 1 { "source" } else { "sources" };
            vec![format!(
                "File set {} → {} ({}, {} {})",
                index + 1,
                dest,
                mode.label(),
                sources,
                noun
            )]
        }
        TaskEvent::OptionsResolved { options } => vec![format!("    {}", format_options(options))],
        TaskEvent::Compiling { source } => vec![format!("    Compiling {}", source.display())],
        TaskEvent::ArtifactWritten { path } => {
            vec![format!("File {} created.", paint_path(path, color))]
        }
        TaskEvent::Failed { message } => {
            vec![if color { message.as_str().red().to_string() } else { message.clone() }]
        }
        TaskEvent::Finished { state, .. } => match state {
            RunState::Aborted => {
                let line = "Error compiling styles.";
                vec![if color { line.red().bold().to_string() } else { line.to_string() }]
            }
            _ => {
                let line = "Done, without errors.";
                vec![String::new(), if color { line.green().to_string() } else { line.to_string() }]
            }
        },
    }
}

/// Format the resolved plan: each file set with its outputs.
pub fn format_plan(plan: &[ResolvedFileSet]) -> Vec<String> {
    let mut lines = Vec::new();
    for set in plan {
        let header = match (&set.mode, &set.base_path) {
            (DestinationMode::Individual, Some(base)) => {
                let base = if base.as_os_str().is_empty() {
                    ".".to_string()
                } else {
                    base.display().to_string()
                };
                format!("{} {} (individual, base: {})", format_index(set.index + 1), set.dest, base)
            }
            (mode, _) => format!("{} {} ({})", format_index(set.index + 1), set.dest, mode.label()),
        };
        lines.push(header);
        for output in &set.outputs {
            match set.mode {
                DestinationMode::Individual => lines.push(format!(
                    "    {} → {}",
                    output.source.display(),
                    output.destination.display()
                )),
                DestinationMode::Concatenated => {
                    lines.push(format!("    {}", output.source.display()))
                }
            }
        }
    }
    lines
}

/// Prints events to the terminal: info to stdout, errors to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &TaskEvent) {
        let level = event_level(event);
        if level == Level::Verbose && !self.verbose {
            return;
        }
        for line in format_event(event, true) {
            match level {
                Level::Error => eprintln!("{}", line),
                Level::Verbose | Level::Info => println!("{}", line),
            }
        }
    }
}
