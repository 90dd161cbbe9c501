//! Error formatting and the fatal-abort signal.
//!
//! Compiler errors are shown as `<file>: [L<line>:C<column>] <message>`,
//! unless the backend provides its own formatter. Other task errors use
//! their `Display` text.

use crate::compiler::{CompileError, StyleCompiler};
use crate::output::Reporter;
use crate::pipeline::{RunState, TaskError, TaskEvent};

/// Returned by [`report`]: the run must stop.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fatal;

impl From<Fatal> for RunState {
    fn from(_: Fatal) -> Self {
        RunState::Aborted
    }
}

/// Default layout, built from whichever fields the error carries.
pub fn format_position(error: &CompileError) -> String {
    let position = match (error.line, error.column) {
        (Some(line), Some(column)) => format!("[L{line}:C{column}] "),
        (Some(line), None) => format!("[L{line}] "),
        _ => String::new(),
    };
    if error.file.is_empty() {
        format!("{position}{}", error.message)
    } else {
        format!("{}: {position}{}", error.file, error.message)
    }
}

/// Format a compiler error, preferring the backend's own formatter.
pub fn format_compile_error<C: StyleCompiler>(compiler: &C, error: &CompileError) -> String {
    compiler
        .format_error(error)
        .unwrap_or_else(|| format_position(error))
}

pub fn format_task_error<C: StyleCompiler>(compiler: &C, error: &TaskError) -> String {
    match error {
        TaskError::Compile(err) => format_compile_error(compiler, err),
        other => other.to_string(),
    }
}

/// Log the error at error severity and signal that the run must abort.
pub fn report<C: StyleCompiler>(compiler: &C, reporter: &dyn Reporter, error: &TaskError) -> Fatal {
    reporter.report(&TaskEvent::Failed {
        message: format_task_error(compiler, error),
    });
    Fatal
}
