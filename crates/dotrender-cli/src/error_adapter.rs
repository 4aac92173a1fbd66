//! Error adapter for converting RenderError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use dotrender::{RenderError, parameter::ParameterError};

/// Adapter for [`RenderError`].
///
/// Render errors carry no source spans; the adapter contributes a stable
/// code per variant and, where there is an obvious way out, a help line
/// naming the flag or setting to change.
pub struct ErrorAdapter<'a>(pub &'a RenderError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            RenderError::RequiredArgument(_) => "dotrender::required_argument",
            RenderError::ConflictingOptions { .. } => "dotrender::conflicting_options",
            RenderError::SameFile { .. } => "dotrender::same_file",
            RenderError::Parameter(_) => "dotrender::parameter",
            RenderError::ResultExists(_) => "dotrender::result_exists",
            RenderError::ExecutableNotFound { .. } => "dotrender::executable_not_found",
            RenderError::ProcessFailed { .. } => "dotrender::process_failed",
            RenderError::Io(_) => "dotrender::io",
            RenderError::Config(_) => "dotrender::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            RenderError::ConflictingOptions { .. } => {
                "pass either --no-clobber or --overwrite-source".to_string()
            }
            RenderError::SameFile { .. } => {
                "pass --overwrite-source to render over the source file".to_string()
            }
            RenderError::Parameter(
                ParameterError::Unknown { kind, .. } | ParameterError::Missing { kind },
            ) => format!("run with --list {kind} to see the accepted values"),
            RenderError::ResultExists(_) => {
                "remove the file or run without --no-clobber".to_string()
            }
            RenderError::ExecutableNotFound { .. } => {
                "install Graphviz or set `binary` in the [backend] configuration".to_string()
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Render `err` with miette's graphical report handler.
pub fn render_report(err: &RenderError) -> String {
    let reporter = miette::GraphicalReportHandler::new();
    let mut writer = String::new();
    if reporter
        .render_report(&mut writer, &ErrorAdapter(err))
        .is_err()
    {
        // Writing to a String only fails inside a Display impl
        return err.to_string();
    }
    writer
}
