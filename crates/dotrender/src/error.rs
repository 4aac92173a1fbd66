//! Error types for dotrender operations.
//!
//! This module provides the main error type [`RenderError`]. Every fatal
//! condition of a render call maps to one variant; the variant names the
//! condition and carries the offending values.

use std::{io, path::PathBuf};

use thiserror::Error;

use dotrender_core::parameter::ParameterError;

/// The main error type for dotrender operations.
///
/// # Categories
///
/// - Configuration errors are detected from the request alone, before any
///   process is spawned: [`RequiredArgument`](Self::RequiredArgument),
///   [`ConflictingOptions`](Self::ConflictingOptions),
///   [`SameFile`](Self::SameFile), [`Parameter`](Self::Parameter) and
///   [`Config`](Self::Config).
/// - [`ResultExists`](Self::ResultExists) is a pre-flight filesystem check.
/// - [`ExecutableNotFound`](Self::ExecutableNotFound),
///   [`ProcessFailed`](Self::ProcessFailed) and [`Io`](Self::Io) come from
///   running the layout engine.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0}")]
    RequiredArgument(String),

    #[error("{first} cannot be combined with {second}")]
    ConflictingOptions {
        first: &'static str,
        second: &'static str,
    },

    #[error(
        "outfile {outfile:?} must be different from input file {input:?} \
         (pass overwrite_source to override)"
    )]
    SameFile { outfile: String, input: String },

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("output file exists: {}", .0.display())]
    ResultExists(PathBuf),

    #[error(
        "failed to execute {program:?}, make sure the Graphviz executables \
         are on your system's PATH"
    )]
    ExecutableNotFound {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("command {command:?} returned non-zero exit status {} [stderr: {stderr:?}]", exit_code(.code))]
    ProcessFailed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "(terminated by signal)".to_string(),
    }
}

impl RenderError {
    /// Create a [`RenderError::RequiredArgument`] error.
    pub fn required_argument(message: impl Into<String>) -> Self {
        Self::RequiredArgument(message.into())
    }

    /// Returns `true` if the error was detected before spawning any process.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::RequiredArgument(_)
                | Self::ConflictingOptions { .. }
                | Self::SameFile { .. }
                | Self::Parameter(_)
                | Self::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use dotrender_core::parameter::ParameterKind;

    use super::*;

    #[test]
    fn test_conflicting_options_message() {
        let err = RenderError::ConflictingOptions {
            first: "overwrite_source",
            second: "raise_if_result_exists",
        };

        assert_eq!(
            err.to_string(),
            "overwrite_source cannot be combined with raise_if_result_exists"
        );
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_process_failed_message() {
        let err = RenderError::ProcessFailed {
            command: "dot -Kdot -Tpng -O spam.gv".to_string(),
            code: Some(1),
            stdout: String::new(),
            stderr: "syntax error in line 1".to_string(),
        };

        assert_eq!(
            err.to_string(),
            r#"command "dot -Kdot -Tpng -O spam.gv" returned non-zero exit status 1 [stderr: "syntax error in line 1"]"#
        );
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_process_failed_by_signal() {
        let err = RenderError::ProcessFailed {
            command: "dot".to_string(),
            code: None,
            stdout: String::new(),
            stderr: String::new(),
        };

        assert!(err.to_string().contains("(terminated by signal)"));
    }

    #[test]
    fn test_parameter_error_is_transparent() {
        let err: RenderError = ParameterError::Missing {
            kind: ParameterKind::Format,
        }
        .into();

        assert_eq!(err.to_string(), "missing format");
        assert!(err.is_configuration_error());
    }
}
