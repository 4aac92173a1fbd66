//! Layout engine command lines.
//!
//! [`CommandBuilder`] checks the engine, format, renderer and formatter of
//! a request against a [`Registry`] and encodes them as `dot` flags:
//!
//! ```text
//! dot -K<engine> -T<format>[:<renderer>[:<formatter>]] [-n<N>]
//! ```
//!
//! The orchestrator then appends the output mode (`-o <file>` or `-O`) and
//! the source file name.
//!
//! See <https://www.graphviz.org/doc/info/command.html>.

use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::{Path, PathBuf},
};

use log::trace;

use dotrender_core::parameter::{ParameterKind, Registry};

use crate::error::RenderError;

/// The default layout engine executable.
pub const DOT_BINARY: &str = "dot";

/// A program and its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Command {
    /// Create a command with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Get the program to run.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments, without the program.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Returns the program followed by the arguments.
    pub fn argv(&self) -> Vec<OsString> {
        std::iter::once(self.program.clone().into_os_string())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Returns the arguments as lossy strings.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Builds the engine invocation prefix of a render command.
///
/// # Examples
///
/// ```
/// # use dotrender::command::CommandBuilder;
/// # use dotrender_core::parameter::ParameterRegistry;
/// let registry = ParameterRegistry::default();
/// let command = CommandBuilder::new(&registry)
///     .build("dot", "png", Some("cairo"), None)
///     .unwrap();
///
/// assert_eq!(command.to_string(), "dot -Kdot -Tpng:cairo");
/// ```
pub struct CommandBuilder<'a> {
    registry: &'a dyn Registry,
    program: PathBuf,
    neato_no_op: Option<u8>,
}

impl<'a> CommandBuilder<'a> {
    /// Create a builder validating against `registry`, running [`DOT_BINARY`].
    pub fn new(registry: &'a dyn Registry) -> Self {
        Self {
            registry,
            program: PathBuf::from(DOT_BINARY),
            neato_no_op: None,
        }
    }

    /// Set the engine executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the neato no-op mode (`-n<N>`); `None` or `0` omits the flag.
    pub fn with_neato_no_op(mut self, neato_no_op: Option<u8>) -> Self {
        self.neato_no_op = neato_no_op;
        self
    }

    /// Build the command prefix for the given parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::RequiredArgument`] if `formatter` is given
    /// without `renderer`, and [`RenderError::Parameter`] if any value is
    /// unknown to the registry.
    pub fn build(
        &self,
        engine: &str,
        format: &str,
        renderer: Option<&str>,
        formatter: Option<&str>,
    ) -> Result<Command, RenderError> {
        if formatter.is_some() && renderer.is_none() {
            return Err(RenderError::required_argument(
                "formatter given without renderer",
            ));
        }

        self.registry.verify(ParameterKind::Engine, Some(engine))?;
        self.registry.verify(ParameterKind::Format, Some(format))?;
        self.registry.verify(ParameterKind::Renderer, renderer)?;
        self.registry.verify(ParameterKind::Formatter, formatter)?;

        let output_format = [Some(format), renderer, formatter]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(":");

        let mut command = Command::new(&self.program);
        command
            .arg(format!("-K{engine}"))
            .arg(format!("-T{output_format}"));

        if let Some(mode) = self.neato_no_op.filter(|mode| *mode != 0) {
            command.arg(format!("-n{mode}"));
        }

        trace!(command:% = command; "Built command prefix");
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use dotrender_core::parameter::{ParameterError, ParameterRegistry};

    use super::*;

    fn build(
        engine: &str,
        format: &str,
        renderer: Option<&str>,
        formatter: Option<&str>,
    ) -> Result<Command, RenderError> {
        CommandBuilder::new(&ParameterRegistry::default()).build(engine, format, renderer, formatter)
    }

    #[test]
    fn test_build_minimal() {
        let command = build("dot", "pdf", None, None).unwrap();

        assert_eq!(command.program(), Path::new("dot"));
        assert_eq!(command.args_lossy(), ["-Kdot", "-Tpdf"]);
    }

    #[test]
    fn test_build_renderer_and_formatter() {
        let command = build("neato", "png", Some("cairo"), Some("gd")).unwrap();

        assert_eq!(command.args_lossy(), ["-Kneato", "-Tpng:cairo:gd"]);
    }

    #[test]
    fn test_formatter_requires_renderer() {
        let err = build("dot", "png", None, Some("cairo")).unwrap_err();

        assert!(matches!(err, RenderError::RequiredArgument(_)));
        assert_eq!(err.to_string(), "formatter given without renderer");
    }

    #[test]
    fn test_formatter_check_precedes_registry_checks() {
        let err = build("spam", "png", None, Some("cairo")).unwrap_err();

        assert!(matches!(err, RenderError::RequiredArgument(_)));
    }

    #[test]
    fn test_unknown_engine() {
        let err = build("spam", "png", None, None).unwrap_err();

        match err {
            RenderError::Parameter(ParameterError::Unknown { kind, value, .. }) => {
                assert_eq!(kind, ParameterKind::Engine);
                assert_eq!(value, "spam");
            }
            other => panic!("Expected unknown engine, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_format_renderer_formatter() {
        assert!(matches!(
            build("dot", "mp3", None, None),
            Err(RenderError::Parameter(ParameterError::Unknown {
                kind: ParameterKind::Format,
                ..
            }))
        ));
        assert!(matches!(
            build("dot", "png", Some("spam"), None),
            Err(RenderError::Parameter(ParameterError::Unknown {
                kind: ParameterKind::Renderer,
                ..
            }))
        ));
        assert!(matches!(
            build("dot", "png", Some("cairo"), Some("spam")),
            Err(RenderError::Parameter(ParameterError::Unknown {
                kind: ParameterKind::Formatter,
                ..
            }))
        ));
    }

    #[test]
    fn test_neato_no_op() {
        let registry = ParameterRegistry::default();
        let builder = CommandBuilder::new(&registry).with_neato_no_op(Some(2));

        let command = builder.build("neato", "svg", None, None).unwrap();
        assert_eq!(command.args_lossy(), ["-Kneato", "-Tsvg", "-n2"]);

        let builder = CommandBuilder::new(&registry).with_neato_no_op(Some(0));
        let command = builder.build("neato", "svg", None, None).unwrap();
        assert_eq!(command.args_lossy(), ["-Kneato", "-Tsvg"]);
    }

    #[test]
    fn test_custom_program_and_display() {
        let registry = ParameterRegistry::default();
        let mut command = CommandBuilder::new(&registry)
            .with_program("/opt/graphviz/bin/dot")
            .build("dot", "svg", None, None)
            .unwrap();
        command.arg("-O").arg("spam.gv");

        assert_eq!(
            command.to_string(),
            "/opt/graphviz/bin/dot -Kdot -Tsvg -O spam.gv"
        );
        assert_eq!(command.argv().len(), 5);
    }
}
