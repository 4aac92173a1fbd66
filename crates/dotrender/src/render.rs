//! Render orchestration.
//!
//! [`Backend::render`] turns a [`RenderRequest`] into one engine run. The
//! request's optional fields select the mode:
//!
//! | outfile | format | source | mode                                     |
//! |---------|--------|--------|------------------------------------------|
//! | set     | any    | any    | explicit output (`-o <outfile>`)         |
//! | unset   | set    | set    | default naming (`-O`)                    |
//! | unset   | unset  | any    | error: format required                   |
//! | unset   | set    | unset  | error: source required                   |
//!
//! In explicit-output mode a missing source is derived from the outfile by
//! swapping its suffix for the configured source extension. In
//! default-naming mode the engine writes
//! `<source>.<formatter>.<renderer>.<format>` next to the source, skipping
//! components that are not set.
//!
//! The engine always runs in the source file's directory so that relative
//! references inside the DOT file (e.g. `[image=images/camelot.png]`)
//! resolve against the source.

use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

use log::{debug, info, trace};

use dotrender_core::{
    diagnostic::{Diagnostic, Resolved},
    parameter::{ParameterRegistry, Registry},
};

use crate::{
    command::{Command, CommandBuilder},
    config::{AppConfig, BackendConfig},
    error::RenderError,
    execute::{self, Invocation, ProcessRunner, SystemRunner},
    format::resolve_format,
    path,
};

/// A request to render one DOT source file.
///
/// # Examples
///
/// ```
/// # use dotrender::RenderRequest;
/// // Infer the format from the outfile, derive the source (`spam.gv`)
/// let request = RenderRequest::new("dot").with_outfile("spam.pdf");
///
/// // Let the engine name the result (`spam.gv.png`)
/// let request = RenderRequest::new("dot")
///     .with_format("png")
///     .with_source("spam.gv");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderRequest {
    engine: String,
    format: Option<String>,
    source: Option<PathBuf>,
    renderer: Option<String>,
    formatter: Option<String>,
    quiet: bool,
    outfile: Option<PathBuf>,
    raise_if_result_exists: bool,
    overwrite_source: bool,
    neato_no_op: Option<u8>,
}

impl RenderRequest {
    /// Create a request for the given layout engine.
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            ..Self::default()
        }
    }

    /// Set the output format (`pdf`, `png`, ...).
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the path of the DOT source file.
    pub fn with_source(mut self, source: impl AsRef<Path>) -> Self {
        self.source = Some(source.as_ref().to_path_buf());
        self
    }

    /// Set the output renderer (`cairo`, `gd`, ...).
    pub fn with_renderer(mut self, renderer: impl Into<String>) -> Self {
        self.renderer = Some(renderer.into());
        self
    }

    /// Set the output formatter (`cairo`, `gd`, ...). Requires a renderer.
    pub fn with_formatter(mut self, formatter: impl Into<String>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }

    /// Suppress the engine's stderr.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the path of the rendered file.
    pub fn with_outfile(mut self, outfile: impl AsRef<Path>) -> Self {
        self.outfile = Some(outfile.as_ref().to_path_buf());
        self
    }

    /// Fail with [`RenderError::ResultExists`] if the result file exists.
    pub fn with_raise_if_result_exists(mut self, raise: bool) -> Self {
        self.raise_if_result_exists = raise;
        self
    }

    /// Allow the engine to write to the file it reads from.
    ///
    /// Cannot be combined with [`with_raise_if_result_exists`](Self::with_raise_if_result_exists).
    pub fn with_overwrite_source(mut self, overwrite: bool) -> Self {
        self.overwrite_source = overwrite;
        self
    }

    /// Set the neato no-op mode (`-n<N>`).
    pub fn with_neato_no_op(mut self, mode: u8) -> Self {
        self.neato_no_op = Some(mode);
        self
    }

    /// Returns the layout engine.
    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Returns the explicit format, if any.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Returns the source path, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Returns the outfile, if any.
    pub fn outfile(&self) -> Option<&Path> {
        self.outfile.as_deref()
    }

    /// Returns whether the engine's stderr is suppressed.
    pub fn quiet(&self) -> bool {
        self.quiet
    }
}

/// The engine run a request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    command: Command,
    source: PathBuf,
    result: PathBuf,
}

impl RenderPlan {
    /// Returns the full engine command.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Returns the (possibly derived) source path.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Returns the path the engine will write.
    pub fn result(&self) -> &Path {
        &self.result
    }

    /// Returns the directory the engine runs in.
    pub fn working_dir(&self) -> Option<&Path> {
        path::parent_dir(&self.source)
    }
}

/// The outcome of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    path: PathBuf,
    diagnostics: Vec<Diagnostic>,
}

impl Rendered {
    /// Returns the (possibly relative) path of the rendered file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the warnings raised while resolving the request.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns the path of the rendered file.
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Resolves render requests and runs the layout engine.
///
/// The backend holds no mutable state: concurrent renders of disjoint
/// files need no coordination.
///
/// # Examples
///
/// ```rust,no_run
/// use dotrender::{Backend, RenderRequest, config::BackendConfig};
///
/// let backend = Backend::new(BackendConfig::default());
/// let rendered = backend
///     .render(&RenderRequest::new("dot").with_outfile("spam.pdf"))
///     .expect("Failed to render");
///
/// assert_eq!(rendered.path().to_str(), Some("spam.pdf"));
/// ```
pub struct Backend<R = SystemRunner> {
    config: BackendConfig,
    registry: Box<dyn Registry + Send + Sync>,
    runner: R,
}

impl Default for Backend {
    fn default() -> Self {
        Self::new(BackendConfig::default())
    }
}

impl Backend {
    /// Create a backend spawning real processes, validating against the
    /// Graphviz tables.
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            registry: Box::new(ParameterRegistry::default()),
            runner: SystemRunner,
        }
    }

    /// Create a backend from the application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.backend().clone()).with_registry(config.registry().build())
    }
}

impl<R> Backend<R> {
    /// Replace the parameter registry.
    pub fn with_registry(mut self, registry: impl Registry + Send + Sync + 'static) -> Self {
        self.registry = Box::new(registry);
        self
    }

    /// Replace the process runner.
    pub fn with_runner<S>(self, runner: S) -> Backend<S> {
        Backend {
            config: self.config,
            registry: self.registry,
            runner,
        }
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Returns the parameter registry.
    pub fn registry(&self) -> &dyn Registry {
        &*self.registry
    }

    /// Returns the process runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Resolve `request` into the engine run it describes, without touching
    /// the result path or spawning anything.
    ///
    /// # Errors
    ///
    /// Returns the configuration errors of [`render`](Self::render).
    pub fn plan(&self, request: &RenderRequest) -> Result<Resolved<RenderPlan>, RenderError> {
        if request.raise_if_result_exists && request.overwrite_source {
            return Err(RenderError::ConflictingOptions {
                first: "overwrite_source",
                second: "raise_if_result_exists",
            });
        }

        let source = path::normalize(request.source.as_ref());
        let outfile = path::normalize(request.outfile.as_ref());

        let engine = request.engine.to_lowercase();
        let renderer = request.renderer.as_deref().map(str::to_lowercase);
        let formatter = request.formatter.as_deref().map(str::to_lowercase);
        let params = Parameters {
            engine: &engine,
            renderer: renderer.as_deref(),
            formatter: formatter.as_deref(),
        };

        let builder = CommandBuilder::new(&*self.registry)
            .with_program(self.config.binary())
            .with_neato_no_op(request.neato_no_op);

        let plan = match outfile {
            Some(outfile) => self.plan_explicit_output(request, &builder, &params, outfile, source)?,
            None => Resolved::new(Self::plan_default_naming(
                request, &builder, &params, source,
            )?),
        };

        trace!(plan:? = plan.value(); "Resolved render plan");
        Ok(plan)
    }

    fn plan_explicit_output(
        &self,
        request: &RenderRequest,
        builder: &CommandBuilder<'_>,
        params: &Parameters<'_>,
        outfile: PathBuf,
        source: Option<PathBuf>,
    ) -> Result<Resolved<RenderPlan>, RenderError> {
        info!(outfile = outfile.display().to_string(); "Rendering to explicit outfile");

        let format = resolve_format(&*self.registry, &outfile, request.format.as_deref())?;
        let mut command = params.build(builder, format.value())?;

        let source = source.unwrap_or_else(|| {
            let derived = outfile.with_extension(self.config.source_extension());
            debug!(source = derived.display().to_string(); "Derived source from outfile");
            derived
        });

        if !request.overwrite_source
            && outfile.file_name() == source.file_name()
            && path::resolve(&outfile)? == path::resolve(&source)?
        {
            return Err(RenderError::SameFile {
                outfile: path::file_name(&outfile),
                input: path::file_name(&source),
            });
        }

        let outfile_arg: OsString = if outfile.parent() != source.parent() {
            path::resolve(&outfile)?.into_os_string()
        } else {
            outfile.file_name().unwrap_or_default().to_os_string()
        };

        // https://www.graphviz.org/doc/info/command.html#-o
        command
            .arg("-o")
            .arg(outfile_arg)
            .arg(source.file_name().unwrap_or_default());

        Ok(format.map(|_| RenderPlan {
            command,
            source,
            result: outfile,
        }))
    }

    fn plan_default_naming(
        request: &RenderRequest,
        builder: &CommandBuilder<'_>,
        params: &Parameters<'_>,
        source: Option<PathBuf>,
    ) -> Result<RenderPlan, RenderError> {
        let format = request.format.as_deref().ok_or_else(|| {
            RenderError::required_argument("format: (required if outfile is not given, got None)")
        })?;
        let source = source.ok_or_else(|| {
            RenderError::required_argument("source: (required if outfile is not given, got None)")
        })?;
        let format = format.to_lowercase();

        info!(source = source.display().to_string(); "Rendering with engine-chosen output name");

        let mut command = params.build(builder, &format)?;

        // https://www.graphviz.org/doc/info/command.html#-O
        command.arg("-O").arg(source.file_name().unwrap_or_default());

        let suffix = [params.formatter, params.renderer, Some(format.as_str())]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(".");

        let mut name = source.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(suffix);
        let result = source.with_file_name(name);

        Ok(RenderPlan {
            command,
            source,
            result,
        })
    }
}

impl<R: ProcessRunner> Backend<R> {
    /// Render `request` and return the path of the rendered file.
    ///
    /// Warnings raised while resolving the format are logged and returned
    /// in [`Rendered::diagnostics`].
    ///
    /// # Errors
    ///
    /// - [`RenderError::ConflictingOptions`] if both `raise_if_result_exists`
    ///   and `overwrite_source` are set; checked before anything else
    /// - [`RenderError::RequiredArgument`] if the format cannot be determined,
    ///   the source is missing without an outfile, or a formatter is given
    ///   without a renderer
    /// - [`RenderError::Parameter`] for unknown engine, format, renderer or
    ///   formatter values
    /// - [`RenderError::SameFile`] if the outfile is the source file and
    ///   `overwrite_source` is not set
    /// - [`RenderError::ResultExists`] if `raise_if_result_exists` is set and
    ///   the result file exists
    /// - [`RenderError::ExecutableNotFound`] or [`RenderError::ProcessFailed`]
    ///   if running the engine fails
    pub fn render(&self, request: &RenderRequest) -> Result<Rendered, RenderError> {
        let (plan, diagnostics) = self.plan(request)?.into_parts();

        if request.raise_if_result_exists && plan.result.exists() {
            return Err(RenderError::ResultExists(plan.result));
        }

        let invocation = Invocation {
            command: &plan.command,
            cwd: plan.working_dir(),
            quiet: request.quiet,
            capture_output: true,
        };
        execute::run_check(&self.runner, &invocation)?;

        info!(result = plan.result.display().to_string(); "Rendered successfully");
        Ok(Rendered {
            path: plan.result,
            diagnostics,
        })
    }
}

/// The lower-cased request parameters shared by both modes.
struct Parameters<'a> {
    engine: &'a str,
    renderer: Option<&'a str>,
    formatter: Option<&'a str>,
}

impl Parameters<'_> {
    fn build(&self, builder: &CommandBuilder<'_>, format: &str) -> Result<Command, RenderError> {
        builder.build(self.engine, format, self.renderer, self.formatter)
    }
}
