//! Dotrender CLI library
//!
//! This module contains the core CLI logic: it merges the command line with
//! the configuration file into a [`RenderRequest`] and hands it to a
//! [`Backend`].

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use log::info;

use dotrender::{
    Backend, RenderError, RenderRequest, Rendered,
    config::AppConfig,
    execute::RecordingRunner,
    parameter::{ParameterKind, Registry},
};

/// Run the dotrender CLI application
///
/// With `--dry-run` the request is fully resolved and the engine command
/// is logged, but nothing is spawned.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `RenderError` for:
/// - Configuration loading errors
/// - Invalid or conflicting request parameters
/// - A missing or failing layout engine
pub fn run(args: &Args) -> Result<Rendered, RenderError> {
    info!(
        source:? = args.source,
        output:? = args.output;
        "Processing render request"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let request = build_request(args, &app_config);
    let backend = Backend::from_config(&app_config);

    if args.dry_run {
        let backend = backend.with_runner(RecordingRunner::new());
        let rendered = backend.render(&request)?;
        for invocation in backend.runner().invocations() {
            info!(
                command:% = invocation.command,
                cwd:? = invocation.cwd;
                "Dry run, engine not started"
            );
        }
        return Ok(rendered);
    }

    backend.render(&request)
}

/// Returns the accepted values of `kind`, honoring configured additions.
///
/// # Errors
///
/// Returns `RenderError::Config` if the configuration cannot be loaded.
pub fn list_values(args: &Args, kind: ParameterKind) -> Result<Vec<String>, RenderError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let registry = app_config.registry().build();

    Ok(registry
        .values(kind)
        .into_iter()
        .map(str::to_string)
        .collect())
}

fn build_request(args: &Args, app_config: &AppConfig) -> RenderRequest {
    let backend = app_config.backend();
    let engine = args.engine.as_deref().unwrap_or(backend.engine());

    let mut request = RenderRequest::new(engine)
        .with_quiet(args.quiet || backend.quiet())
        .with_raise_if_result_exists(args.no_clobber)
        .with_overwrite_source(args.overwrite_source);

    if let Some(format) = &args.format {
        request = request.with_format(format);
    }
    if let Some(source) = &args.source {
        request = request.with_source(source);
    }
    if let Some(renderer) = &args.renderer {
        request = request.with_renderer(renderer);
    }
    if let Some(formatter) = &args.formatter {
        request = request.with_formatter(formatter);
    }
    if let Some(output) = &args.output {
        request = request.with_outfile(output);
    }
    if let Some(mode) = args.neato_no_op {
        request = request.with_neato_no_op(mode);
    }

    request
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use dotrender::config::BackendConfig;

    use super::*;

    #[test]
    fn test_build_request_uses_configured_engine() {
        let args = Args::try_parse_from(["dotrender", "-T", "png", "spam.gv"]).unwrap();
        let config = AppConfig::new(
            BackendConfig::default().with_engine("neato").with_quiet(true),
            Default::default(),
        );

        let request = build_request(&args, &config);
        assert_eq!(request.engine(), "neato");
        assert_eq!(request.format(), Some("png"));
        assert!(request.quiet());
    }

    #[test]
    fn test_build_request_flag_overrides_engine() {
        let args = Args::try_parse_from(["dotrender", "-K", "fdp", "-o", "spam.svg"]).unwrap();

        let request = build_request(&args, &AppConfig::default());
        assert_eq!(request.engine(), "fdp");
        assert_eq!(request.outfile(), Some(std::path::Path::new("spam.svg")));
        assert_eq!(request.source(), None);
        assert!(!request.quiet());
    }
}
