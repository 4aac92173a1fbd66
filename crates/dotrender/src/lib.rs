//! Dotrender - resolve and run Graphviz render requests.
//!
//! A render request may name an output format, an output file, a source
//! file, or only some of them. This crate reconciles those inputs into one
//! unambiguous `dot` invocation, protects the source from being
//! overwritten, runs the engine, and returns the path of the rendered file.
//!
//! The pipeline, leaves first:
//!
//! - [`path`] - lexical normalization of path inputs
//! - [`format`] - format resolution from an explicit format and the outfile suffix
//! - [`command`] - engine command lines
//! - [`Backend`] - render orchestration
//!
//! Soft problems (an unknown suffix, a suffix disagreeing with the format)
//! are returned as [`Diagnostic`]s; hard problems are [`RenderError`]s.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotrender::RenderRequest;
//!
//! // Format inferred from the suffix, source derived as `spam.gv`
//! let rendered = dotrender::render(&RenderRequest::new("dot").with_outfile("spam.pdf"))
//!     .expect("Failed to render");
//! assert_eq!(rendered.to_string(), "spam.pdf");
//!
//! // Engine-chosen name next to the source
//! let request = RenderRequest::new("dot").with_format("png").with_source("spam.gv");
//! let rendered = dotrender::render(&request).expect("Failed to render");
//! assert_eq!(rendered.to_string(), "spam.gv.png");
//! ```

pub mod command;
pub mod config;
pub mod execute;
pub mod format;
pub mod path;

mod error;
mod render;

pub use dotrender_core::{diagnostic, parameter};

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::RenderError;
pub use render::{Backend, RenderPlan, RenderRequest, Rendered};

/// Render `request` with the default [`Backend`].
///
/// Runs the `dot` executable found on `PATH` and validates parameters
/// against the Graphviz tables. See [`Backend::render`] for the errors.
pub fn render(request: &RenderRequest) -> Result<Rendered, RenderError> {
    Backend::default().render(request)
}
