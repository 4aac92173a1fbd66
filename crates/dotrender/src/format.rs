//! Output format resolution.
//!
//! A render request may name its format explicitly, imply it through the
//! suffix of the output path, or both. [`resolve_format`] reconciles the
//! two signals:
//!
//! | suffix            | explicit format | result                                |
//! |-------------------|-----------------|---------------------------------------|
//! | known `.X`        | none            | `X`                                   |
//! | known `.X`        | `X` (any case)  | `X`                                   |
//! | known `.X`        | `Y != X`        | `Y` + [`FormatSuffixMismatch`] warning |
//! | empty or unknown  | `Y`             | `Y` + [`UnknownSuffix`] warning        |
//! | empty or unknown  | none            | [`RenderError::RequiredArgument`]      |
//!
//! The explicit format always wins; suffix inference only fills in or
//! confirms. Results are lower case.
//!
//! [`FormatSuffixMismatch`]: DiagnosticKind::FormatSuffixMismatch
//! [`UnknownSuffix`]: DiagnosticKind::UnknownSuffix

use std::{fmt, path::Path};

use log::{debug, warn};

use dotrender_core::{
    diagnostic::{Diagnostic, DiagnosticKind, Resolved},
    parameter::{ParameterKind, Registry},
};

use crate::{error::RenderError, path};

/// Why a format could not be inferred from an output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuffixError {
    /// The output path has no suffix.
    Missing { outfile: String },

    /// The suffix is not a known format.
    Unknown {
        outfile: String,
        suffix: String,
        format: String,
        supported: Vec<String>,
    },
}

impl fmt::Display for SuffixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuffixError::Missing { outfile } => write!(
                f,
                "cannot infer rendering format from outfile: {outfile:?} (missing suffix)"
            ),
            SuffixError::Unknown {
                outfile,
                suffix,
                format,
                supported,
            } => write!(
                f,
                "cannot infer rendering format from suffix {suffix:?} of outfile: {outfile:?} \
                 (unknown format: {format:?}, provide outfile with a suffix from {supported:?})"
            ),
        }
    }
}

impl std::error::Error for SuffixError {}

/// Returns the sorted formats known to `registry`.
pub fn supported_formats(registry: &dyn Registry) -> Vec<String> {
    registry
        .values(ParameterKind::Format)
        .into_iter()
        .map(String::from)
        .collect()
}

/// Returns the sorted output path suffixes known to `registry`, e.g. `.pdf`.
pub fn supported_suffixes(registry: &dyn Registry) -> Vec<String> {
    registry
        .values(ParameterKind::Format)
        .into_iter()
        .map(|format| format!(".{format}"))
        .collect()
}

/// Infer the format from the suffix of `outfile`.
///
/// # Errors
///
/// Returns [`SuffixError`] if the suffix is empty or not a format known to
/// `registry`.
///
/// # Examples
///
/// ```
/// # use std::path::Path;
/// # use dotrender::format::infer_format;
/// # use dotrender_core::parameter::ParameterRegistry;
/// let registry = ParameterRegistry::default();
///
/// assert_eq!(infer_format(&registry, Path::new("spam.gv.svg")).unwrap(), "svg");
/// assert_eq!(infer_format(&registry, Path::new("spam.PNG")).unwrap(), "png");
/// assert!(infer_format(&registry, Path::new("spam")).is_err());
/// ```
pub fn infer_format(registry: &dyn Registry, outfile: &Path) -> Result<String, SuffixError> {
    let suffix = path::suffix(outfile);
    let outfile_str = outfile.display().to_string();

    let Some(format) = suffix.strip_prefix('.') else {
        return Err(SuffixError::Missing {
            outfile: outfile_str,
        });
    };
    let format = format.to_lowercase();

    if !registry.contains(ParameterKind::Format, &format) {
        return Err(SuffixError::Unknown {
            outfile: outfile_str,
            suffix,
            format,
            supported: supported_suffixes(registry),
        });
    }

    Ok(format)
}

/// Resolve the rendering format from `outfile` and an optional explicit
/// `format`.
///
/// The returned [`Resolved`] carries the lower-cased format and any
/// warnings raised; each warning is also logged.
///
/// # Errors
///
/// Returns [`RenderError::RequiredArgument`] if no format is given and none
/// can be inferred from the suffix of `outfile`.
pub fn resolve_format(
    registry: &dyn Registry,
    outfile: &Path,
    format: Option<&str>,
) -> Result<Resolved<String>, RenderError> {
    let resolved = match (infer_format(registry, outfile), format) {
        (Ok(inferred), None) => Resolved::new(inferred),
        (Ok(inferred), Some(given)) if given.to_lowercase() == inferred => Resolved::new(inferred),
        (Ok(inferred), Some(given)) => Resolved::new(given.to_lowercase()).with_diagnostic(
            Diagnostic::new(
                DiagnosticKind::FormatSuffixMismatch,
                format!(
                    "expected format {inferred:?} from outfile differs from given format: {given:?}"
                ),
            )
            .with_help(format!("rendering with format {given:?}")),
        ),
        (Err(_), None) => {
            return Err(RenderError::required_argument(format!(
                "cannot infer rendering format from suffix {:?} of outfile: {:?} \
                 (provide format or outfile with a suffix from {:?})",
                path::suffix(outfile),
                outfile.display().to_string(),
                supported_suffixes(registry),
            )));
        }
        (Err(reason), Some(given)) => {
            debug!(reason:% = reason; "Falling back to given format");
            Resolved::new(given.to_lowercase()).with_diagnostic(
                Diagnostic::new(
                    DiagnosticKind::UnknownSuffix,
                    format!(
                        "unknown outfile suffix {:?} (expected: {:?})",
                        path::suffix(outfile),
                        format!(".{given}")
                    ),
                )
                .with_help(format!("rendering with format {given:?}")),
            )
        }
    };

    for diagnostic in resolved.diagnostics() {
        warn!(code = diagnostic.kind().code(); "{}", diagnostic.message());
    }

    Ok(resolved)
}
