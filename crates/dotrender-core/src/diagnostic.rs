//! Diagnostics emitted while resolving a render request.
//!
//! A [`Diagnostic`] is a warning: the request can still be carried out
//! with a best-effort resolution, but the caller most likely asked for
//! something slightly different. Diagnostics travel next to the resolved
//! value in a [`Resolved`] instead of a global warning stream, so callers
//! can inspect or ignore them.
//!
//! # Example
//!
//! ```
//! # use dotrender_core::diagnostic::{Diagnostic, DiagnosticKind, Resolved};
//! let resolved = Resolved::new("png".to_string()).with_diagnostic(
//!     Diagnostic::new(DiagnosticKind::UnknownSuffix, "unknown outfile suffix '.out'")
//!         .with_help("expected: '.png'"),
//! );
//!
//! assert_eq!(resolved.value(), "png");
//! assert_eq!(resolved.diagnostics().len(), 1);
//! ```

use std::fmt;

/// The condition a [`Diagnostic`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The output path suffix is empty or not a known format.
    ///
    /// The explicitly given format is used instead.
    UnknownSuffix,

    /// The output path suffix names a different format than the one given.
    ///
    /// The explicitly given format wins.
    FormatSuffixMismatch,
}

impl DiagnosticKind {
    /// Returns the stable code of this kind, e.g. `unknown-suffix`.
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::UnknownSuffix => "unknown-suffix",
            DiagnosticKind::FormatSuffixMismatch => "format-suffix-mismatch",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A non-fatal warning with a kind, a message and optional help text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    help: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic of the given kind.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            help: None,
        }
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Get the kind of this diagnostic.
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "warning[unknown-suffix]: message"
        write!(f, "warning[{}]: {}", self.kind, self.message)
    }
}

impl std::error::Error for Diagnostic {}

/// A resolved value together with the diagnostics raised while resolving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    value: T,
    diagnostics: Vec<Diagnostic>,
}

impl<T> Resolved<T> {
    /// Wrap a value with no diagnostics.
    pub fn new(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// Attach a diagnostic.
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    /// Get the resolved value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Get the diagnostics, in the order they were raised.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` if no diagnostics were raised.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Split into the value and its diagnostics.
    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }

    /// Transform the value, keeping the diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(
            DiagnosticKind::FormatSuffixMismatch,
            "expected format 'pdf' from outfile differs from given format: 'png'",
        );

        assert_eq!(
            diag.to_string(),
            "warning[format-suffix-mismatch]: expected format 'pdf' from outfile differs from given format: 'png'"
        );
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_with_help() {
        let diag = Diagnostic::new(DiagnosticKind::UnknownSuffix, "unknown outfile suffix '.x'")
            .with_help("expected: '.svg'");

        assert_eq!(diag.kind(), DiagnosticKind::UnknownSuffix);
        assert_eq!(diag.help(), Some("expected: '.svg'"));
    }

    #[test]
    fn test_resolved_collects_in_order() {
        let resolved = Resolved::new(1)
            .with_diagnostic(Diagnostic::new(DiagnosticKind::UnknownSuffix, "first"))
            .with_diagnostic(Diagnostic::new(
                DiagnosticKind::FormatSuffixMismatch,
                "second",
            ));

        assert!(!resolved.is_clean());
        let (value, diagnostics) = resolved.map(|v| v + 1).into_parts();
        assert_eq!(value, 2);
        assert_eq!(diagnostics[0].message(), "first");
        assert_eq!(diagnostics[1].message(), "second");
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(DiagnosticKind::UnknownSuffix.code(), "unknown-suffix");
        assert_eq!(
            DiagnosticKind::FormatSuffixMismatch.to_string(),
            "format-suffix-mismatch"
        );
    }
}
