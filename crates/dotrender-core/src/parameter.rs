//! Rendering parameters and the registry that validates them.
//!
//! Graphviz is driven by four string parameters: the layout engine
//! (`-K`), the output format (`-T`), and an optional renderer/formatter
//! pair appended to the format (`-Tpng:cairo:gd`). Which values are valid
//! is owned by a [`Registry`]; resolution logic only ever queries the
//! trait, so a registry can be swapped or extended without touching it.
//!
//! [`ParameterRegistry`] is the table-backed implementation. Its default
//! holds the values known to Graphviz.
//!
//! # Example
//!
//! ```
//! # use dotrender_core::parameter::{ParameterKind, ParameterRegistry, Registry};
//! let registry = ParameterRegistry::default()
//!     .with_values(ParameterKind::Format, ["foo"]);
//!
//! assert!(registry.contains(ParameterKind::Format, "PNG"));
//! assert!(registry.contains(ParameterKind::Format, "foo"));
//! assert!(registry.verify(ParameterKind::Engine, Some("spam")).is_err());
//! ```

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// Layout engines known to Graphviz.
pub const ENGINES: &[&str] = &[
    "dot",
    "neato",
    "twopi",
    "circo",
    "fdp",
    "sfdp",
    "patchwork",
    "osage",
];

/// Output formats known to Graphviz (`dot -T:`).
pub const FORMATS: &[&str] = &[
    "bmp",
    "canon",
    "dot",
    "gv",
    "xdot",
    "xdot1.2",
    "xdot1.4",
    "cgimage",
    "cmap",
    "eps",
    "exr",
    "fig",
    "gd",
    "gd2",
    "gif",
    "gtk",
    "ico",
    "imap",
    "cmapx",
    "imap_np",
    "cmapx_np",
    "ismap",
    "jp2",
    "jpg",
    "jpeg",
    "jpe",
    "json",
    "json0",
    "dot_json",
    "xdot_json",
    "pct",
    "pict",
    "pdf",
    "pic",
    "plain",
    "plain-ext",
    "png",
    "pov",
    "ps",
    "ps2",
    "psd",
    "sgi",
    "svg",
    "svgz",
    "tga",
    "tif",
    "tiff",
    "tk",
    "vml",
    "vmlz",
    "vrml",
    "wbmp",
    "webp",
    "xlib",
    "x11",
];

/// Output renderers known to Graphviz.
pub const RENDERERS: &[&str] = &[
    "cairo", "dot", "fig", "gd", "gdiplus", "map", "pic", "pov", "ps", "svg", "tk", "vml", "vrml",
    "xdot",
];

/// Output formatters known to Graphviz.
pub const FORMATTERS: &[&str] = &["cairo", "core", "gd", "gdiplus", "gdwbmp", "xlib"];

/// The kind of a rendering parameter.
///
/// The names match external configuration strings (snake_case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Layout engine (`-K`)
    Engine,
    /// Output format (`-T`)
    Format,
    /// Output renderer, second `-T` component
    Renderer,
    /// Output formatter, third `-T` component
    Formatter,
}

impl ParameterKind {
    /// All parameter kinds, in `-T` flag order after the engine.
    pub const ALL: [ParameterKind; 4] = [
        ParameterKind::Engine,
        ParameterKind::Format,
        ParameterKind::Renderer,
        ParameterKind::Formatter,
    ];

    /// Returns `true` if a render request cannot omit this parameter.
    pub fn is_required(self) -> bool {
        matches!(self, ParameterKind::Engine | ParameterKind::Format)
    }

    fn defaults(self) -> &'static [&'static str] {
        match self {
            ParameterKind::Engine => ENGINES,
            ParameterKind::Format => FORMATS,
            ParameterKind::Renderer => RENDERERS,
            ParameterKind::Formatter => FORMATTERS,
        }
    }
}

impl FromStr for ParameterKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "engine" => Ok(Self::Engine),
            "format" => Ok(Self::Format),
            "renderer" => Ok(Self::Renderer),
            "formatter" => Ok(Self::Formatter),
            _ => Err("Unsupported parameter kind"),
        }
    }
}

impl From<ParameterKind> for &'static str {
    fn from(val: ParameterKind) -> Self {
        match val {
            ParameterKind::Engine => "engine",
            ParameterKind::Format => "format",
            ParameterKind::Renderer => "renderer",
            ParameterKind::Formatter => "formatter",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// A rendering parameter failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("missing {kind}")]
    Missing { kind: ParameterKind },

    #[error(
        "unknown {kind}: {value:?} (must be {}one of {expected:?})",
        none_allowed(.kind)
    )]
    Unknown {
        kind: ParameterKind,
        value: String,
        expected: Vec<String>,
    },
}

fn none_allowed(kind: &ParameterKind) -> &'static str {
    if kind.is_required() { "" } else { "None or " }
}

/// A source of valid rendering parameter values.
///
/// Lookups are case-insensitive: implementors store lower-case values and
/// the provided methods lower-case the queried value.
pub trait Registry {
    /// Returns the sorted valid values for `kind`.
    fn values(&self, kind: ParameterKind) -> Vec<&str>;

    /// Returns `true` if `value` is valid for `kind`, ignoring case.
    fn contains(&self, kind: ParameterKind, value: &str) -> bool {
        let value = value.to_lowercase();
        self.values(kind).contains(&value.as_str())
    }

    /// Verify an optional parameter value.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Missing`] if `value` is `None` for a
    /// required kind, and [`ParameterError::Unknown`] if `value` is not
    /// valid for `kind`.
    fn verify(&self, kind: ParameterKind, value: Option<&str>) -> Result<(), ParameterError> {
        match value {
            None if kind.is_required() => Err(ParameterError::Missing { kind }),
            None => Ok(()),
            Some(value) if self.contains(kind, value) => Ok(()),
            Some(value) => Err(ParameterError::Unknown {
                kind,
                value: value.to_string(),
                expected: self.values(kind).into_iter().map(String::from).collect(),
            }),
        }
    }
}

impl<R: Registry + ?Sized> Registry for &R {
    fn values(&self, kind: ParameterKind) -> Vec<&str> {
        (**self).values(kind)
    }

    fn contains(&self, kind: ParameterKind, value: &str) -> bool {
        (**self).contains(kind, value)
    }
}

/// A table-backed [`Registry`].
///
/// [`ParameterRegistry::default`] holds the Graphviz tables
/// ([`ENGINES`], [`FORMATS`], [`RENDERERS`], [`FORMATTERS`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRegistry {
    tables: BTreeMap<ParameterKind, BTreeSet<String>>,
}

impl ParameterRegistry {
    /// Create a registry with no valid values at all.
    pub fn empty() -> Self {
        Self {
            tables: ParameterKind::ALL
                .into_iter()
                .map(|kind| (kind, BTreeSet::new()))
                .collect(),
        }
    }

    /// Add values for `kind`. Values are stored lower-cased.
    pub fn with_values<I, S>(mut self, kind: ParameterKind, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let table = self.tables.entry(kind).or_default();
        let before = table.len();
        table.extend(values.into_iter().map(|v| v.as_ref().to_lowercase()));

        debug!(kind:% = kind, added = table.len() - before; "Extended parameter registry");
        self
    }
}

impl Default for ParameterRegistry {
    fn default() -> Self {
        ParameterKind::ALL
            .into_iter()
            .fold(Self::empty(), |registry, kind| {
                registry.with_values(kind, kind.defaults())
            })
    }
}

impl Registry for ParameterRegistry {
    fn values(&self, kind: ParameterKind) -> Vec<&str> {
        self.tables
            .get(&kind)
            .map(|table| table.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn contains(&self, kind: ParameterKind, value: &str) -> bool {
        self.tables
            .get(&kind)
            .is_some_and(|table| table.contains(&value.to_lowercase()))
    }
}
