//! Configuration types for dotrender.
//!
//! This module provides configuration structures that control how render
//! requests are executed. All types implement [`serde::Deserialize`] for
//! flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining backend and registry settings.
//! - [`BackendConfig`] - Engine executable, default engine, source suffix and quietness.
//! - [`RegistryConfig`] - Extra values accepted on top of the Graphviz tables.
//!
//! # Example
//!
//! ```
//! # use dotrender::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.backend().engine(), "dot");
//! assert_eq!(config.backend().source_extension(), "gv");
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use dotrender_core::parameter::{ParameterKind, ParameterRegistry};

use crate::command::DOT_BINARY;

/// Suffix used for source paths derived from an output path.
pub const DEFAULT_SOURCE_EXTENSION: &str = "gv";

/// Default layout engine.
pub const DEFAULT_ENGINE: &str = "dot";

/// Top-level configuration combining backend and registry settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Backend configuration section.
    #[serde(default)]
    backend: BackendConfig,

    /// Registry configuration section.
    #[serde(default)]
    registry: RegistryConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified sections.
    pub fn new(backend: BackendConfig, registry: RegistryConfig) -> Self {
        Self { backend, registry }
    }

    /// Returns the backend configuration.
    pub fn backend(&self) -> &BackendConfig {
        &self.backend
    }

    /// Returns the registry configuration.
    pub fn registry(&self) -> &RegistryConfig {
        &self.registry
    }
}

/// How the layout engine is invoked.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Engine executable, looked up on `PATH` when not absolute.
    binary: PathBuf,

    /// Layout engine used when a request names none.
    engine: String,

    /// Suffix for source paths derived from the output path.
    source_extension: String,

    /// Suppress the engine's stderr unless a request asks otherwise.
    quiet: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DOT_BINARY),
            engine: DEFAULT_ENGINE.to_string(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            quiet: false,
        }
    }
}

impl BackendConfig {
    /// Set the engine executable.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the default layout engine.
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Set the suffix for derived source paths, without the leading dot.
    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into();
        self
    }

    /// Set the default quietness.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Returns the engine executable.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Returns the default layout engine.
    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Returns the suffix for derived source paths.
    pub fn source_extension(&self) -> &str {
        self.source_extension.trim_start_matches('.')
    }

    /// Returns the default quietness.
    pub fn quiet(&self) -> bool {
        self.quiet
    }
}

/// Extra parameter values, keyed by kind (`engine`, `format`, ...).
///
/// ```toml
/// [registry]
/// format = ["webp2"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RegistryConfig {
    extra: BTreeMap<ParameterKind, Vec<String>>,
}

impl RegistryConfig {
    /// Add extra values for `kind`.
    pub fn with_values<I, S>(mut self, kind: ParameterKind, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra
            .entry(kind)
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Returns the extra values for `kind`.
    pub fn values(&self, kind: ParameterKind) -> &[String] {
        self.extra.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Build the Graphviz registry extended with the configured values.
    pub fn build(&self) -> ParameterRegistry {
        self.extra
            .iter()
            .fold(ParameterRegistry::default(), |registry, (kind, values)| {
                registry.with_values(*kind, values)
            })
    }
}
