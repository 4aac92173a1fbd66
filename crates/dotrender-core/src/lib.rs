//! Dotrender Core Types and Definitions
//!
//! This crate provides the foundational types shared by the dotrender
//! library and CLI. It includes:
//!
//! - **Parameters**: The Graphviz engine, format, renderer, and formatter
//!   tables behind the [`parameter::Registry`] trait
//! - **Diagnostics**: Non-fatal warnings produced while resolving a render
//!   request ([`diagnostic::Diagnostic`], [`diagnostic::Resolved`])

pub mod diagnostic;
pub mod parameter;
