#![deny(missing_docs)]

//! # paramdoc Core
//!
//! Expands "parameter object" arguments of Rust web handlers into the
//! individual parameters an API document should list.

/// Shared error types.
pub mod error;

/// Parsed type references.
pub mod types;

/// AST Parsing logic.
pub mod parser;

/// Parameter metadata surface.
pub mod metadata;

/// Field and getter discovery.
pub mod introspect;

/// Type substitution.
pub mod replacement;

/// Argument name discovery.
pub mod discovery;

/// Expander configuration.
pub mod config;

/// Parameter expansion.
pub mod expander;

/// Serializable reports.
pub mod report;

pub use config::ExpanderConfig;
pub use discovery::{ParameterNameDiscoverer, PatternNameDiscoverer};
pub use error::{AppError, AppResult};
pub use expander::{DelegatingParameter, ParameterExpander};
pub use introspect::{PropertyDescriptor, SourceIndex, TypeIntrospector};
pub use metadata::{
    AnnotatedElement, Annotation, Executable, ExecutableKind, MethodParameter, SourceParameter,
};
pub use replacement::{ReplacementRegistry, TypeReplacer};
pub use report::{document_handlers, render, HandlerReport, OutputFormat, ParameterReport};
pub use types::TypeRef;
