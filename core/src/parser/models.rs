//! # Data Models
//!
//! definition of Intermediate Representation (IR) structures for parsed Rust code.

use crate::types::TypeRef;
use std::fmt;

/// A single outer attribute, e.g. `#[param(required = false)]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedAttribute {
    /// The attribute path as written (e.g. `param`, `actix_web::get`).
    pub path: String,
    /// The raw token tree including delimiters (e.g. `(required = false)`).
    pub args: Option<String>,
}

impl ParsedAttribute {
    /// Creates an attribute from a path and optional token tree.
    pub fn new(path: impl Into<String>, args: Option<&str>) -> Self {
        Self {
            path: path.into(),
            args: args.map(str::to_string),
        }
    }

    /// The last segment of the attribute path.
    pub fn name(&self) -> &str {
        self.path.rsplit("::").next().unwrap_or(&self.path)
    }

    /// Matches either the full path or its last segment.
    pub fn is(&self, name: &str) -> bool {
        self.path == name || self.name() == name
    }
}

impl fmt::Display for ParsedAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.args {
            Some(args) => write!(f, "#[{}{}]", self.path, args),
            None => write!(f, "#[{}]", self.path),
        }
    }
}

/// Represents a field extracted from a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedField {
    /// The name of the field without any `r#` prefix (positional index for
    /// tuple structs).
    pub name: String,
    /// The declared type.
    pub ty: TypeRef,
    /// `///` doc comment, documented on the exploded parameter.
    pub description: Option<String>,
    /// Outer attributes in declaration order.
    pub attributes: Vec<ParsedAttribute>,
}

/// Represents a parsed struct and its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStruct {
    /// The struct name.
    pub name: String,
    /// The fields, in declaration order.
    pub fields: Vec<ParsedField>,
}

/// How a method takes `self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverKind {
    /// `&self`
    Ref,
    /// `&mut self`
    RefMut,
    /// `self` / `mut self`
    Value,
}

/// Shape of an argument binding, as far as naming is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternShape {
    /// `id` or `mut id`.
    Ident(String),
    /// `Path(id)`, `web::Query(filter)`.
    TupleStruct(Vec<PatternShape>),
    /// `_`
    Wildcard,
    /// Anything else (records, tuples, slices).
    Other,
}

/// A function argument (the `self` receiver is not one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedParam {
    /// Zero-based argument position.
    pub index: usize,
    /// The binding shape.
    pub shape: PatternShape,
    /// The declared type.
    pub ty: TypeRef,
    /// Attributes placed on the argument.
    pub attributes: Vec<ParsedAttribute>,
}

/// An actix-style route attribute such as `#[get("/users/{id}")]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRoute {
    /// Lower-case HTTP method (`get`, `post`, ...) or `route` when unspecified.
    pub method: String,
    /// The route path if given.
    pub path: Option<String>,
}

/// A free function or an associated function of an `impl` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFn {
    /// The function name without any `r#` prefix.
    pub name: String,
    /// The `impl` self type name, generics stripped.
    pub owner: Option<String>,
    /// Whether the function sits in a trait `impl`.
    pub in_trait_impl: bool,
    /// The `self` receiver, if any.
    pub receiver: Option<ReceiverKind>,
    /// Arguments, excluding the receiver.
    pub params: Vec<ParsedParam>,
    /// Declared return type.
    pub return_type: Option<TypeRef>,
    /// Route attribute, when present.
    pub route: Option<ParsedRoute>,
    /// `///` doc comment, carried into the handler report.
    pub description: Option<String>,
}

impl ParsedFn {
    /// Path-like display name, `Owner::name` for associated functions.
    pub fn qualified_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{}::{}", owner, self.name),
            None => self.name.clone(),
        }
    }
}
