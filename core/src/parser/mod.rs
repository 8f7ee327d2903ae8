#![deny(missing_docs)]

//! # Parser Module
//!
//! Handles parsing of Rust source code using the rust-analyzer syntax library.
//! Extracts structs, fields, `impl` methods, handler functions and their attributes.

pub mod attributes;
pub mod extractors;
pub mod models;

pub use extractors::{parse_source, ParsedSource};
pub use models::{
    ParsedAttribute, ParsedField, ParsedFn, ParsedParam, ParsedRoute, ParsedStruct,
    PatternShape, ReceiverKind,
};
