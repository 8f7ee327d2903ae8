#![deny(missing_docs)]

//! # Parameter Name Discovery
//!
//! Supplies the externally discovered names handed to the expander.

use crate::parser::models::{ParsedFn, PatternShape};

/// Discovers argument names for a whole function.
pub trait ParameterNameDiscoverer {
    /// One name per argument, or `None` when names are unavailable.
    fn parameter_names(&self, function: &ParsedFn) -> Option<Vec<String>>;
}

/// Names arguments from their binding patterns.
///
/// Handles `id`, `mut id`, and single-binding destructuring such as
/// `Path(id)` or `web::Json(Payload(body))`. One unnamed argument makes the
/// whole function undiscoverable.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternNameDiscoverer;

impl ParameterNameDiscoverer for PatternNameDiscoverer {
    fn parameter_names(&self, function: &ParsedFn) -> Option<Vec<String>> {
        function
            .params
            .iter()
            .map(|param| binding_name(&param.shape))
            .collect()
    }
}

fn binding_name(shape: &PatternShape) -> Option<String> {
    match shape {
        PatternShape::Ident(name) => Some(name.clone()),
        PatternShape::TupleStruct(fields) if fields.len() == 1 => binding_name(&fields[0]),
        _ => None,
    }
}
