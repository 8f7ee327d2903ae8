#![deny(missing_docs)]

//! # Type Replacement
//!
//! Decides which type is introspected for the fields of a parameter object.
//! Extractor envelopes (`Query<T>`, `web::Form<T>`) are peeled off first, then
//! an explicit replacement map may swap the result for another type.

use crate::config::ExpanderConfig;
use crate::types::TypeRef;
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Type-substitution lookup.
pub trait TypeReplacer {
    /// The type to introspect in place of `ty`; `ty` itself when nothing applies.
    fn replacement(&self, ty: &TypeRef) -> TypeRef;
}

/// Envelope unwrapping plus an explicit replacement map.
#[derive(Debug, Clone, Default)]
pub struct ReplacementRegistry {
    envelopes: Vec<String>,
    replacements: IndexMap<String, String>,
}

impl ReplacementRegistry {
    /// Creates a registry with no envelopes and no replacements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from configuration.
    pub fn from_config(config: &ExpanderConfig) -> Self {
        Self {
            envelopes: config.envelopes.clone(),
            replacements: config.replacements.clone(),
        }
    }

    /// Registers a wrapper type to unwrap.
    pub fn with_envelope(mut self, envelope: impl Into<String>) -> Self {
        self.envelopes.push(envelope.into());
        self
    }

    /// Registers a replacement keyed by type name or raw type text.
    pub fn with_replacement(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.replacements.insert(from.into(), to.into());
        self
    }

    fn is_envelope(&self, ty: &TypeRef) -> bool {
        self.envelopes
            .iter()
            .any(|e| e == ty.path() || e == ty.name())
    }

    fn unwrap_envelopes<'a>(&self, mut ty: &'a TypeRef) -> &'a TypeRef {
        while self.is_envelope(ty) {
            match ty.args().last() {
                Some(inner) => ty = inner,
                None => break,
            }
        }
        ty
    }
}

impl TypeReplacer for ReplacementRegistry {
    fn replacement(&self, ty: &TypeRef) -> TypeRef {
        let unwrapped = self.unwrap_envelopes(ty);

        let target = self
            .replacements
            .get(unwrapped.raw())
            .or_else(|| self.replacements.get(unwrapped.name()));

        match target {
            Some(text) => match TypeRef::parse(text) {
                Ok(replaced) => {
                    debug!(from = %unwrapped, to = %replaced, "type replaced");
                    replaced
                }
                Err(e) => {
                    warn!(from = %unwrapped, to = %text, error = %e, "ignoring unparsable replacement");
                    unwrapped.clone()
                }
            },
            None => unwrapped.clone(),
        }
    }
}
