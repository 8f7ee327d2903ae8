#![deny(missing_docs)]

//! # Type Introspection
//!
//! An index over parsed source answering "what fields does this type declare"
//! and "which getters/setters does it expose". Getter discovery follows
//! accessor naming conventions over inherent `impl` methods:
//!
//! * `fn email(&self) -> T` exposes `email`
//! * `fn get_email(&self) -> T` exposes `email`
//! * `fn is_active(&self) -> bool` exposes `active`
//! * `fn set_email(&mut self, v: T)` is the write accessor of `email`

use crate::error::{AppError, AppResult};
use crate::metadata::Executable;
use crate::parser::models::{ParsedField, ParsedFn, ParsedStruct, ReceiverKind};
use crate::parser::{parse_source, ParsedSource};
use crate::types::TypeRef;
use indexmap::{IndexMap, IndexSet};
use tracing::warn;

/// A named property and its accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// The property name.
    pub name: String,
    /// The getter, if any.
    pub read_method: Option<Executable>,
    /// The setter, if any.
    pub write_method: Option<Executable>,
}

/// Field and property discovery for a type.
pub trait TypeIntrospector {
    /// Fields declared by `ty`, in declaration order.
    fn declared_fields(&self, ty: &TypeRef) -> AppResult<Vec<ParsedField>>;

    /// Properties exposed by `ty`, sorted by name.
    fn property_descriptors(&self, ty: &TypeRef) -> AppResult<Vec<PropertyDescriptor>>;
}

/// Structs and functions collected from one or more source files.
#[derive(Debug, Clone, Default)]
pub struct SourceIndex {
    structs: IndexMap<String, ParsedStruct>,
    ambiguous: IndexSet<String>,
    functions: Vec<ParsedFn>,
}

impl SourceIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from a single source file.
    pub fn parse(code: &str) -> Self {
        let mut index = Self::new();
        index.add_source(code);
        index
    }

    /// Parses and adds a source file.
    pub fn add_source(&mut self, code: &str) {
        self.add_parsed(parse_source(code));
    }

    /// Adds an already parsed file. The first struct of a given name wins.
    ///
    /// Structs are keyed by their bare name, so the same name in two modules
    /// marks the name ambiguous.
    pub fn add_parsed(&mut self, source: ParsedSource) {
        for parsed in source.structs {
            if self.structs.contains_key(&parsed.name) {
                warn!(name = %parsed.name, "duplicate struct definition ignored");
                self.ambiguous.insert(parsed.name);
                continue;
            }
            self.structs.insert(parsed.name.clone(), parsed);
        }
        self.functions.extend(source.functions);
    }

    /// A struct by name.
    pub fn struct_by_name(&self, name: &str) -> Option<&ParsedStruct> {
        self.structs.get(name)
    }

    /// Whether more than one struct with this name was indexed.
    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.ambiguous.contains(name)
    }

    /// All indexed structs.
    pub fn structs(&self) -> impl Iterator<Item = &ParsedStruct> {
        self.structs.values()
    }

    /// All indexed functions.
    pub fn functions(&self) -> &[ParsedFn] {
        &self.functions
    }

    /// Functions with a route attribute, or with an argument carrying `object_marker`.
    pub fn handlers<'a>(&'a self, object_marker: &'a str) -> impl Iterator<Item = &'a ParsedFn> {
        self.functions.iter().filter(move |f| {
            f.route.is_some()
                || f
                    .params
                    .iter()
                    .any(|p| p.attributes.iter().any(|a| a.is(object_marker)))
        })
    }

    fn inherent_methods<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a ParsedFn> {
        self.functions
            .iter()
            .filter(move |f| !f.in_trait_impl && f.owner.as_deref() == Some(owner))
    }

    fn warn_if_ambiguous(&self, ty: &TypeRef) {
        if self.is_ambiguous(ty.name()) {
            warn!(ty = %ty, "type name is defined more than once; using the first definition");
        }
    }
}

impl TypeIntrospector for SourceIndex {
    fn declared_fields(&self, ty: &TypeRef) -> AppResult<Vec<ParsedField>> {
        self.warn_if_ambiguous(ty);
        self.structs
            .get(ty.name())
            .map(|s| s.fields.clone())
            .ok_or_else(|| AppError::Introspection(format!("no struct named `{}`", ty.name())))
    }

    fn property_descriptors(&self, ty: &TypeRef) -> AppResult<Vec<PropertyDescriptor>> {
        let owner = ty.name();
        if !self.structs.contains_key(owner) && self.inherent_methods(owner).next().is_none() {
            return Err(AppError::Introspection(format!(
                "no struct or impl for `{}`",
                owner
            )));
        }

        // property -> (reader rank, reader), writer
        let mut found: IndexMap<String, (Option<(u8, &ParsedFn)>, Option<&ParsedFn>)> =
            IndexMap::new();

        for method in self.inherent_methods(owner) {
            if let Some((property, rank)) = reader_property(method) {
                let entry = found.entry(property.to_string()).or_default();
                if entry.0.map_or(true, |(current, _)| rank < current) {
                    entry.0 = Some((rank, method));
                }
            } else if let Some(property) = writer_property(method) {
                let entry = found.entry(property.to_string()).or_default();
                entry.1.get_or_insert(method);
            }
        }

        found.sort_keys();
        Ok(found
            .into_iter()
            .map(|(name, (reader, writer))| PropertyDescriptor {
                name,
                read_method: reader.map(|(_, f)| Executable::from_fn(f)),
                write_method: writer.map(Executable::from_fn),
            })
            .collect())
    }
}

/// Property name and precedence rank of a getter (lower wins).
fn reader_property(method: &ParsedFn) -> Option<(&str, u8)> {
    if method.receiver != Some(ReceiverKind::Ref) || !method.params.is_empty() {
        return None;
    }
    let returns = method.return_type.as_ref()?;

    if let Some(property) = method.name.strip_prefix("get_").filter(|p| !p.is_empty()) {
        return Some((property, 1));
    }
    if let Some(property) = method.name.strip_prefix("is_").filter(|p| !p.is_empty()) {
        if returns.is_bool() {
            return Some((property, 2));
        }
    }
    Some((method.name.as_str(), 0))
}

fn writer_property(method: &ParsedFn) -> Option<&str> {
    if method.receiver != Some(ReceiverKind::RefMut) || method.params.len() != 1 {
        return None;
    }
    method.name.strip_prefix("set_").filter(|p| !p.is_empty())
}
