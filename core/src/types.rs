#![deny(missing_docs)]

//! # Type References
//!
//! A parsed, comparable view over Rust type syntax (`Query<Filter>`, `&str`,
//! `web::Json<Page<User>>`). Parameter metadata and the replacement registry
//! both work against this instead of raw strings.

use crate::error::{AppError, AppResult};
use ra_ap_edition::Edition;
use ra_ap_syntax::ast::{self, HasGenericArgs};
use ra_ap_syntax::{AstNode, SourceFile};
use std::fmt;

/// A Rust type as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    raw: String,
    path: String,
    args: Vec<TypeRef>,
    is_ref: bool,
}

impl TypeRef {
    /// Parses a type string (e.g. `Option<i32>`) into a `TypeRef`.
    ///
    /// # Examples
    /// ```
    /// use paramdoc_core::TypeRef;
    ///
    /// let ty = TypeRef::parse("web::Query<UserFilter>").unwrap();
    /// assert_eq!(ty.path(), "web::Query");
    /// assert_eq!(ty.name(), "Query");
    /// assert_eq!(ty.args()[0].name(), "UserFilter");
    /// ```
    pub fn parse(text: &str) -> AppResult<Self> {
        // Wrap in a type alias so the parser sees a complete item
        let code = format!("type _Wrapper = {};", text);
        let parse = SourceFile::parse(&code, Edition::Edition2021);
        if !parse.errors().is_empty() {
            return Err(AppError::General(format!(
                "Failed to parse type string: {}",
                text
            )));
        }
        let file = parse.tree();

        file.syntax()
            .descendants()
            .find_map(ast::TypeAlias::cast)
            .and_then(|alias| alias.ty())
            .map(|ty| Self::from_ast(&ty))
            .ok_or_else(|| AppError::General(format!("Invalid type syntax: {}", text)))
    }

    /// Builds a `TypeRef` from an AST type node.
    pub fn from_ast(ty: &ast::Type) -> Self {
        let raw = ty.syntax().text().to_string().trim().to_string();
        match ty {
            ast::Type::RefType(ref_type) => match ref_type.ty() {
                Some(inner) => {
                    let inner = Self::from_ast(&inner);
                    Self {
                        raw,
                        path: inner.path,
                        args: inner.args,
                        is_ref: true,
                    }
                }
                None => Self::opaque(raw),
            },
            ast::Type::PathType(path_type) => match path_type.path() {
                Some(path) => {
                    let args = path
                        .segment()
                        .and_then(|segment| segment.generic_arg_list())
                        .map(|list| {
                            list.generic_args()
                                .filter_map(|arg| match arg {
                                    ast::GenericArg::TypeArg(type_arg) => type_arg.ty(),
                                    _ => None,
                                })
                                .map(|inner| Self::from_ast(&inner))
                                .collect()
                        })
                        .unwrap_or_default();
                    Self {
                        raw,
                        path: path_without_generics(&path),
                        args,
                        is_ref: false,
                    }
                }
                None => Self::opaque(raw),
            },
            _ => Self::opaque(raw),
        }
    }

    fn opaque(raw: String) -> Self {
        Self {
            path: raw.clone(),
            raw,
            args: Vec::new(),
            is_ref: false,
        }
    }

    /// The type exactly as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The path without generic arguments (e.g. `web::Query`).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The last path segment (e.g. `Query`).
    pub fn name(&self) -> &str {
        self.path.rsplit("::").next().unwrap_or(&self.path)
    }

    /// Generic type arguments, in order. Lifetimes and consts are dropped.
    pub fn args(&self) -> &[TypeRef] {
        &self.args
    }

    /// Whether the type is a reference (`&T`, `&mut T`).
    pub fn is_reference(&self) -> bool {
        self.is_ref
    }

    /// Whether this type is the primitive `bool`.
    pub fn is_bool(&self) -> bool {
        self.path == "bool" && self.args.is_empty()
    }

    /// The innermost type reached by following the last generic argument
    /// `levels` times. Stops early when a type has no arguments.
    pub fn nested(&self, levels: usize) -> &TypeRef {
        let mut current = self;
        for _ in 0..levels {
            match current.args.last() {
                Some(inner) => current = inner,
                None => break,
            }
        }
        current
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn path_without_generics(path: &ast::Path) -> String {
    let mut segments = Vec::new();
    let mut current = Some(path.clone());
    while let Some(p) = current {
        if let Some(name) = p.segment().and_then(|s| s.name_ref()) {
            segments.push(name.text().to_string());
        }
        current = p.qualifier();
    }
    segments.reverse();
    segments.join("::")
}
