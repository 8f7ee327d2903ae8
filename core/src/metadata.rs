#![deny(missing_docs)]

//! # Parameter Metadata
//!
//! The read-only query surface shared by every parameter the documentation
//! pass sees. [`SourceParameter`] is the plain handle built from parsed
//! source; the decorating implementation lives in [`crate::expander`].

use crate::parser::models::{ParsedAttribute, ParsedFn, ParsedParam, PatternShape};
use crate::types::TypeRef;
use std::borrow::Cow;
use std::fmt;

/// A piece of metadata attached to a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Annotation {
    /// An attribute written in source.
    Attribute(ParsedAttribute),
    /// Synthesized marker: the parameter may be omitted or null.
    Nullable,
}

impl Annotation {
    /// Name used by [`MethodParameter::has_parameter_annotation`].
    pub const NULLABLE: &'static str = "nullable";

    /// Matches an attribute by full path or last segment, or the nullable marker.
    pub fn is(&self, name: &str) -> bool {
        match self {
            Annotation::Attribute(attr) => attr.is(name),
            Annotation::Nullable => name == Self::NULLABLE,
        }
    }
}

impl From<ParsedAttribute> for Annotation {
    fn from(attr: ParsedAttribute) -> Self {
        Annotation::Attribute(attr)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Attribute(attr) => write!(f, "{}", attr),
            Annotation::Nullable => write!(f, "{}", Self::NULLABLE),
        }
    }
}

/// Classification of the function a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutableKind {
    /// A free function.
    Function,
    /// An associated function taking or not taking `self`.
    Method,
    /// An associated function without receiver returning `Self` or the owner.
    Constructor,
}

/// The function owning a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Executable {
    /// Function name.
    pub name: String,
    /// The `impl` self type, if associated.
    pub owner: Option<String>,
    /// Kind of function.
    pub kind: ExecutableKind,
    /// Declared return type.
    pub return_type: Option<TypeRef>,
}

impl Executable {
    /// Describes a parsed function.
    pub fn from_fn(function: &ParsedFn) -> Self {
        let kind = match &function.owner {
            None => ExecutableKind::Function,
            Some(owner) => {
                let returns_owner = function
                    .return_type
                    .as_ref()
                    .is_some_and(|ty| ty.name() == "Self" || ty.name() == owner);
                if function.receiver.is_none() && returns_owner {
                    ExecutableKind::Constructor
                } else {
                    ExecutableKind::Method
                }
            }
        };

        Self {
            name: function.name.clone(),
            owner: function.owner.clone(),
            kind,
            return_type: function.return_type.clone(),
        }
    }

    /// `Owner::name` for associated functions, `name` otherwise.
    pub fn qualified_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{}::{}", owner, self.name),
            None => self.name.clone(),
        }
    }
}

/// What the annotations of a parameter are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotatedElement<'a> {
    /// An argument of the executable.
    Parameter {
        /// The owning function.
        executable: &'a Executable,
        /// Argument position.
        index: usize,
    },
    /// The executable itself (return-type descriptors).
    Executable(&'a Executable),
}

/// Read-only queries over one function parameter.
pub trait MethodParameter {
    /// Argument position, `None` for a return-type descriptor.
    fn parameter_index(&self) -> Option<usize>;

    /// Display name, when one is known.
    fn parameter_name(&self) -> Option<&str>;

    /// Annotations, in order.
    fn parameter_annotations(&self) -> Cow<'_, [Annotation]>;

    /// Whether any annotation matches `name`.
    fn has_parameter_annotation(&self, name: &str) -> bool {
        self.parameter_annotations().iter().any(|a| a.is(name))
    }

    /// Whether the nullable marker is among the annotations.
    fn is_nullable(&self) -> bool {
        self.parameter_annotations().contains(&Annotation::Nullable)
    }

    /// The owning function.
    fn executable(&self) -> &Executable;

    /// The owning function unless it is a constructor.
    fn method(&self) -> Option<&Executable>;

    /// The owning function if it is a constructor.
    fn constructor(&self) -> Option<&Executable>;

    /// The member this parameter belongs to.
    fn member(&self) -> &Executable;

    /// Where annotations come from.
    fn annotated_element(&self) -> AnnotatedElement<'_>;

    /// The `impl` type declaring the owning function.
    fn declaring_class(&self) -> Option<&str>;

    /// The containing type, defaulting to the declaring type.
    fn containing_class(&self) -> Option<&str>;

    /// A copy of the underlying handle rebound to another containing type.
    fn with_containing_class(&self, containing_class: &str) -> SourceParameter;

    /// The declared type path without generic arguments.
    fn parameter_type(&self) -> &str;

    /// The declared type with generic arguments.
    fn generic_parameter_type(&self) -> &TypeRef;

    /// Nesting level, 1 for the parameter itself.
    fn nesting_level(&self) -> usize;

    /// Type path at the current nesting level.
    fn nested_parameter_type(&self) -> &str;

    /// Full type at the current nesting level.
    fn nested_generic_parameter_type(&self) -> &TypeRef;
}

/// A parameter handle built directly from parsed source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceParameter {
    executable: Executable,
    index: Option<usize>,
    ty: TypeRef,
    name: Option<String>,
    annotations: Vec<Annotation>,
    containing_class: Option<String>,
    nesting_level: usize,
}

impl SourceParameter {
    /// Handle for argument `param` of `executable`.
    ///
    /// The own name is only known for plain identifier bindings.
    pub fn for_argument(executable: Executable, param: &ParsedParam) -> Self {
        let name = match &param.shape {
            PatternShape::Ident(name) => Some(name.clone()),
            _ => None,
        };
        Self {
            executable,
            index: Some(param.index),
            ty: param.ty.clone(),
            name,
            annotations: param
                .attributes
                .iter()
                .cloned()
                .map(Annotation::from)
                .collect(),
            containing_class: None,
            nesting_level: 1,
        }
    }

    /// Handle for the return value of `executable`; `None` without a return type.
    pub fn for_return_type(executable: Executable) -> Option<Self> {
        let ty = executable.return_type.clone()?;
        Some(Self {
            executable,
            index: None,
            ty,
            name: None,
            annotations: Vec::new(),
            containing_class: None,
            nesting_level: 1,
        })
    }

    /// Handles for every argument of a parsed function, in order.
    pub fn from_fn(function: &ParsedFn) -> Vec<Self> {
        let executable = Executable::from_fn(function);
        function
            .params
            .iter()
            .map(|param| Self::for_argument(executable.clone(), param))
            .collect()
    }

    /// A copy one nesting level deeper.
    pub fn nested(&self) -> Self {
        Self {
            nesting_level: self.nesting_level + 1,
            ..self.clone()
        }
    }
}

impl MethodParameter for SourceParameter {
    fn parameter_index(&self) -> Option<usize> {
        self.index
    }

    fn parameter_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn parameter_annotations(&self) -> Cow<'_, [Annotation]> {
        Cow::Borrowed(&self.annotations)
    }

    fn executable(&self) -> &Executable {
        &self.executable
    }

    fn method(&self) -> Option<&Executable> {
        (self.executable.kind != ExecutableKind::Constructor).then_some(&self.executable)
    }

    fn constructor(&self) -> Option<&Executable> {
        (self.executable.kind == ExecutableKind::Constructor).then_some(&self.executable)
    }

    fn member(&self) -> &Executable {
        &self.executable
    }

    fn annotated_element(&self) -> AnnotatedElement<'_> {
        match self.index {
            Some(index) => AnnotatedElement::Parameter {
                executable: &self.executable,
                index,
            },
            None => AnnotatedElement::Executable(&self.executable),
        }
    }

    fn declaring_class(&self) -> Option<&str> {
        self.executable.owner.as_deref()
    }

    fn containing_class(&self) -> Option<&str> {
        self.containing_class
            .as_deref()
            .or_else(|| self.declaring_class())
    }

    fn with_containing_class(&self, containing_class: &str) -> SourceParameter {
        Self {
            containing_class: Some(containing_class.to_string()),
            ..self.clone()
        }
    }

    fn parameter_type(&self) -> &str {
        self.ty.path()
    }

    fn generic_parameter_type(&self) -> &TypeRef {
        &self.ty
    }

    fn nesting_level(&self) -> usize {
        self.nesting_level
    }

    fn nested_parameter_type(&self) -> &str {
        self.nested_generic_parameter_type().path()
    }

    fn nested_generic_parameter_type(&self) -> &TypeRef {
        self.ty.nested(self.nesting_level.saturating_sub(1))
    }
}
