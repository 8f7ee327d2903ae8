#![deny(missing_docs)]

//! # Parameter Expansion
//!
//! Turns the arguments of a handler into the list of parameters to document.
//! Ordinary arguments pass through with a resolved name. An argument marked
//! as a parameter object is replaced, in field order, by one synthetic
//! parameter per field that has a getter on the (replaced) object type.
//!
//! ```
//! use paramdoc_core::{ParameterExpander, ReplacementRegistry, SourceIndex, MethodParameter};
//! use paramdoc_core::{ExpanderConfig, SourceParameter};
//!
//! let index = SourceIndex::parse(r#"
//!     struct Filter { #[param(required = false)] email: String, internal: u8 }
//!     impl Filter { fn email(&self) -> &str { &self.email } }
//!
//!     #[get("/users")]
//!     async fn list(#[parameter_object] filter: Query<Filter>) {}
//! "#);
//! let registry = ReplacementRegistry::from_config(&ExpanderConfig::default());
//! let expander = ParameterExpander::new(&registry, &index);
//!
//! let params = SourceParameter::from_fn(&index.functions()[1]);
//! let exploded = expander.expand(None, &params);
//! assert_eq!(exploded.len(), 1);
//! assert_eq!(exploded[0].parameter_name(), Some("email"));
//! assert!(exploded[0].is_nullable());
//! ```

use crate::config::ExpanderConfig;
use crate::discovery::ParameterNameDiscoverer;
use crate::error::AppResult;
use crate::introspect::{PropertyDescriptor, TypeIntrospector};
use crate::metadata::{AnnotatedElement, Annotation, Executable, MethodParameter, SourceParameter};
use crate::parser::attributes::required_flag;
use crate::parser::models::{ParsedField, ParsedFn};
use crate::replacement::TypeReplacer;
use crate::types::TypeRef;
use std::borrow::Cow;
use tracing::{debug, warn};

/// A parameter with an overridden display name and extra annotations.
///
/// Every structural query is answered by the wrapped handle. The handle is
/// borrowed when it comes from the caller and owned when synthesized from a
/// getter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DelegatingParameter<'a> {
    delegate: Cow<'a, SourceParameter>,
    additional_annotations: Vec<Annotation>,
    parameter_name: Option<String>,
}

impl<'a> DelegatingParameter<'a> {
    /// Wraps `delegate`, overriding its name and appending `additional_annotations`.
    pub fn new(
        delegate: Cow<'a, SourceParameter>,
        parameter_name: Option<String>,
        additional_annotations: Vec<Annotation>,
    ) -> Self {
        Self {
            delegate,
            additional_annotations,
            parameter_name,
        }
    }

    /// The wrapped handle.
    pub fn delegate(&self) -> &SourceParameter {
        &self.delegate
    }

    /// Annotations added on top of the wrapped handle's.
    pub fn additional_annotations(&self) -> &[Annotation] {
        &self.additional_annotations
    }

    /// Detaches from the caller's parameter list.
    pub fn into_owned(self) -> DelegatingParameter<'static> {
        DelegatingParameter {
            delegate: Cow::Owned(self.delegate.into_owned()),
            additional_annotations: self.additional_annotations,
            parameter_name: self.parameter_name,
        }
    }
}

impl MethodParameter for DelegatingParameter<'_> {
    fn parameter_index(&self) -> Option<usize> {
        self.delegate.parameter_index()
    }

    fn parameter_name(&self) -> Option<&str> {
        self.parameter_name
            .as_deref()
            .or_else(|| self.delegate.parameter_name())
    }

    fn parameter_annotations(&self) -> Cow<'_, [Annotation]> {
        if self.additional_annotations.is_empty() {
            return self.delegate.parameter_annotations();
        }
        let mut all = self.delegate.parameter_annotations().into_owned();
        all.extend(self.additional_annotations.iter().cloned());
        Cow::Owned(all)
    }

    fn executable(&self) -> &Executable {
        self.delegate.executable()
    }

    fn method(&self) -> Option<&Executable> {
        self.delegate.method()
    }

    fn constructor(&self) -> Option<&Executable> {
        self.delegate.constructor()
    }

    fn member(&self) -> &Executable {
        self.delegate.member()
    }

    fn annotated_element(&self) -> AnnotatedElement<'_> {
        self.delegate.annotated_element()
    }

    fn declaring_class(&self) -> Option<&str> {
        self.delegate.declaring_class()
    }

    fn containing_class(&self) -> Option<&str> {
        self.delegate.containing_class()
    }

    fn with_containing_class(&self, containing_class: &str) -> SourceParameter {
        self.delegate.with_containing_class(containing_class)
    }

    fn parameter_type(&self) -> &str {
        self.delegate.parameter_type()
    }

    fn generic_parameter_type(&self) -> &TypeRef {
        self.delegate.generic_parameter_type()
    }

    fn nesting_level(&self) -> usize {
        self.delegate.nesting_level()
    }

    fn nested_parameter_type(&self) -> &str {
        self.delegate.nested_parameter_type()
    }

    fn nested_generic_parameter_type(&self) -> &TypeRef {
        self.delegate.nested_generic_parameter_type()
    }
}

/// Expands parameter objects into per-property parameters.
pub struct ParameterExpander<'c> {
    replacer: &'c dyn TypeReplacer,
    introspector: &'c dyn TypeIntrospector,
    object_marker: String,
    doc_attribute: String,
}

impl<'c> ParameterExpander<'c> {
    /// Creates an expander with default marker and documentation attribute names.
    pub fn new(replacer: &'c dyn TypeReplacer, introspector: &'c dyn TypeIntrospector) -> Self {
        Self::with_config(replacer, introspector, &ExpanderConfig::default())
    }

    /// Creates an expander taking attribute names from `config`.
    pub fn with_config(
        replacer: &'c dyn TypeReplacer,
        introspector: &'c dyn TypeIntrospector,
        config: &ExpanderConfig,
    ) -> Self {
        Self {
            replacer,
            introspector,
            object_marker: config.object_marker.clone(),
            doc_attribute: config.doc_attribute.clone(),
        }
    }

    /// The argument attribute marking a parameter object.
    pub fn object_marker(&self) -> &str {
        &self.object_marker
    }

    /// Produces the documented parameters for one function.
    ///
    /// `names`, when given, overrides the display name of ordinary parameters
    /// by position; positions it does not cover fall back to the parameter's
    /// own name, which may be absent.
    pub fn expand<'a>(
        &self,
        names: Option<&[String]>,
        parameters: &'a [SourceParameter],
    ) -> Vec<DelegatingParameter<'a>> {
        let mut exploded = Vec::with_capacity(parameters.len());

        for (i, parameter) in parameters.iter().enumerate() {
            if parameter.has_parameter_annotation(&self.object_marker) {
                let object_type = self
                    .replacer
                    .replacement(parameter.generic_parameter_type());
                exploded.extend(self.explode_object(&object_type));
            } else {
                let name = names
                    .and_then(|names| names.get(i).cloned())
                    .or_else(|| parameter.parameter_name().map(str::to_string));
                exploded.push(DelegatingParameter::new(
                    Cow::Borrowed(parameter),
                    name,
                    Vec::new(),
                ));
            }
        }

        exploded
    }

    /// Discovers names for `function` and expands its arguments.
    pub fn expand_function(
        &self,
        function: &ParsedFn,
        discoverer: &dyn ParameterNameDiscoverer,
    ) -> Vec<DelegatingParameter<'static>> {
        let names = discoverer.parameter_names(function);
        let parameters = SourceParameter::from_fn(function);
        self.expand(names.as_deref(), &parameters)
            .into_iter()
            .map(DelegatingParameter::into_owned)
            .collect()
    }

    fn explode_object<'a>(&self, object_type: &TypeRef) -> Vec<DelegatingParameter<'a>> {
        let fields = match self.introspector.declared_fields(object_type) {
            Ok(fields) => fields,
            Err(e) => {
                warn!(ty = %object_type, error = %e, "parameter object not introspectable");
                return Vec::new();
            }
        };

        fields
            .iter()
            .filter_map(|field| self.from_getter_of_field(object_type, field))
            .collect()
    }

    /// The synthetic parameter for `field`, or `None` when it has no getter
    /// or the type cannot be introspected.
    fn from_getter_of_field<'a>(
        &self,
        object_type: &TypeRef,
        field: &ParsedField,
    ) -> Option<DelegatingParameter<'a>> {
        let properties = match self.introspector.property_descriptors(object_type) {
            Ok(properties) => properties,
            Err(e) => {
                warn!(ty = %object_type, field = %field.name, error = %e, "field omitted");
                return None;
            }
        };

        let Some(getter) = find_getter(&properties, &field.name) else {
            debug!(ty = %object_type, field = %field.name, "no getter, field omitted");
            return None;
        };
        let handle = SourceParameter::for_return_type(getter.clone())?;

        let mut annotations: Vec<Annotation> = field
            .attributes
            .iter()
            .cloned()
            .map(Annotation::from)
            .collect();
        match self.nullable_marker(field) {
            Ok(Some(marker)) => annotations.push(marker),
            Ok(None) => {}
            Err(e) => {
                warn!(ty = %object_type, field = %field.name, error = %e, "nullable marker unresolved");
            }
        }

        Some(DelegatingParameter::new(
            Cow::Owned(handle),
            Some(field.name.clone()),
            annotations,
        ))
    }

    /// `Annotation::Nullable` when the field's documentation attribute says
    /// `required = false`.
    fn nullable_marker(&self, field: &ParsedField) -> AppResult<Option<Annotation>> {
        let Some(doc) = field.attributes.iter().find(|a| a.is(&self.doc_attribute)) else {
            return Ok(None);
        };
        Ok(match required_flag(doc)? {
            Some(false) => Some(Annotation::Nullable),
            _ => None,
        })
    }
}

fn find_getter<'p>(properties: &'p [PropertyDescriptor], field: &str) -> Option<&'p Executable> {
    properties
        .iter()
        .filter(|p| p.name == field)
        .find_map(|p| p.read_method.as_ref())
}
