#![deny(missing_docs)]

//! # Expansion Reports
//!
//! A serializable view of the exploded parameters of each handler, rendered
//! as JSON or YAML for the downstream schema stage or for inspection.

use crate::config::ExpanderConfig;
use crate::discovery::PatternNameDiscoverer;
use crate::error::AppResult;
use crate::expander::ParameterExpander;
use crate::introspect::SourceIndex;
use crate::metadata::MethodParameter;
use crate::parser::models::ParsedFn;
use crate::replacement::ReplacementRegistry;
use serde::Serialize;

/// One documented parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterReport {
    /// Display name; absent when it could not be resolved.
    pub name: Option<String>,
    /// The parameter type as written.
    #[serde(rename = "type")]
    pub ty: String,
    /// Argument position, absent for getter-derived parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// The function the metadata was read from.
    pub source: String,
    /// Annotations in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
    /// Whether the nullable marker is present.
    pub nullable: bool,
    /// Doc comment of the field a getter-derived parameter comes from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterReport {
    /// Snapshot of a parameter.
    pub fn from_parameter(parameter: &dyn MethodParameter) -> Self {
        let annotations = parameter.parameter_annotations();
        Self {
            name: parameter.parameter_name().map(str::to_string),
            ty: parameter.generic_parameter_type().raw().to_string(),
            index: parameter.parameter_index(),
            source: parameter.executable().qualified_name(),
            annotations: annotations.iter().map(ToString::to_string).collect(),
            nullable: parameter.is_nullable(),
            description: None,
        }
    }

    /// Attaches a description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// The exploded parameters of one handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerReport {
    /// `Owner::name` or `name`.
    pub handler: String,
    /// HTTP method from the route attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Route path from the route attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// The handler's doc comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Documented parameters in order.
    pub parameters: Vec<ParameterReport>,
}

/// Output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

/// Expands every handler in `index` (or only those named in `only`).
///
/// Names in `only` match either the bare function name or `Owner::name`.
pub fn document_handlers(
    index: &SourceIndex,
    config: &ExpanderConfig,
    only: &[String],
) -> Vec<HandlerReport> {
    let registry = ReplacementRegistry::from_config(config);
    let expander = ParameterExpander::with_config(&registry, index, config);

    index
        .handlers(expander.object_marker())
        .filter(|f| only.is_empty() || only.iter().any(|n| *n == f.name || *n == f.qualified_name()))
        .map(|function| document_handler(&expander, index, function))
        .collect()
}

/// Expands a single handler. Field doc comments are looked up in `index`.
pub fn document_handler(
    expander: &ParameterExpander<'_>,
    index: &SourceIndex,
    function: &ParsedFn,
) -> HandlerReport {
    let parameters = expander
        .expand_function(function, &PatternNameDiscoverer)
        .iter()
        .map(|p| {
            ParameterReport::from_parameter(p).with_description(field_description(index, p))
        })
        .collect();

    HandlerReport {
        handler: function.qualified_name(),
        method: function.route.as_ref().map(|r| r.method.clone()),
        path: function.route.as_ref().and_then(|r| r.path.clone()),
        description: function.description.clone(),
        parameters,
    }
}

/// Doc comment of the field behind a getter-derived parameter.
fn field_description(index: &SourceIndex, parameter: &dyn MethodParameter) -> Option<String> {
    if parameter.parameter_index().is_some() {
        return None;
    }
    let owner = parameter.executable().owner.as_deref()?;
    let name = parameter.parameter_name()?;
    index
        .struct_by_name(owner)?
        .fields
        .iter()
        .find(|field| field.name == name)?
        .description
        .clone()
}

/// Serializes reports.
pub fn render(reports: &[HandlerReport], format: OutputFormat) -> AppResult<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(reports)?,
        OutputFormat::Yaml => serde_yaml::to_string(reports)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const CODE: &str = r#"
        struct Filter {
            /// Contact address.
            #[param(required = false)]
            email: Option<String>,
            internal: u64,
        }
        impl Filter {
            fn email(&self) -> Option<&str> { self.email.as_deref() }
        }

        struct Users;
        impl Users {
            #[get("/users/{id}")]
            async fn show(&self, Path(id): Path<u32>, #[parameter_object] f: Query<Filter>) {}
        }

        /// Liveness check.
        #[post("/ping")]
        async fn ping() {}
    "#;

    #[test]
    fn test_document_all_handlers() {
        let index = SourceIndex::parse(CODE);
        let reports = document_handlers(&index, &ExpanderConfig::default(), &[]);
        assert_eq!(reports.len(), 2);

        let show = &reports[0];
        assert_eq!(show.handler, "Users::show");
        assert_eq!(show.method.as_deref(), Some("get"));
        assert_eq!(show.path.as_deref(), Some("/users/{id}"));
        assert_eq!(show.description, None);
        assert_eq!(
            show.parameters,
            vec![
                ParameterReport {
                    name: Some("id".into()),
                    ty: "Path<u32>".into(),
                    index: Some(0),
                    source: "Users::show".into(),
                    annotations: vec![],
                    nullable: false,
                    description: None,
                },
                ParameterReport {
                    name: Some("email".into()),
                    ty: "Option<&str>".into(),
                    index: None,
                    source: "Filter::email".into(),
                    annotations: vec!["#[param(required = false)]".into(), "nullable".into()],
                    nullable: true,
                    description: Some("Contact address.".into()),
                },
            ]
        );

        assert_eq!(reports[1].handler, "ping");
        assert_eq!(reports[1].description.as_deref(), Some("Liveness check."));
        assert!(reports[1].parameters.is_empty());
    }

    #[test]
    fn test_filter_by_name() {
        let index = SourceIndex::parse(CODE);
        let only = vec!["Users::show".to_string()];
        let reports = document_handlers(&index, &ExpanderConfig::default(), &only);
        assert_eq!(reports.len(), 1);

        let only = vec!["ping".to_string()];
        let reports = document_handlers(&index, &ExpanderConfig::default(), &only);
        assert_eq!(reports[0].handler, "ping");
    }

    #[test]
    fn test_render_json() {
        let index = SourceIndex::parse(CODE);
        let only = vec!["ping".to_string()];
        let reports = document_handlers(&index, &ExpanderConfig::default(), &only);
        let rendered = render(&reports, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            value,
            json!([{
                "handler": "ping",
                "method": "post",
                "path": "/ping",
                "description": "Liveness check.",
                "parameters": []
            }])
        );
    }

    #[test]
    fn test_render_yaml() {
        let reports = vec![HandlerReport {
            handler: "h".into(),
            method: None,
            path: None,
            description: None,
            parameters: vec![ParameterReport {
                name: None,
                ty: "u8".into(),
                index: Some(0),
                source: "h".into(),
                annotations: vec![],
                nullable: false,
                description: None,
            }],
        }];
        let rendered = render(&reports, OutputFormat::Yaml).unwrap();
        assert!(rendered.contains("handler: h"));
        assert!(rendered.contains("name: null"));
        assert!(rendered.contains("type: u8"));
        assert!(!rendered.contains("annotations"));
        assert!(!rendered.contains("description"));
    }

    #[test]
    fn test_nullable_matches_annotation_set() {
        use crate::expander::DelegatingParameter;
        use crate::metadata::{Annotation, SourceParameter};
        use std::borrow::Cow;

        let index = SourceIndex::parse("fn h(id: u32) {}");
        let params = SourceParameter::from_fn(&index.functions()[0]);
        assert!(!params[0].is_nullable());
        assert!(!ParameterReport::from_parameter(&params[0]).nullable);

        let marked = DelegatingParameter::new(
            Cow::Borrowed(&params[0]),
            None,
            vec![Annotation::Nullable],
        );
        assert!(marked.is_nullable());
        assert!(ParameterReport::from_parameter(&marked).nullable);

        let plain = DelegatingParameter::new(Cow::Borrowed(&params[0]), None, vec![]);
        assert_eq!(
            ParameterReport::from_parameter(&plain).nullable,
            plain.is_nullable()
        );
    }

    #[test]
    fn test_description_only_for_getter_parameters() {
        let code = r#"
            struct Filter {
                /// Shared name.
                id: u32,
            }
            impl Filter { fn id(&self) -> u32 { self.id } }
            fn h(id: u32, #[parameter_object] f: Filter) {}
        "#;
        let index = SourceIndex::parse(code);
        let reports = document_handlers(&index, &ExpanderConfig::default(), &[]);
        let parameters = &reports[0].parameters;
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0].description, None);
        assert_eq!(parameters[1].description.as_deref(), Some("Shared name."));
    }
}
