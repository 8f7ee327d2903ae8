#![deny(missing_docs)]

//! # Expander Configuration
//!
//! YAML-loadable settings for marker names, extractor envelopes and type
//! replacements. Every key is optional.
//!
//! ```yaml
//! object_marker: parameter_object
//! doc_attribute: param
//! envelopes: [Query, Form, web::Query]
//! replacements:
//!   LegacyFilter: UserFilter
//! ```

use crate::error::AppResult;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default generic wrappers unwrapped before field enumeration.
pub const DEFAULT_ENVELOPES: &[&str] = &[
    "Query",
    "Form",
    "Path",
    "Json",
    "Data",
    "Option",
    "Box",
    "Arc",
    "Rc",
];

/// Settings for one documentation pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpanderConfig {
    /// Argument attribute marking a parameter object.
    pub object_marker: String,
    /// Field attribute carrying documentation flags such as `required`.
    pub doc_attribute: String,
    /// Wrapper types (by name or path) to see through.
    pub envelopes: Vec<String>,
    /// Explicit type substitutions keyed by type name or raw type text.
    pub replacements: IndexMap<String, String>,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            object_marker: "parameter_object".to_string(),
            doc_attribute: "param".to_string(),
            envelopes: DEFAULT_ENVELOPES.iter().map(|s| s.to_string()).collect(),
            replacements: IndexMap::new(),
        }
    }
}

impl ExpanderConfig {
    /// Parses YAML; missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ExpanderConfig::default();
        assert_eq!(config.object_marker, "parameter_object");
        assert_eq!(config.doc_attribute, "param");
        assert!(config.envelopes.iter().any(|e| e == "Query"));
        assert!(config.replacements.is_empty());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ExpanderConfig::from_yaml_str(
            r#"
doc_attribute: oai
replacements:
  LegacyFilter: UserFilter
  "Page<Legacy>": Page<User>
"#,
        )
        .unwrap();
        assert_eq!(config.object_marker, "parameter_object");
        assert_eq!(config.doc_attribute, "oai");
        let keys: Vec<_> = config.replacements.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["LegacyFilter", "Page<Legacy>"]);
        assert_eq!(config.envelopes, ExpanderConfig::default().envelopes);
    }

    #[test]
    fn test_empty_yaml() {
        assert_eq!(
            ExpanderConfig::from_yaml_str("  \n").unwrap(),
            ExpanderConfig::default()
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ExpanderConfig::from_yaml_str("marker: x").unwrap_err();
        assert!(matches!(err, AppError::Yaml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "envelopes: [Query]").unwrap();
        let config = ExpanderConfig::load(file.path()).unwrap();
        assert_eq!(config.envelopes, vec!["Query".to_string()]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ExpanderConfig::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
