//! # Attribute Operations
//!
//! internal logic for collecting outer attributes and reading the few
//! keys the expander cares about (`required`, route paths).

use crate::error::{AppError, AppResult};
use crate::parser::models::{ParsedAttribute, ParsedRoute};
use ra_ap_edition::Edition;
use ra_ap_syntax::ast::{self};
use ra_ap_syntax::{AstNode, SourceFile, SyntaxElement, SyntaxKind, SyntaxNode};
use regex::Regex;
use std::sync::OnceLock;

/// actix-web route macros.
pub const ROUTE_ATTRIBUTES: &[&str] = &[
    "get", "post", "put", "delete", "patch", "head", "options", "trace", "route",
];

/// Collects the outer attributes attached directly to a node.
pub fn extract_attributes(node: &SyntaxNode) -> Vec<ParsedAttribute> {
    // Use generic casting iterator manually to work on SyntaxNode directly
    node.children()
        .filter_map(ast::Attr::cast)
        .filter_map(|attr| {
            let meta = attr.meta()?;
            let path = meta.path()?.to_string();
            let args = meta.token_tree().map(|tt| tt.to_string());
            Some(ParsedAttribute { path, args })
        })
        .collect()
}

/// Reads the `required` flag of a documentation attribute.
///
/// Only top-level `key = value` entries count, so text inside string
/// literals or nested groups is never taken for the key.
///
/// * `Ok(Some(flag))` for `required = true|false`, or bare `required`.
/// * `Ok(None)` when the key is absent.
/// * `Err` when a value is present but is not a boolean literal.
pub fn required_flag(attr: &ParsedAttribute) -> AppResult<Option<bool>> {
    let Some(content) = attr.args.as_deref() else {
        return Ok(None);
    };

    for entry in top_level_entries(content) {
        let Some(key) = entry.first() else {
            continue;
        };
        if key.as_token().map(|t| t.text()) != Some("required") {
            continue;
        }
        return match &entry[1..] {
            [] => Ok(Some(true)),
            [eq, value] if eq.kind() == SyntaxKind::EQ => {
                match value.as_token().map(|t| t.text()) {
                    Some("true") => Ok(Some(true)),
                    Some("false") => Ok(Some(false)),
                    _ => Err(non_boolean(attr, value.to_string())),
                }
            }
            rest => Err(non_boolean(
                attr,
                rest.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "),
            )),
        };
    }

    Ok(None)
}

fn non_boolean(attr: &ParsedAttribute, value: String) -> AppError {
    AppError::Introspection(format!(
        "`{}` has a non-boolean `required` value: {}",
        attr, value
    ))
}

/// Splits an attribute token tree such as `(a = 1, b)` into its comma
/// separated entries, without trivia or the outer delimiters.
fn top_level_entries(args: &str) -> Vec<Vec<SyntaxElement>> {
    // Re-parse inside a dummy item to get the token tree back
    let code = format!("#[_attr{}] struct _Wrapper;", args);
    let parse = SourceFile::parse(&code, Edition::Edition2021);
    let Some(tree) = parse
        .tree()
        .syntax()
        .descendants()
        .find_map(ast::TokenTree::cast)
    else {
        return Vec::new();
    };

    let elements: Vec<SyntaxElement> = tree
        .syntax()
        .children_with_tokens()
        .filter(|el| !el.kind().is_trivia())
        .collect();
    let inner = match elements.as_slice() {
        [_, inner @ .., _] => inner,
        _ => return Vec::new(),
    };

    inner
        .split(|el| el.kind() == SyntaxKind::COMMA)
        .filter(|entry| !entry.is_empty())
        .map(<[SyntaxElement]>::to_vec)
        .collect()
}

/// Finds an actix-style route attribute.
pub fn extract_route(attrs: &[ParsedAttribute]) -> Option<ParsedRoute> {
    static PATH_RE: OnceLock<Regex> = OnceLock::new();
    let path_re = PATH_RE.get_or_init(|| Regex::new(r#"^\(\s*"([^"]*)""#).expect("Invalid regex"));

    static METHOD_RE: OnceLock<Regex> = OnceLock::new();
    let method_re =
        METHOD_RE.get_or_init(|| Regex::new(r#"method\s*=\s*"(\w+)""#).expect("Invalid regex"));

    let attr = attrs
        .iter()
        .find(|a| ROUTE_ATTRIBUTES.contains(&a.name()))?;
    let args = attr.args.as_deref().unwrap_or_default();

    let path = path_re
        .captures(args)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let method = if attr.name() == "route" {
        method_re
            .captures(args)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_else(|| "route".to_string())
    } else {
        attr.name().to_string()
    };

    Some(ParsedRoute { method, path })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_first_struct(code: &str) -> ast::Struct {
        let parse = SourceFile::parse(code, Edition::Edition2021);
        let file = parse.tree();
        file.syntax()
            .descendants()
            .find_map(ast::Struct::cast)
            .expect("struct missing")
    }

    fn first_field(s: &ast::Struct) -> ast::RecordField {
        s.field_list()
            .and_then(|list| match list {
                ast::FieldList::RecordFieldList(list) => list.fields().next(),
                _ => None,
            })
            .expect("field missing")
    }

    #[test]
    fn test_extract_field_attributes_in_order() {
        let code = r#"
            struct Filter {
                #[serde(rename = "q")]
                #[param(required = false)]
                query: String,
            }
        "#;
        let s = parse_first_struct(code);
        let attrs = extract_attributes(first_field(&s).syntax());
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].path, "serde");
        assert_eq!(attrs[1].path, "param");
        assert_eq!(attrs[1].args.as_deref(), Some("(required = false)"));
    }

    #[test]
    fn test_extract_path_only_attribute() {
        let code = r#"
            #[non_exhaustive]
            struct Marker {}
        "#;
        let s = parse_first_struct(code);
        let attrs = extract_attributes(s.syntax());
        assert_eq!(attrs, vec![ParsedAttribute::new("non_exhaustive", None)]);
    }

    #[test]
    fn test_required_flag_values() {
        let explicit_false = ParsedAttribute::new("param", Some("(required = false)"));
        assert_eq!(required_flag(&explicit_false).unwrap(), Some(false));

        let explicit_true = ParsedAttribute::new("param", Some("(description = \"x\", required=true)"));
        assert_eq!(required_flag(&explicit_true).unwrap(), Some(true));

        let bare = ParsedAttribute::new("param", Some("(required)"));
        assert_eq!(required_flag(&bare).unwrap(), Some(true));

        let absent = ParsedAttribute::new("param", Some("(description = \"x\")"));
        assert_eq!(required_flag(&absent).unwrap(), None);

        let no_args = ParsedAttribute::new("param", None);
        assert_eq!(required_flag(&no_args).unwrap(), None);
    }

    #[test]
    fn test_required_flag_rejects_non_boolean() {
        let attr = ParsedAttribute::new("param", Some("(required = maybe)"));
        assert!(matches!(
            required_flag(&attr),
            Err(AppError::Introspection(_))
        ));

        let quoted = ParsedAttribute::new("param", Some("(required = \"false\")"));
        assert!(required_flag(&quoted).is_err());
    }

    #[test]
    fn test_required_flag_ignores_string_literals() {
        let shadowed = ParsedAttribute::new(
            "param",
            Some("(description = \"set required = false to skip\", required = true)"),
        );
        assert_eq!(required_flag(&shadowed).unwrap(), Some(true));

        let only_text = ParsedAttribute::new("param", Some("(description = \"required=false\")"));
        assert_eq!(required_flag(&only_text).unwrap(), None);

        let example = ParsedAttribute::new("param", Some("(example = \"required\")"));
        assert_eq!(required_flag(&example).unwrap(), None);
    }

    #[test]
    fn test_required_flag_ignores_nested_groups() {
        let nested = ParsedAttribute::new("param", Some("(schema(required = false))"));
        assert_eq!(required_flag(&nested).unwrap(), None);

        let trailing = ParsedAttribute::new("param", Some("(required = false,)"));
        assert_eq!(required_flag(&trailing).unwrap(), Some(false));
    }

    #[test]
    fn test_extract_route_variants() {
        let get = vec![ParsedAttribute::new("get", Some("(\"/users/{id}\")"))];
        let route = extract_route(&get).unwrap();
        assert_eq!(route.method, "get");
        assert_eq!(route.path.as_deref(), Some("/users/{id}"));

        let qualified = vec![ParsedAttribute::new("actix_web::post", Some("(\"/users\")"))];
        assert_eq!(extract_route(&qualified).unwrap().method, "post");

        let generic = vec![ParsedAttribute::new(
            "route",
            Some("(\"/ping\", method = \"HEAD\")"),
        )];
        let route = extract_route(&generic).unwrap();
        assert_eq!(route.method, "head");
        assert_eq!(route.path.as_deref(), Some("/ping"));

        let none = vec![ParsedAttribute::new("inline", None)];
        assert!(extract_route(&none).is_none());
    }
}
