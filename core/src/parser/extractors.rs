//! # Extraction Logic
//!
//! High-level functions to parse Rust code into IR models.

use crate::parser::attributes::{extract_attributes, extract_route};
use crate::parser::models::{
    ParsedField, ParsedFn, ParsedParam, ParsedStruct, PatternShape, ReceiverKind,
};
use crate::types::TypeRef;
use ra_ap_edition::Edition;
use ra_ap_syntax::ast::{self, HasName};
use ra_ap_syntax::{AstNode, SourceFile, SyntaxKind, SyntaxNode};

/// Everything the expander needs from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSource {
    /// Structs in source order.
    pub structs: Vec<ParsedStruct>,
    /// Free functions and `impl` functions in source order.
    pub functions: Vec<ParsedFn>,
}

/// Parses a source file into structs and functions.
///
/// Function declarations inside `trait` blocks and functions nested in
/// other function bodies are not collected.
///
/// # Examples
/// ```
/// use paramdoc_core::parser::parse_source;
///
/// let code = r#"
///     struct Filter {
///         /// Contact address.
///         #[param(required = false)]
///         email: Option<String>,
///     }
/// "#;
/// let source = parse_source(code);
/// let field = &source.structs[0].fields[0];
/// assert_eq!(field.name, "email");
/// assert_eq!(field.description.as_deref(), Some("Contact address."));
/// assert_eq!(field.attributes[0].path, "param");
/// ```
pub fn parse_source(code: &str) -> ParsedSource {
    let parse = SourceFile::parse(code, Edition::Edition2021);
    let file = parse.tree();
    let mut source = ParsedSource::default();

    for node in file.syntax().descendants() {
        if let Some(struct_def) = ast::Struct::cast(node.clone()) {
            if let Some(name) = struct_def.name() {
                source
                    .structs
                    .push(parse_struct_node(&struct_def, unraw(&name.text())));
            }
        } else if let Some(fn_def) = ast::Fn::cast(node) {
            if let Some(parsed) = parse_fn_node(&fn_def) {
                source.functions.push(parsed);
            }
        }
    }

    source
}

/// `r#type` and `type` name the same item.
fn unraw(name: &str) -> &str {
    name.strip_prefix("r#").unwrap_or(name)
}

fn parse_struct_node(struct_def: &ast::Struct, name: &str) -> ParsedStruct {
    let mut fields = Vec::new();

    if let Some(field_list) = struct_def.field_list() {
        match field_list {
            ast::FieldList::RecordFieldList(list) => {
                for field in list.fields() {
                    if let (Some(fname), Some(ty)) = (field.name(), field.ty()) {
                        fields.push(ParsedField {
                            name: unraw(&fname.text()).to_string(),
                            ty: TypeRef::from_ast(&ty),
                            description: extract_doc_comment(field.syntax()),
                            attributes: extract_attributes(field.syntax()),
                        });
                    }
                }
            }
            ast::FieldList::TupleFieldList(list) => {
                for (i, field) in list.fields().enumerate() {
                    if let Some(ty) = field.ty() {
                        fields.push(ParsedField {
                            name: i.to_string(),
                            ty: TypeRef::from_ast(&ty),
                            description: extract_doc_comment(field.syntax()),
                            attributes: extract_attributes(field.syntax()),
                        });
                    }
                }
            }
        }
    }

    ParsedStruct {
        name: name.to_string(),
        fields,
    }
}

fn parse_fn_node(fn_def: &ast::Fn) -> Option<ParsedFn> {
    let name = unraw(&fn_def.name()?.text()).to_string();

    // FN -> ASSOC_ITEM_LIST -> IMPL | TRAIT
    let container = fn_def.syntax().parent().and_then(|p| p.parent());
    let mut owner = None;
    let mut in_trait_impl = false;
    if let Some(container) = container {
        if ast::Trait::can_cast(container.kind()) {
            return None;
        }
        if let Some(impl_def) = ast::Impl::cast(container.clone()) {
            owner = impl_def
                .self_ty()
                .map(|ty| TypeRef::from_ast(&ty).name().to_string());
            in_trait_impl = impl_def.trait_().is_some();
        } else if container.ancestors().any(|n| ast::Fn::can_cast(n.kind())) {
            return None;
        }
    }

    let param_list = fn_def.param_list();
    let receiver = param_list
        .as_ref()
        .and_then(|list| list.self_param())
        .map(|self_param| match (self_param.amp_token(), self_param.mut_token()) {
            (Some(_), None) => ReceiverKind::Ref,
            (Some(_), Some(_)) => ReceiverKind::RefMut,
            (None, _) => ReceiverKind::Value,
        });

    let params = param_list
        .map(|list| {
            list.params()
                .enumerate()
                .filter_map(|(index, param)| {
                    let ty = param.ty()?;
                    Some(ParsedParam {
                        index,
                        shape: param
                            .pat()
                            .as_ref()
                            .map(pattern_shape)
                            .unwrap_or(PatternShape::Other),
                        ty: TypeRef::from_ast(&ty),
                        attributes: extract_attributes(param.syntax()),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let route = extract_route(&extract_attributes(fn_def.syntax()));

    Some(ParsedFn {
        name,
        owner,
        in_trait_impl,
        receiver,
        params,
        return_type: fn_def
            .ret_type()
            .and_then(|ret| ret.ty())
            .map(|ty| TypeRef::from_ast(&ty)),
        route,
        description: extract_doc_comment(fn_def.syntax()),
    })
}

fn pattern_shape(pat: &ast::Pat) -> PatternShape {
    match pat {
        ast::Pat::IdentPat(ident) => ident
            .name()
            .map(|n| PatternShape::Ident(unraw(&n.text()).to_string()))
            .unwrap_or(PatternShape::Other),
        ast::Pat::TupleStructPat(tuple) => {
            PatternShape::TupleStruct(tuple.fields().map(|p| pattern_shape(&p)).collect())
        }
        ast::Pat::WildcardPat(_) => PatternShape::Wildcard,
        _ => PatternShape::Other,
    }
}

/// Helper to extract `///` comments from a syntax node's trivia children.
fn extract_doc_comment(node: &SyntaxNode) -> Option<String> {
    let mut lines = Vec::new();

    for child in node.children_with_tokens() {
        if child.kind() == SyntaxKind::COMMENT {
            let text = child.to_string();
            if let Some(content) = text.strip_prefix("///") {
                lines.push(content.strip_prefix(' ').unwrap_or(content).to_owned());
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n").trim().to_string())
    }
}
