//! Parsing of `#[record(...)]` field attributes.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Lit, Meta, Result, Token,
};

const EXPECTED_KINDS: &str = "String, Number, Timestamp, Enum, Bool";

/// How a field is exposed as a `criteria::Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Timestamp,
    Enum,
    Bool,
}

impl FieldKind {
    /// Parses a kind name. Accepts the capitalized and lowercase spellings, so
    /// keywords like `enum` can be written through `ty = "enum"`.
    pub fn parse(name: &str, span: Span) -> Result<Self> {
        match name {
            "String" | "string" => Ok(FieldKind::String),
            "Number" | "number" => Ok(FieldKind::Number),
            "Timestamp" | "timestamp" => Ok(FieldKind::Timestamp),
            "Enum" | "enum" | "enumeration" => Ok(FieldKind::Enum),
            "Bool" | "bool" | "boolean" => Ok(FieldKind::Bool),
            other => Err(Error::new(
                span,
                format!(
                    "unknown record field kind: '{}'. Expected one of: {}",
                    other, EXPECTED_KINDS
                ),
            )),
        }
    }
}

/// Field-level attributes from `#[record(...)]`.
#[derive(Debug, Clone, Default)]
pub struct RecordAttr {
    pub kind: Option<FieldKind>,
    pub skip: bool,
    /// Query field name, defaults to the Rust field name.
    pub rename: Option<String>,
}

fn string_value(expr: &Expr, what: &str) -> Result<(String, Span)> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok((s.value(), s.span())),
        _ => Err(Error::new(
            expr.span(),
            format!("{} must be a string literal", what),
        )),
    }
}

impl Parse for RecordAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = RecordAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                // record(String), record(skip), ...
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::Path(p) => {
                    let ident = p.get_ident().ok_or_else(|| {
                        Error::new(
                            p.span(),
                            format!("expected a field kind ({}) or skip", EXPECTED_KINDS),
                        )
                    })?;
                    attr.kind = Some(FieldKind::parse(&ident.to_string(), ident.span())?);
                }

                // rename = "name", ty = "enum"
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    attr.rename = Some(string_value(&nv.value, "rename")?.0);
                }
                Meta::NameValue(nv) if nv.path.is_ident("ty") => {
                    let (name, span) = string_value(&nv.value, "ty")?;
                    attr.kind = Some(FieldKind::parse(&name, span)?);
                }
                Meta::NameValue(nv) => {
                    return Err(Error::new(
                        nv.path.span(),
                        "unknown attribute. Expected: rename or ty",
                    ));
                }

                Meta::List(_) => {
                    return Err(Error::new(
                        meta.span(),
                        "unexpected nested list in record attribute",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extracts `#[record(...)]` from a field's attributes.
pub fn parse_record_attrs(attrs: &[Attribute]) -> Result<RecordAttr> {
    match attrs.iter().find(|attr| attr.path().is_ident("record")) {
        Some(attr) => attr.parse_args::<RecordAttr>(),
        None => Ok(RecordAttr::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_record(tokens: &str) -> Result<RecordAttr> {
        syn::parse_str::<RecordAttr>(tokens)
    }

    #[test]
    fn kind_idents() {
        assert_eq!(parse_record("String").unwrap().kind, Some(FieldKind::String));
        assert_eq!(parse_record("number").unwrap().kind, Some(FieldKind::Number));
        assert_eq!(
            parse_record("Timestamp").unwrap().kind,
            Some(FieldKind::Timestamp)
        );
        assert_eq!(parse_record("Enum").unwrap().kind, Some(FieldKind::Enum));
        assert_eq!(parse_record("boolean").unwrap().kind, Some(FieldKind::Bool));
    }

    #[test]
    fn kind_via_ty_for_keywords() {
        let attr = parse_record(r#"ty = "enum""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Enum));

        let attr = parse_record(r#"ty = "bool""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Bool));
    }

    #[test]
    fn skip() {
        let attr = parse_record("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.kind, None);
    }

    #[test]
    fn rename_with_kind() {
        let attr = parse_record(r#"String, rename = "full_name""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::String));
        assert_eq!(attr.rename.as_deref(), Some("full_name"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = parse_record("Decimal").unwrap_err();
        assert!(err.to_string().contains("unknown record field kind"));
    }

    #[test]
    fn rename_requires_string_literal() {
        let err = parse_record("rename = 5").unwrap_err();
        assert!(err.to_string().contains("rename must be a string literal"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = parse_record(r#"alias = "x""#).unwrap_err();
        assert!(err.to_string().contains("Expected: rename or ty"));
    }
}
