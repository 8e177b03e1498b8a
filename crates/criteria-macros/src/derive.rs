//! Implementation of `#[derive(Record)]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use crate::attrs::{parse_record_attrs, FieldKind};

pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut field_arms: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_record_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(kind) = attrs.kind else {
            continue;
        };

        let query_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));

        field_constants.push(quote! {
            /// Field name for criteria queries.
            pub const #const_name: &'static str = #query_name;
        });

        let value_expr = match kind {
            FieldKind::String => {
                quote! { ::criteria::Value::String(::core::convert::AsRef::<str>::as_ref(&self.#field_name)) }
            }
            FieldKind::Number => {
                quote! { ::criteria::Value::Number(::criteria::Number::from(self.#field_name)) }
            }
            FieldKind::Timestamp => {
                quote! {
                    ::criteria::Value::Timestamp(
                        ::criteria::RecordTimestamp::timestamp(&self.#field_name)
                    )
                }
            }
            FieldKind::Enum => {
                quote! {
                    ::criteria::Value::Enum(
                        ::criteria::RecordEnum::discriminant(&self.#field_name)
                    )
                }
            }
            FieldKind::Bool => {
                quote! { ::criteria::Value::Bool(self.#field_name) }
            }
        };

        field_arms.push(quote! {
            #query_name => #value_expr,
        });
    }

    Ok(quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::criteria::Record for #struct_name #ty_generics #where_clause {
            fn get(&self, field: &str) -> ::criteria::Value<'_> {
                match field {
                    #(#field_arms)*
                    _ => ::criteria::Value::None,
                }
            }
        }
    })
}

/// Convert a field name to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("name"), "NAME");
        assert_eq!(to_screaming_snake_case("created_at"), "CREATED_AT");
        assert_eq!(to_screaming_snake_case("createdAt"), "CREATED_AT");
        assert_eq!(to_screaming_snake_case("full-name"), "FULL_NAME");
    }

    #[test]
    fn rejects_tuple_structs() {
        let input: DeriveInput = syn::parse_str("struct Pair(u8, u8);").unwrap();
        let err = record_derive_impl(input).unwrap_err();
        assert!(err.to_string().contains("named fields"));
    }

    #[test]
    fn rejects_enums() {
        let input: DeriveInput = syn::parse_str("enum Status { A, B }").unwrap();
        let err = record_derive_impl(input).unwrap_err();
        assert!(err.to_string().contains("only be derived for structs"));
    }

    #[test]
    fn generates_arms_for_annotated_fields_only() {
        let input: DeriveInput = syn::parse_str(
            r#"
            struct Person {
                #[record(String)]
                name: String,
                #[record(Number, rename = "years")]
                age: u8,
                #[record(skip)]
                id: u64,
                note: String,
            }
            "#,
        )
        .unwrap();

        let tokens = record_derive_impl(input).unwrap().to_string();
        assert!(tokens.contains("\"name\""));
        assert!(tokens.contains("\"years\""));
        assert!(tokens.contains("YEARS"));
        assert!(!tokens.contains("\"id\""));
        assert!(!tokens.contains("\"note\""));
    }
}
