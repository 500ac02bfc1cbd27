//! Mappable derive macro implementation

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

use crate::attrs;
use crate::common::syn_types::is_reference;

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Mappable can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Mappable can only be derived for structs",
            ));
        }
    };

    let mut seen = HashSet::new();
    let mut properties = Vec::new();
    for field in fields {
        let attrs = attrs::parse(&field.attrs, &["column", "skip"])?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;
        if is_reference(ty) {
            return Err(syn::Error::new_spanned(
                ty,
                "Mappable fields must own their data; use #[orm(skip)] to leave this field out",
            ));
        }

        let property = attrs.column.unwrap_or_else(|| ident.to_string());
        if !seen.insert(property.to_lowercase()) {
            return Err(syn::Error::new_spanned(
                field,
                format!("property name `{property}` is used more than once (names are case-insensitive)"),
            ));
        }

        properties.push(quote! {
            ::quarry::PropertyDef {
                name: #property,
                tag: <#ty as ::quarry::FieldType>::TAG,
                nullable: <#ty as ::quarry::FieldType>::NULLABLE,
                type_id: ::std::any::TypeId::of::<#ty>,
                type_name: ::std::any::type_name::<#ty>,
                get: |row: &Self| ::quarry::FieldType::to_value(&row.#ident),
                set: |row: &mut Self, value: ::quarry::Value| {
                    row.#ident = <#ty as ::quarry::FieldType>::from_value(value)?;
                    ::std::result::Result::Ok(())
                },
            }
        });
    }

    Ok(quote! {
        impl #impl_generics ::quarry::Mappable for #name #ty_generics #where_clause {
            fn properties() -> ::std::vec::Vec<::quarry::PropertyDef<Self>> {
                ::std::vec![#(#properties),*]
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn emits_one_property_per_field() {
        let input: DeriveInput = parse_quote! {
            struct User {
                id: i32,
                #[orm(column = "UserName")]
                name: String,
                email: Option<String>,
                #[orm(skip)]
                cached: Vec<String>,
            }
        };
        let out = expand(input).unwrap().to_string();
        assert!(out.contains("impl :: quarry :: Mappable for User"));
        assert!(out.contains("name : \"id\""));
        assert!(out.contains("name : \"UserName\""));
        assert!(out.contains("name : \"email\""));
        assert!(out.contains("TypeId :: of :: < Option < String >"));
        assert!(!out.contains("cached"));
    }

    #[test]
    fn rejects_tuple_structs_and_enums() {
        let input: DeriveInput = parse_quote! { struct Pair(i32, i32); };
        assert!(expand(input).is_err());

        let input: DeriveInput = parse_quote! { enum E { A } };
        assert!(expand(input).is_err());
    }

    #[test]
    fn rejects_case_insensitive_duplicates() {
        let input: DeriveInput = parse_quote! {
            struct User {
                name: String,
                #[orm(column = "NAME")]
                display: String,
            }
        };
        let err = expand(input).unwrap_err().to_string();
        assert!(err.contains("more than once"));
    }

    #[test]
    fn rejects_borrowed_fields() {
        let input: DeriveInput = parse_quote! {
            struct User {
                name: &'static str,
            }
        };
        assert!(expand(input).is_err());
    }
}
