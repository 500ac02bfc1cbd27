//! `#[derive(SqlEnum)]`: map a fieldless enum to a stored name or discriminant.

use std::collections::HashSet;

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase,
};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

use crate::attrs;

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let variants = match &input.data {
        Data::Enum(e) => &e.variants,
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "SqlEnum can only be derived for enums",
            ));
        }
    };
    if variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input,
            "SqlEnum needs at least one variant",
        ));
    }

    let rename_all = attrs::parse(&input.attrs, &["rename_all"])?.rename_all;
    if let Some(style) = &rename_all {
        if rename_style(style, "").is_none() {
            return Err(syn::Error::new_spanned(
                &input.ident,
                format!("unsupported rename_all style `{style}`"),
            ));
        }
    }

    let mut seen = HashSet::new();
    let mut idents = Vec::new();
    let mut names = Vec::new();
    for variant in variants {
        if !matches!(&variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "SqlEnum variants must be unit variants (no fields)",
            ));
        }
        let ident = &variant.ident;
        let stored = match attrs::parse(&variant.attrs, &["rename"])?.rename {
            Some(rename) => rename,
            None => match &rename_all {
                Some(style) => rename_style(style, &ident.to_string()).unwrap_or_default(),
                None => ident.to_string(),
            },
        };
        if !seen.insert(stored.clone()) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("stored name `{stored}` is used by more than one variant"),
            ));
        }
        idents.push(ident);
        names.push(stored);
    }

    Ok(quote! {
        impl #impl_generics ::quarry::SqlEnum for #name #ty_generics #where_clause {
            const VARIANTS: &'static [&'static str] = &[#(#names),*];

            fn from_name(name: &str) -> ::std::option::Option<Self> {
                match name {
                    #(#names => ::std::option::Option::Some(Self::#idents),)*
                    _ => ::std::option::Option::None,
                }
            }

            fn from_discriminant(discriminant: i64) -> ::std::option::Option<Self> {
                #(
                    if discriminant == Self::#idents as i64 {
                        return ::std::option::Option::Some(Self::#idents);
                    }
                )*
                ::std::option::Option::None
            }

            fn name(&self) -> &'static str {
                match self {
                    #(Self::#idents => #names,)*
                }
            }
        }

        impl #impl_generics ::quarry::FieldType for #name #ty_generics #where_clause {
            const TAG: ::quarry::TypeTag = ::quarry::TypeTag::Enum;

            fn from_value(value: ::quarry::Value) -> ::std::result::Result<Self, ::std::string::String> {
                ::quarry::parse_enum(value)
            }

            fn to_value(&self) -> ::quarry::Value {
                ::quarry::Value::String(::quarry::SqlEnum::name(self).to_string())
            }
        }
    })
}

/// Apply a `rename_all` style; `None` for an unknown style.
fn rename_style(style: &str, ident: &str) -> Option<String> {
    let renamed = match style {
        "lowercase" => ident.to_lowercase(),
        "UPPERCASE" => ident.to_uppercase(),
        "snake_case" => ident.to_snake_case(),
        "SCREAMING_SNAKE_CASE" => ident.to_shouty_snake_case(),
        "camelCase" => ident.to_lower_camel_case(),
        "PascalCase" => ident.to_upper_camel_case(),
        "kebab-case" => ident.to_kebab_case(),
        _ => return None,
    };
    Some(renamed)
}
