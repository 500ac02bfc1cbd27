//! `#[orm(...)]` attribute parsing.

use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, Lit, Meta, Result, Token};

/// Keys found in the `#[orm(...)]` attributes of one item.
#[derive(Debug, Default)]
pub struct OrmAttrs {
    pub column: Option<String>,
    pub rename: Option<String>,
    pub rename_all: Option<String>,
    pub skip: bool,
}

/// Parse every `#[orm(...)]` on `attrs`, accepting only the keys in `allowed`.
pub fn parse(attrs: &[Attribute], allowed: &[&str]) -> Result<OrmAttrs> {
    let mut out = OrmAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let nested = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        for meta in &nested {
            let key = meta
                .path()
                .get_ident()
                .map(ToString::to_string)
                .unwrap_or_default();
            if !allowed.contains(&key.as_str()) {
                return Err(syn::Error::new_spanned(
                    meta.path(),
                    format!("unknown orm attribute, expected one of: {}", allowed.join(", ")),
                ));
            }
            match meta {
                Meta::Path(_) if key == "skip" => out.skip = true,
                Meta::NameValue(nv) => {
                    let value = string_value(&nv.value)?;
                    match key.as_str() {
                        "column" => out.column = Some(value),
                        "rename" => out.rename = Some(value),
                        "rename_all" => out.rename_all = Some(value),
                        _ => return Err(syn::Error::new_spanned(meta, "expected a flag, not a value")),
                    }
                }
                _ => {
                    return Err(syn::Error::new_spanned(
                        meta,
                        format!("expected `{key} = \"...\"`"),
                    ));
                }
            }
        }
    }
    Ok(out)
}

fn string_value(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}
