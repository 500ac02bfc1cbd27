//! Derive macros for quarry
//!
//! Provides `#[derive(Mappable)]` and `#[derive(SqlEnum)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod common;
mod mappable;
mod sql_enum;

/// Derive the `Mappable` accessor table for a struct.
///
/// # Example
///
/// ```ignore
/// use quarry::Mappable;
///
/// #[derive(Debug, Default, Mappable)]
/// struct User {
///     id: i32,
///     #[orm(column = "UserName")]
///     name: String,
///     email: Option<String>,
///     #[orm(skip)]
///     cached: Vec<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Property name used for column matching
/// - `#[orm(skip)]` - Leave the field out of the schema
///
/// Every other field type must implement `quarry::FieldType`. A field whose
/// type does not is a compile error rather than being left out silently;
/// mark it `#[orm(skip)]` to exclude it. Borrowed fields are rejected the
/// same way.
#[proc_macro_derive(Mappable, attributes(orm))]
pub fn derive_mappable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    mappable::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `SqlEnum` and `FieldType` for a fieldless enum.
///
/// Cells map by variant name (exact, then case-insensitive) or by
/// discriminant.
///
/// # Example
///
/// ```ignore
/// use quarry::SqlEnum;
///
/// #[derive(Debug, SqlEnum)]
/// #[orm(rename_all = "snake_case")]
/// enum Status {
///     Active,
///     #[orm(rename = "on_hold")]
///     Paused,
///     Closed = 10,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(rename_all = "...")]` - `lowercase`, `UPPERCASE`, `snake_case`,
///   `SCREAMING_SNAKE_CASE`, `camelCase`, `PascalCase` or `kebab-case`
/// - `#[orm(rename = "name")]` - Stored name of one variant
#[proc_macro_derive(SqlEnum, attributes(orm))]
pub fn derive_sql_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    sql_enum::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
