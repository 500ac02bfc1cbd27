//! Column to property index resolution.

use std::collections::HashMap;

use crate::mapping::schema::Schema;

/// How a column found its property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Column name equals the property name (any case)
    Exact,
    /// Column name with the table prefix removed equals the property name
    Prefix,
    /// Column listed in the alias map
    Alias,
}

/// A result-set column bound to a schema property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    /// Column ordinal in the result set
    pub ordinal: usize,
    /// Column name as reported by the row source
    pub column: String,
    /// Position of the property in the schema
    pub property: usize,
    pub resolution: Resolution,
}

/// Bind result-set columns to properties of `schema`.
///
/// Each column tries, in order: an exact name match, a match after stripping
/// `table_prefix` (first occurrence), then `aliases` (keyed by lower-cased
/// column name). The first hit wins; columns without one are left out.
pub fn resolve_indices<T>(
    columns: &[String],
    schema: &Schema<T>,
    table_prefix: &str,
    aliases: &HashMap<String, String>,
) -> Vec<ColumnBinding> {
    let prefix = table_prefix.to_lowercase();
    let mut bindings = Vec::with_capacity(columns.len());

    for (ordinal, column) in columns.iter().enumerate() {
        let key = column.to_lowercase();

        let exact = schema
            .position_lower(&key)
            .map(|p| (p, Resolution::Exact));
        let prefixed = || {
            if prefix.is_empty() || !key.contains(&prefix) {
                return None;
            }
            schema
                .position_lower(&key.replacen(&prefix, "", 1))
                .map(|p| (p, Resolution::Prefix))
        };
        let aliased = || {
            let target = aliases.get(&key)?;
            match schema.position(target) {
                Some(p) => Some((p, Resolution::Alias)),
                None => {
                    tracing::debug!(
                        target: "quarry.map",
                        column = %column,
                        property = %target,
                        type_name = schema.type_name(),
                        "alias target is not a mapped property; column dropped"
                    );
                    None
                }
            }
        };

        match exact.or_else(prefixed).or_else(aliased) {
            Some((property, resolution)) => bindings.push(ColumnBinding {
                ordinal,
                column: column.clone(),
                property,
                resolution,
            }),
            None => tracing::trace!(
                target: "quarry.map",
                column = %column,
                type_name = schema.type_name(),
                "unmapped column ignored"
            ),
        }
    }

    bindings
}
