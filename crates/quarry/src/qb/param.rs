//! Bound parameters and placeholder naming.

use crate::value::Value;

/// SQL flavour targeted by the builders.
///
/// The dialect decides how placeholders are spelled and how the identity of a
/// freshly inserted row is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Named `@p{n}_{field}` placeholders, `SELECT @@IDENTITY`.
    #[default]
    Generic,
    /// Named `@p{n}_{field}` placeholders, `SELECT SCOPE_IDENTITY()`, bracketed tables.
    SqlServer,
    /// Positional `$n` placeholders, `SELECT lastval()`.
    Postgres,
}

impl Dialect {
    /// Placeholder text for the `n`-th (1-based) parameter bound for `field`.
    pub fn placeholder(self, n: usize, field: &str) -> String {
        match self {
            Dialect::Generic | Dialect::SqlServer => format!("@p{n}_{}", sanitize(field)),
            Dialect::Postgres => format!("${n}"),
        }
    }

    /// Statement appended to an INSERT to read back the generated identity.
    pub fn identity_select(self) -> &'static str {
        match self {
            Dialect::Generic => "SELECT @@IDENTITY",
            Dialect::SqlServer => "SELECT SCOPE_IDENTITY()",
            Dialect::Postgres => "SELECT lastval()",
        }
    }

    /// Table reference as written after `DELETE FROM`.
    ///
    /// SQL Server gets `[schema].[table]`; already bracketed names are kept.
    pub fn quote_table(self, table: &str) -> String {
        match self {
            Dialect::SqlServer if !table.starts_with('[') => {
                format!("[{}]", table.replace('.', "].["))
            }
            _ => table.to_string(),
        }
    }
}

// `orders.user_id` -> `orders_user_id`; anything outside [A-Za-z0-9_] is replaced.
fn sanitize(field: &str) -> String {
    field
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// A named parameter bound to a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub value: Value,
}

/// Ordered parameter list shared across one statement render.
///
/// The placeholder counter is the list length, so every parameter pushed
/// through the same list (WHERE, then HAVING, SET values, ...) is numbered
/// consecutively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamList {
    dialect: Dialect,
    params: Vec<Param>,
}

impl ParamList {
    /// Create an empty list using the generic dialect.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty list for a dialect.
    pub fn with_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            params: Vec::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Bind `value` for `field` and return the placeholder text.
    pub fn bind(&mut self, field: &str, value: Value) -> String {
        let name = self.dialect.placeholder(self.params.len() + 1, field);
        self.params.push(Param {
            name: name.clone(),
            value,
        });
        name
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    /// Look up a bound value by placeholder name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    /// Parameter values as references compatible with tokio-postgres.
    #[cfg(feature = "postgres")]
    pub fn as_refs(&self) -> Vec<&(dyn tokio_postgres::types::ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| &p.value as &(dyn tokio_postgres::types::ToSql + Sync))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// SQL text plus the parameters its placeholders refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub sql: String,
    pub params: ParamList,
}
