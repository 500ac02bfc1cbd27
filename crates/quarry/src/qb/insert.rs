//! INSERT builder.

use crate::error::{QuarryError, QuarryResult};
use crate::qb::clause::value_sql;
use crate::qb::param::{Dialect, ParamList};
use crate::qb::traits::SqlQb;
use crate::value::Value;

/// Single-row INSERT builder.
#[derive(Debug, Clone)]
pub struct InsertQb {
    dialect: Dialect,
    table: String,
    fields: Vec<(String, Value)>,
    select_identity: bool,
}

impl InsertQb {
    pub fn new(table: &str) -> Self {
        Self {
            dialect: Dialect::default(),
            table: table.to_string(),
            fields: Vec::new(),
            select_identity: false,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set a column value; setting the same column again (any case) overwrites it.
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        set_field(&mut self.fields, field, value.into());
        self
    }

    /// Append the dialect's identity select after the INSERT.
    pub fn select_identity(mut self, enabled: bool) -> Self {
        self.select_identity = enabled;
        self
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }
}

pub(crate) fn set_field(fields: &mut Vec<(String, Value)>, field: &str, value: Value) {
    match fields.iter_mut().find(|(f, _)| f.eq_ignore_ascii_case(field)) {
        Some((_, existing)) => *existing = value,
        None => fields.push((field.to_string(), value)),
    }
}

impl SqlQb for InsertQb {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn render(&self, mut params: Option<&mut ParamList>) -> QuarryResult<String> {
        if self.table.is_empty() {
            return Err(QuarryError::build("Table to insert to was not set"));
        }
        if self.fields.is_empty() {
            return Err(QuarryError::build("No fields set to insert"));
        }

        let columns: Vec<&str> = self.fields.iter().map(|(f, _)| f.as_str()).collect();
        let values: Vec<String> = self
            .fields
            .iter()
            .map(|(f, v)| value_sql(f, v, params.as_deref_mut()))
            .collect();

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            values.join(", ")
        );
        if self.select_identity {
            sql.push_str("; ");
            sql.push_str(self.dialect.identity_select());
        }
        Ok(sql)
    }
}
