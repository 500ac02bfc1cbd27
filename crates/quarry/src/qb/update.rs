//! UPDATE builder.

use crate::error::{QuarryError, QuarryResult};
use crate::qb::clause::value_sql;
use crate::qb::insert::set_field;
use crate::qb::param::{Dialect, ParamList};
use crate::qb::traits::SqlQb;
use crate::qb::where_statement::WhereStatement;
use crate::value::Value;

/// UPDATE builder; SET values are bound before WHERE values.
#[derive(Debug, Clone)]
pub struct UpdateQb {
    dialect: Dialect,
    table: String,
    fields: Vec<(String, Value)>,
    where_tree: WhereStatement,
    build_error: Option<QuarryError>,
}

impl UpdateQb {
    pub fn new(table: &str) -> Self {
        Self {
            dialect: Dialect::default(),
            table: table.to_string(),
            fields: Vec::new(),
            where_tree: WhereStatement::new(),
            build_error: None,
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

    clause_tree_methods!(where_tree, "WHERE":
        filter, filter_at, filter_clause, and_filter, where_tree, where_tree_mut);
}

impl SqlQb for UpdateQb {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn render(&self, mut params: Option<&mut ParamList>) -> QuarryResult<String> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        if self.table.is_empty() {
            return Err(QuarryError::build("Table to update was not set"));
        }
        if self.fields.is_empty() {
            return Err(QuarryError::build("Nothing to update"));
        }

        let assignments: Vec<String> = self
            .fields
            .iter()
            .map(|(f, v)| format!("{f} = {}", value_sql(f, v, params.as_deref_mut())))
            .collect();
        let mut sql = format!("UPDATE {} SET {}", self.table, assignments.join(", "));

        if !self.where_tree.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_tree.render_into(params.as_deref_mut())?);
        }
        Ok(sql)
    }
}
