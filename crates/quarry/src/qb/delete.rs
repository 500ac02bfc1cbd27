//! DELETE builder.

use crate::error::{QuarryError, QuarryResult};
use crate::qb::param::{Dialect, ParamList};
use crate::qb::traits::SqlQb;
use crate::qb::where_statement::WhereStatement;

/// DELETE builder.
///
/// Without WHERE clauses the build fails unless [`enable_clear`](Self::enable_clear)
/// was set, so an empty filter can never wipe a table by accident.
#[derive(Debug, Clone)]
pub struct DeleteQb {
    dialect: Dialect,
    table: String,
    where_tree: WhereStatement,
    enable_clear: bool,
    build_error: Option<QuarryError>,
}

impl DeleteQb {
    pub fn new(table: &str) -> Self {
        Self {
            dialect: Dialect::default(),
            table: table.to_string(),
            where_tree: WhereStatement::new(),
            enable_clear: false,
            build_error: None,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Allow a DELETE without WHERE clauses.
    pub fn enable_clear(mut self, enabled: bool) -> Self {
        self.enable_clear = enabled;
        self
    }

    clause_tree_methods!(where_tree, "WHERE":
        filter, filter_at, filter_clause, and_filter, where_tree, where_tree_mut);
}

impl SqlQb for DeleteQb {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn render(&self, params: Option<&mut ParamList>) -> QuarryResult<String> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        if self.table.is_empty() {
            return Err(QuarryError::build("Table to delete from was not set"));
        }

        let mut sql = format!("DELETE FROM {}", self.dialect.quote_table(&self.table));
        if !self.where_tree.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_tree.render_into(params)?);
        } else if !self.enable_clear {
            return Err(QuarryError::build(format!(
                "Statement would delete all records in table {}; call enable_clear(true) to allow it",
                self.table
            )));
        }
        Ok(sql)
    }
}
