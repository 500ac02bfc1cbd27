//! SELECT builder.

use crate::error::{QuarryError, QuarryResult};
use crate::qb::clause::{Comparison, render_comparison};
use crate::qb::param::{Dialect, ParamList};
use crate::qb::traits::SqlQb;
use crate::qb::where_statement::WhereStatement;
use crate::value::{Literal, Value};

/// JOIN flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Outer,
    Left,
    Right,
}

impl JoinType {
    fn keyword(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Outer => "OUTER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
        }
    }
}

/// ORDER BY direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sorting {
    #[default]
    Ascending,
    Descending,
}

/// Unit of a TOP clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopUnit {
    Records,
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Top {
    quantity: u32,
    unit: TopUnit,
}

impl Top {
    const ALL: Top = Top {
        quantity: 100,
        unit: TopUnit::Percent,
    };
}

/// `{TYPE} JOIN to_table ON from_table.from_column OP to_table.to_column`
#[derive(Debug, Clone, PartialEq)]
struct Join {
    join_type: JoinType,
    to_table: String,
    to_column: String,
    comparison: Comparison,
    from_table: String,
    from_column: String,
}

impl Join {
    fn render(&self) -> QuarryResult<String> {
        let on = render_comparison(
            &format!("{}.{}", self.from_table, self.from_column),
            self.comparison,
            &Value::Literal(Literal::new(format!("{}.{}", self.to_table, self.to_column))),
        )?;
        Ok(format!("{} {} ON {on}", self.join_type.keyword(), self.to_table))
    }
}

/// SELECT builder with WHERE/HAVING clause trees.
#[derive(Debug, Clone)]
pub struct SelectQb {
    dialect: Dialect,
    distinct: bool,
    top: Top,
    /// Empty means `*`
    columns: Vec<String>,
    tables: Vec<String>,
    joins: Vec<Join>,
    where_tree: WhereStatement,
    group_by: Vec<String>,
    having_tree: WhereStatement,
    order_by: Vec<(String, Sorting)>,
    build_error: Option<QuarryError>,
}

impl SelectQb {
    /// Create a SELECT builder reading from `table`; pass `""` to add tables later.
    pub fn new(table: &str) -> Self {
        let tables = if table.is_empty() {
            Vec::new()
        } else {
            vec![table.to_string()]
        };
        Self {
            dialect: Dialect::default(),
            distinct: false,
            top: Top::ALL,
            columns: Vec::new(),
            tables,
            joins: Vec::new(),
            where_tree: WhereStatement::new(),
            group_by: Vec::new(),
            having_tree: WhereStatement::new(),
            order_by: Vec::new(),
            build_error: None,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    // ==================== TOP ====================

    /// `TOP n`
    pub fn top(mut self, quantity: u32) -> Self {
        self.top = Top {
            quantity,
            unit: TopUnit::Records,
        };
        self
    }

    /// `TOP n PERCENT`; `100` percent removes the clause.
    pub fn top_percent(mut self, quantity: u32) -> Self {
        self.top = Top {
            quantity,
            unit: TopUnit::Percent,
        };
        self
    }

    // ==================== Columns and tables ====================

    /// Select every column (the default).
    pub fn all_columns(mut self) -> Self {
        self.columns.clear();
        self
    }

    /// `SELECT count(1)`
    pub fn count(self) -> Self {
        self.column("count(1)")
    }

    /// Replace the column list with a single column.
    pub fn column(mut self, column: &str) -> Self {
        self.columns = vec![column.to_string()];
        self
    }

    /// Replace the column list.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Append one column.
    pub fn add_column(mut self, column: &str) -> Self {
        self.columns.push(column.to_string());
        self
    }

    /// Replace the table list.
    pub fn from_tables(mut self, tables: &[&str]) -> Self {
        self.tables = tables.iter().map(|t| t.to_string()).collect();
        self
    }

    // ==================== JOIN ====================

    /// `{TYPE} JOIN to_table ON from_table.from_column OP to_table.to_column`
    ///
    /// Both sides are column references and are never parameterized.
    pub fn join(
        mut self,
        join_type: JoinType,
        to_table: &str,
        to_column: &str,
        comparison: Comparison,
        from_table: &str,
        from_column: &str,
    ) -> Self {
        self.joins.push(Join {
            join_type,
            to_table: to_table.to_string(),
            to_column: to_column.to_string(),
            comparison,
            from_table: from_table.to_string(),
            from_column: from_column.to_string(),
        });
        self
    }

    /// `INNER JOIN to_table ON from_table.from_column = to_table.to_column`
    pub fn inner_join(self, to_table: &str, to_column: &str, from_table: &str, from_column: &str) -> Self {
        self.join(JoinType::Inner, to_table, to_column, Comparison::Equals, from_table, from_column)
    }

    /// `LEFT JOIN to_table ON from_table.from_column = to_table.to_column`
    pub fn left_join(self, to_table: &str, to_column: &str, from_table: &str, from_column: &str) -> Self {
        self.join(JoinType::Left, to_table, to_column, Comparison::Equals, from_table, from_column)
    }

    // ==================== WHERE / HAVING ====================

    clause_tree_methods!(where_tree, "WHERE":
        filter, filter_at, filter_clause, and_filter, where_tree, where_tree_mut);

    clause_tree_methods!(having_tree, "HAVING":
        having, having_at, having_clause, and_having, having_tree, having_tree_mut);

    // ==================== GROUP BY / ORDER BY ====================

    /// Append GROUP BY columns.
    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.group_by.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    pub fn order_by(mut self, field: &str, sorting: Sorting) -> Self {
        self.order_by.push((field.to_string(), sorting));
        self
    }

    fn render_top(&self, sql: &mut String) {
        if self.top == Top::ALL || self.dialect == Dialect::Postgres {
            return;
        }
        sql.push_str(&format!("TOP {}", self.top.quantity));
        if self.top.unit == TopUnit::Percent {
            sql.push_str(" PERCENT");
        }
        sql.push(' ');
    }

    fn render_limit(&self, sql: &mut String) -> QuarryResult<()> {
        if self.top == Top::ALL || self.dialect != Dialect::Postgres {
            return Ok(());
        }
        match self.top.unit {
            TopUnit::Records => {
                sql.push_str(&format!(" LIMIT {}", self.top.quantity));
                Ok(())
            }
            TopUnit::Percent => Err(QuarryError::build(
                "TOP n PERCENT is not supported by the Postgres dialect",
            )),
        }
    }
}

impl SqlQb for SelectQb {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn render(&self, mut params: Option<&mut ParamList>) -> QuarryResult<String> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }

        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        self.render_top(&mut sql);

        if self.columns.is_empty() {
            // Only the single selected table's columns; with joins the caller picks columns.
            if let [table] = self.tables.as_slice() {
                sql.push_str(table);
                sql.push('.');
            }
            sql.push('*');
        } else {
            sql.push_str(&self.columns.join(", "));
        }

        if !self.tables.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&self.tables.join(", "));
        }

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.render()?);
        }

        if !self.where_tree.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_tree.render_into(params.as_deref_mut())?);
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.having_tree.is_empty() {
            if self.group_by.is_empty() {
                return Err(QuarryError::build("Having statement was set without Group By"));
            }
            sql.push_str(" HAVING ");
            sql.push_str(&self.having_tree.render_into(params.as_deref_mut())?);
        }

        if !self.order_by.is_empty() {
            let order: Vec<String> = self
                .order_by
                .iter()
                .map(|(field, sorting)| match sorting {
                    Sorting::Ascending => format!("{field} ASC"),
                    Sorting::Descending => format!("{field} DESC"),
                })
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.join(", "));
        }

        self.render_limit(&mut sql)?;
        Ok(sql)
    }
}
