//! Statement builders over the WHERE/HAVING clause tree.
//!
//! Every builder renders in two modes: [`SqlQb::build_query`] inlines values as
//! SQL literals, [`SqlQb::build_command`] binds them to placeholders in a
//! [`ParamList`] whose counter is shared by WHERE, HAVING and SET values.
//!
//! # Usage
//!
//! ```ignore
//! use quarry::qb::{self, Comparison, LogicOperator, SqlQb};
//!
//! let mut select = qb::select("users")
//!     .columns(&["id", "name"])
//!     .filter("status", Comparison::Equals, "active")
//!     .filter_at("role", Comparison::Equals, "admin", 2);
//! select
//!     .where_tree_mut()
//!     .add("age", Comparison::LessThan, 15)?
//!     .add_sub_clause(LogicOperator::Or, Comparison::GreaterOrEquals, 65);
//! let command = select.build_command()?;
//!
//! let insert = qb::insert("users").set("name", "alice").select_identity(true);
//! let command = insert.build_command()?;
//! ```
//!
//! Builders collect the first construction error (empty field name, level gap)
//! and report it from `build_*`, so chains never have to stop for a `?`.

/// Consuming WHERE/HAVING methods over a `WhereStatement` field.
macro_rules! clause_tree_methods {
    (
        $tree:ident, $kw:literal:
        $add:ident, $add_at:ident, $add_clause:ident, $combine:ident, $get:ident, $get_mut:ident
    ) => {
        #[doc = concat!("Add `field OP value` to level 1 of the ", $kw, " tree.")]
        pub fn $add(
            self,
            field: impl Into<String>,
            comparison: $crate::qb::Comparison,
            value: impl Into<$crate::value::Value>,
        ) -> Self {
            self.$add_at(field, comparison, value, 1)
        }

        #[doc = concat!("Add `field OP value` to a 1-based level of the ", $kw, " tree.")]
        pub fn $add_at(
            mut self,
            field: impl Into<String>,
            comparison: $crate::qb::Comparison,
            value: impl Into<$crate::value::Value>,
            level: usize,
        ) -> Self {
            if let Err(err) = self.$tree.add_at(field, comparison, value, level) {
                self.build_error.get_or_insert(err);
            }
            self
        }

        #[doc = concat!("Add a prepared clause to a 1-based level of the ", $kw, " tree.")]
        pub fn $add_clause(mut self, clause: $crate::qb::Clause, level: usize) -> Self {
            if let Err(err) = self.$tree.add_clause(clause, level) {
                self.build_error.get_or_insert(err);
            }
            self
        }

        #[doc = concat!("AND `other` into every level of the ", $kw, " tree.")]
        pub fn $combine(mut self, other: &$crate::qb::WhereStatement) -> Self {
            self.$tree = $crate::qb::WhereStatement::combine(&self.$tree, other);
            self
        }

        pub fn $get(&self) -> &$crate::qb::WhereStatement {
            &self.$tree
        }

        /// Direct access, e.g. to chain sub-clauses onto a clause.
        pub fn $get_mut(&mut self) -> &mut $crate::qb::WhereStatement {
            &mut self.$tree
        }
    };
}

mod clause;
mod delete;
mod insert;
mod param;
mod select;
mod traits;
mod update;
mod where_statement;

pub use clause::{Clause, Comparison, LogicOperator, SubClause, render_comparison};
pub use delete::DeleteQb;
pub use insert::InsertQb;
pub use param::{Command, Dialect, Param, ParamList};
pub use select::{JoinType, SelectQb, Sorting, TopUnit};
pub use traits::SqlQb;
pub use update::UpdateQb;
pub use where_statement::WhereStatement;

/// Create a SELECT builder reading from `table`.
///
/// # Example
/// ```ignore
/// let qb = quarry::qb::select("users").filter("id", Comparison::Equals, 1);
/// ```
pub fn select(table: &str) -> SelectQb {
    SelectQb::new(table)
}

/// Create an INSERT builder for `table`.
pub fn insert(table: &str) -> InsertQb {
    InsertQb::new(table)
}

/// Create an UPDATE builder for `table`.
pub fn update(table: &str) -> UpdateQb {
    UpdateQb::new(table)
}

/// Create a DELETE builder for `table`.
///
/// A DELETE without WHERE clauses fails to build unless
/// [`DeleteQb::enable_clear`] is set.
pub fn delete(table: &str) -> DeleteQb {
    DeleteQb::new(table)
}

#[cfg(test)]
mod tests;
