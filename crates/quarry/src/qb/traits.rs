//! Trait shared by the statement builders.

use std::time::Instant;

use crate::context::ExecutionContext;
use crate::error::QuarryResult;
use crate::qb::param::{Command, Dialect, ParamList};

/// Base trait for all statement builders.
///
/// Implementors render their statement once, either with every value inlined
/// (`params == None`) or binding values into the supplied list.
pub trait SqlQb {
    /// Dialect used for placeholders and identity selection.
    fn dialect(&self) -> Dialect;

    /// Render the statement.
    fn render(&self, params: Option<&mut ParamList>) -> QuarryResult<String>;

    /// Build the statement with every value inlined as a SQL literal.
    fn build_query(&self) -> QuarryResult<String> {
        let sql = self.render(None)?;
        tracing::debug!(target: "quarry.sql", sql = %sql, "built query");
        Ok(sql)
    }

    /// Build a parameterized command.
    ///
    /// WHERE, HAVING and SET values share one placeholder counter.
    fn build_command(&self) -> QuarryResult<Command> {
        let mut params = ParamList::with_dialect(self.dialect());
        let sql = self.render(Some(&mut params))?;
        tracing::debug!(
            target: "quarry.sql",
            sql = %sql,
            param_count = params.len(),
            "built command"
        );
        Ok(Command { sql, params })
    }

    /// [`build_command`](SqlQb::build_command), recording the render time and
    /// any failure on `ctx`.
    fn build_command_with(&self, ctx: &mut ExecutionContext) -> QuarryResult<Command> {
        let start = Instant::now();
        let result = self.build_command();
        ctx.event_mut().render += start.elapsed();
        ctx.observe(result)
    }
}
