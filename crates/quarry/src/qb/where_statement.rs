//! Multi-level WHERE/HAVING clause tree.
//!
//! A [`WhereStatement`] is an ordered list of levels. Clauses inside a level are
//! AND-ed, levels are OR-ed:
//!
//! ```text
//! level 1: (age = 10)
//! level 2: (name = 'Pete'), (city = 'NY')
//!
//! (age = 10)  OR ((name = 'Pete') AND (city = 'NY'))
//! ```
//!
//! Levels are 1-based and created on demand: adding to level `n + 1` when `n`
//! levels exist opens a new level, anything further ahead is a
//! [`QuarryError::LevelGap`].

use crate::error::{QuarryError, QuarryResult};
use crate::qb::clause::{Clause, Comparison};
use crate::qb::param::ParamList;
use crate::value::Value;

/// OR-ed levels of AND-ed clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereStatement {
    levels: Vec<Vec<Clause>>,
}

impl WhereStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of OR levels.
    pub fn clause_levels(&self) -> usize {
        self.levels.len()
    }

    /// True when the statement renders no WHERE fragment at all.
    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(Vec::is_empty)
    }

    /// Clauses of a 1-based level.
    pub fn level(&self, level: usize) -> Option<&[Clause]> {
        level
            .checked_sub(1)
            .and_then(|i| self.levels.get(i))
            .map(Vec::as_slice)
    }

    /// Mutable clauses of a 1-based level.
    pub fn level_mut(&mut self, level: usize) -> Option<&mut Vec<Clause>> {
        level.checked_sub(1).and_then(|i| self.levels.get_mut(i))
    }

    pub fn levels(&self) -> impl Iterator<Item = &[Clause]> {
        self.levels.iter().map(Vec::as_slice)
    }

    /// Append `clause` to a 1-based level and return it for sub-clause chaining.
    pub fn add_clause(&mut self, clause: Clause, level: usize) -> QuarryResult<&mut Clause> {
        let clauses = self.ensure_level(level)?;
        clauses.push(clause);
        let last = clauses.len() - 1;
        Ok(&mut clauses[last])
    }

    /// Add `field OP value` to level 1.
    pub fn add(
        &mut self,
        field: impl Into<String>,
        comparison: Comparison,
        value: impl Into<Value>,
    ) -> QuarryResult<&mut Clause> {
        self.add_at(field, comparison, value, 1)
    }

    /// Add `field OP value` to a 1-based level.
    pub fn add_at(
        &mut self,
        field: impl Into<String>,
        comparison: Comparison,
        value: impl Into<Value>,
        level: usize,
    ) -> QuarryResult<&mut Clause> {
        let clause = Clause::new(field, comparison, value)?;
        self.add_clause(clause, level)
    }

    fn ensure_level(&mut self, level: usize) -> QuarryResult<&mut Vec<Clause>> {
        if level == 0 {
            return Err(QuarryError::InvalidLevel(level));
        }
        let existing = self.levels.len();
        if level > existing + 1 {
            return Err(QuarryError::LevelGap { level, existing });
        }
        if level == existing + 1 {
            self.levels.push(Vec::new());
        }
        Ok(&mut self.levels[level - 1])
    }

    /// Deep copy; the result shares nothing with `self`.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// AND every clause of every level of `other` into every level of `base`.
    ///
    /// The injection is cross-multiplicative: with `base = A OR B` and
    /// `other = C OR D` the result is `(A AND C AND D) OR (B AND C AND D)`,
    /// not a level-by-level zip. A `base` without levels has nothing to
    /// inject into, so the result is empty as well.
    pub fn combine(base: &WhereStatement, other: &WhereStatement) -> WhereStatement {
        let mut result = base.copy();
        for clause in other.levels.iter().flatten() {
            for level in result.levels.iter_mut() {
                level.push(clause.clone());
            }
        }
        result
    }

    /// Render with every value inlined as a SQL literal.
    ///
    /// Returns an empty string when there are no levels.
    pub fn render(&self) -> QuarryResult<String> {
        self.render_with(|clause| clause.render())
    }

    /// Render with every bindable value replaced by a placeholder in `params`.
    ///
    /// Numbering continues from whatever `params` already holds.
    pub fn render_params(&self, params: &mut ParamList) -> QuarryResult<String> {
        self.render_with(|clause| clause.render_params(params))
    }

    /// Inline when `params` is `None`, parameterized otherwise.
    pub fn render_into(&self, params: Option<&mut ParamList>) -> QuarryResult<String> {
        match params {
            Some(params) => self.render_params(params),
            None => self.render(),
        }
    }

    fn render_with<F>(&self, mut render_clause: F) -> QuarryResult<String>
    where
        F: FnMut(&Clause) -> QuarryResult<String>,
    {
        let mut segments = Vec::with_capacity(self.levels.len());
        for level in self.levels.iter().filter(|l| !l.is_empty()) {
            let mut parts = Vec::with_capacity(level.len());
            for clause in level {
                parts.push(format!("({})", render_clause(clause)?));
            }
            let joined = parts.join(" AND ");
            if level.len() > 1 {
                segments.push(format!(" ({joined}) "));
            } else {
                segments.push(format!(" {joined} "));
            }
        }
        Ok(segments.join(" OR").trim().to_string())
    }
}
