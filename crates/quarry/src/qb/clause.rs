//! Field-anchored comparison clauses.
//!
//! A [`Clause`] is `field OP value` followed by a flat chain of sub-comparisons
//! against the same field, each joined with an explicit [`LogicOperator`]:
//!
//! ```text
//! age < 15 OR age >= 20
//! ```

use crate::error::{QuarryError, QuarryResult};
use crate::qb::param::ParamList;
use crate::value::{Literal, Value, format_sql_value};
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterOrEquals,
    LessThan,
    LessOrEquals,
    Like,
    NotLike,
    In,
}

impl Comparison {
    pub const ALL: [Comparison; 9] = [
        Comparison::Equals,
        Comparison::NotEquals,
        Comparison::GreaterThan,
        Comparison::GreaterOrEquals,
        Comparison::LessThan,
        Comparison::LessOrEquals,
        Comparison::Like,
        Comparison::NotLike,
        Comparison::In,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Comparison::Equals => "Equals",
            Comparison::NotEquals => "NotEquals",
            Comparison::GreaterThan => "GreaterThan",
            Comparison::GreaterOrEquals => "GreaterOrEquals",
            Comparison::LessThan => "LessThan",
            Comparison::LessOrEquals => "LessOrEquals",
            Comparison::Like => "Like",
            Comparison::NotLike => "NotLike",
            Comparison::In => "In",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses operator names (`"GreaterThan"`, case-insensitive) and SQL tokens (`">"`).
impl FromStr for Comparison {
    type Err = QuarryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let by_token = match token.to_ascii_uppercase().as_str() {
            "=" => Some(Comparison::Equals),
            "<>" | "!=" => Some(Comparison::NotEquals),
            ">" => Some(Comparison::GreaterThan),
            ">=" => Some(Comparison::GreaterOrEquals),
            "<" => Some(Comparison::LessThan),
            "<=" => Some(Comparison::LessOrEquals),
            "LIKE" => Some(Comparison::Like),
            "NOT LIKE" => Some(Comparison::NotLike),
            "IN" => Some(Comparison::In),
            _ => None,
        };
        by_token
            .or_else(|| {
                Comparison::ALL
                    .into_iter()
                    .find(|c| c.name().eq_ignore_ascii_case(token))
            })
            .ok_or_else(|| QuarryError::UnknownComparison(s.to_string()))
    }
}

/// Connects a sub-comparison to the comparison before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOperator {
    And,
    Or,
}

impl LogicOperator {
    fn keyword(self) -> &'static str {
        match self {
            LogicOperator::And => " AND ",
            LogicOperator::Or => " OR ",
        }
    }
}

impl FromStr for LogicOperator {
    type Err = QuarryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(LogicOperator::And),
            "OR" => Ok(LogicOperator::Or),
            _ => Err(QuarryError::UnknownLogicOperator(s.to_string())),
        }
    }
}

/// One link of a clause's comparison chain.
#[derive(Debug, Clone, PartialEq)]
pub struct SubClause {
    pub logic: LogicOperator,
    pub comparison: Comparison,
    pub value: Value,
}

/// `field OP value [LOGIC OP value]*`
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    field: String,
    comparison: Comparison,
    value: Value,
    sub_clauses: Vec<SubClause>,
}

impl Clause {
    /// Create a clause; the field name must not be empty.
    pub fn new(
        field: impl Into<String>,
        comparison: Comparison,
        value: impl Into<Value>,
    ) -> QuarryResult<Self> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(QuarryError::EmptyFieldName);
        }
        Ok(Self {
            field,
            comparison,
            value: value.into(),
            sub_clauses: Vec::new(),
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    pub fn sub_clauses(&self) -> &[SubClause] {
        &self.sub_clauses
    }

    /// Chain another comparison against the same field.
    pub fn add_sub_clause(
        &mut self,
        logic: LogicOperator,
        comparison: Comparison,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.sub_clauses.push(SubClause {
            logic,
            comparison,
            value: value.into(),
        });
        self
    }

    pub fn clear_sub_clauses(&mut self) {
        self.sub_clauses.clear();
    }

    /// Render the clause with every value inlined as a literal.
    pub fn render(&self) -> QuarryResult<String> {
        let mut out = render_comparison(&self.field, self.comparison, &self.value)?;
        for sub in &self.sub_clauses {
            out.push_str(sub.logic.keyword());
            out.push_str(&render_comparison(&self.field, sub.comparison, &sub.value)?);
        }
        Ok(out)
    }

    /// Render the clause, binding every value into `params`.
    ///
    /// NULL and [`Literal`](crate::value::Literal) values are never bound.
    pub fn render_params(&self, params: &mut ParamList) -> QuarryResult<String> {
        let value = bind_value(&self.field, &self.value, params);
        let mut out = render_comparison(&self.field, self.comparison, &value)?;
        for sub in &self.sub_clauses {
            let value = bind_value(&self.field, &sub.value, params);
            out.push_str(sub.logic.keyword());
            out.push_str(&render_comparison(&self.field, sub.comparison, &value)?);
        }
        Ok(out)
    }
}

/// Replace a bindable value with a placeholder literal.
pub(crate) fn bind_value(field: &str, value: &Value, params: &mut ParamList) -> Value {
    match value {
        Value::Null | Value::Literal(_) => value.clone(),
        Value::List(items) => {
            let placeholders: Vec<String> = items
                .iter()
                .map(|item| match item {
                    Value::Literal(l) => l.as_str().to_string(),
                    other => params.bind(field, other.clone()),
                })
                .collect();
            Value::Literal(Literal::new(placeholders.join(", ")))
        }
        other => Value::Literal(Literal::new(params.bind(field, other.clone()))),
    }
}

/// SQL text of an assigned value: a placeholder when binding, else an inline literal.
pub(crate) fn value_sql(field: &str, value: &Value, params: Option<&mut ParamList>) -> String {
    match params {
        Some(params) => format_sql_value(&bind_value(field, value, params)),
        None => format_sql_value(value),
    }
}

/// Render a single `field OP value` fragment.
///
/// Against NULL only `Equals` (`field IS NULL`) and `NotEquals`
/// (`NOT field IS NULL`) are legal.
pub fn render_comparison(
    field: &str,
    comparison: Comparison,
    value: &Value,
) -> QuarryResult<String> {
    if value.is_null() {
        return match comparison {
            Comparison::Equals => Ok(format!("{field} IS NULL")),
            Comparison::NotEquals => Ok(format!("NOT {field} IS NULL")),
            other => Err(QuarryError::InvalidNullComparison {
                field: field.to_string(),
                comparison: other.to_string(),
            }),
        };
    }

    let v = format_sql_value(value);
    Ok(match comparison {
        Comparison::Equals => format!("{field} = {v}"),
        Comparison::NotEquals => format!("{field} <> {v}"),
        Comparison::GreaterThan => format!("{field} > {v}"),
        Comparison::GreaterOrEquals => format!("{field} >= {v}"),
        Comparison::LessThan => format!("{field} < {v}"),
        Comparison::LessOrEquals => format!("{field} <= {v}"),
        Comparison::Like => format!("{field} LIKE {v}"),
        Comparison::NotLike => format!("NOT {field} LIKE {v}"),
        Comparison::In => format!("{field} IN ({v})"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_tokens() {
        let cases = [
            (Comparison::Equals, "age = 10"),
            (Comparison::NotEquals, "age <> 10"),
            (Comparison::GreaterThan, "age > 10"),
            (Comparison::GreaterOrEquals, "age >= 10"),
            (Comparison::LessThan, "age < 10"),
            (Comparison::LessOrEquals, "age <= 10"),
            (Comparison::Like, "age LIKE 10"),
            (Comparison::NotLike, "NOT age LIKE 10"),
            (Comparison::In, "age IN (10)"),
        ];
        for (cmp, expected) in cases {
            assert_eq!(render_comparison("age", cmp, &10i32.into()).unwrap(), expected);
        }
    }

    #[test]
    fn null_comparisons() {
        assert_eq!(
            render_comparison("email", Comparison::Equals, &Value::Null).unwrap(),
            "email IS NULL"
        );
        assert_eq!(
            render_comparison("email", Comparison::NotEquals, &Value::Null).unwrap(),
            "NOT email IS NULL"
        );
        let err = render_comparison("email", Comparison::GreaterThan, &Value::Null).unwrap_err();
        assert!(matches!(
            err,
            QuarryError::InvalidNullComparison { ref field, .. } if field == "email"
        ));
    }

    #[test]
    fn empty_field_is_rejected() {
        assert!(matches!(
            Clause::new("  ", Comparison::Equals, 1i32),
            Err(QuarryError::EmptyFieldName)
        ));
    }

    #[test]
    fn sub_clauses_chain_on_same_field() {
        let mut clause = Clause::new("age", Comparison::LessThan, 15i32).unwrap();
        clause.add_sub_clause(LogicOperator::Or, Comparison::GreaterOrEquals, 20i32);
        assert_eq!(clause.render().unwrap(), "age < 15 OR age >= 20");
    }

    #[test]
    fn clause_can_be_retargeted() {
        let mut clause = Clause::new("age", Comparison::LessThan, 15i32).unwrap();
        clause.add_sub_clause(LogicOperator::Or, Comparison::GreaterOrEquals, 20i32);
        clause.set_value(30i32);
        assert_eq!(clause.value(), &Value::I32(30));
        assert_eq!(clause.render().unwrap(), "age < 30 OR age >= 20");

        clause.clear_sub_clauses();
        assert!(clause.sub_clauses().is_empty());
        assert_eq!(clause.render().unwrap(), "age < 30");

        // NULL is only legal against Equals/NotEquals.
        clause.set_value(Value::Null);
        assert!(clause.render().is_err());
    }

    #[test]
    fn parameterized_sub_clauses_share_counter() {
        let mut clause = Clause::new("u.age", Comparison::LessThan, 15i32).unwrap();
        clause
            .add_sub_clause(LogicOperator::Or, Comparison::GreaterOrEquals, 20i32)
            .add_sub_clause(LogicOperator::And, Comparison::NotEquals, Value::Null);
        let mut params = ParamList::new();
        assert_eq!(
            clause.render_params(&mut params).unwrap(),
            "u.age < @p1_u_age OR u.age >= @p2_u_age AND NOT u.age IS NULL"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn literal_is_never_bound() {
        let clause = Clause::new("o.user_id", Comparison::Equals, Literal::new("u.id")).unwrap();
        let mut params = ParamList::new();
        assert_eq!(clause.render_params(&mut params).unwrap(), "o.user_id = u.id");
        assert!(params.is_empty());
    }

    #[test]
    fn in_list_binds_each_item() {
        let clause = Clause::new("id", Comparison::In, Value::list([1i32, 2, 3])).unwrap();
        assert_eq!(clause.render().unwrap(), "id IN (1, 2, 3)");
        let mut params = ParamList::new();
        assert_eq!(
            clause.render_params(&mut params).unwrap(),
            "id IN (@p1_id, @p2_id, @p3_id)"
        );
    }

    #[test]
    fn parse_comparison_names_and_tokens() {
        assert_eq!("greaterthan".parse::<Comparison>().unwrap(), Comparison::GreaterThan);
        assert_eq!("<>".parse::<Comparison>().unwrap(), Comparison::NotEquals);
        assert_eq!("not like".parse::<Comparison>().unwrap(), Comparison::NotLike);
        assert!(matches!(
            "BETWEEN".parse::<Comparison>(),
            Err(QuarryError::UnknownComparison(_))
        ));
        assert!(matches!(
            "XOR".parse::<LogicOperator>(),
            Err(QuarryError::UnknownLogicOperator(_))
        ));
    }
}
