//! Parsed query structures
//!
//! Defines the plan produced by the parser and consumed by the executor.

use std::fmt;

use super::errors::{ParserError, ParserResult};

/// Comparison operators accepted in WHERE conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Gte,
    /// `<=`
    Lte,
}

impl CompareOp {
    /// Parses an operator symbol. Anything outside the six comparisons is rejected.
    pub fn from_symbol(symbol: &str) -> ParserResult<Self> {
        match symbol {
            "=" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::NotEq),
            ">" => Ok(CompareOp::Gt),
            "<" => Ok(CompareOp::Lt),
            ">=" => Ok(CompareOp::Gte),
            "<=" => Ok(CompareOp::Lte),
            other => Err(ParserError::invalid_operator(other)),
        }
    }

    /// Returns the operator symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single WHERE condition (`field op value`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Field name, looked up by exact key
    pub field: String,
    /// Comparison operator
    pub op: CompareOp,
    /// Literal right-hand side
    pub value: String,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: CompareOp, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.value)
    }
}

/// Supported join kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
}

impl JoinType {
    /// Parses the word preceding `JOIN` (case-insensitive)
    pub fn from_keyword(word: &str) -> ParserResult<Self> {
        match word.to_ascii_uppercase().as_str() {
            "INNER" => Ok(JoinType::Inner),
            "LEFT" => Ok(JoinType::Left),
            "RIGHT" => Ok(JoinType::Right),
            _ => Err(ParserError::unsupported_join_type(word)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
        }
    }
}

/// Equality condition of a join (`left = right`, both qualified)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCondition {
    pub left: String,
    pub right: String,
}

/// Parsed JOIN clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinDescriptor {
    /// Join kind
    pub join_type: JoinType,
    /// Joined (right-hand) table
    pub table: String,
    /// Equality condition
    pub condition: JoinCondition,
}

/// Immutable plan for one query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// SELECT list, as written (may contain `SUM(x)` style expressions)
    pub fields: Vec<String>,
    /// FROM table
    pub table: String,
    /// WHERE conditions, all combined with AND
    pub where_clauses: Vec<Condition>,
    /// Optional JOIN
    pub join: Option<JoinDescriptor>,
    /// Optional GROUP BY list
    pub group_by_fields: Option<Vec<String>>,
}

impl QueryPlan {
    /// Returns true if the plan has a join stage
    pub fn has_join(&self) -> bool {
        self.join.is_some()
    }

    /// Returns true if the plan has a grouping stage
    pub fn has_group_by(&self) -> bool {
        self.group_by_fields.is_some()
    }

    /// Pipeline stages this plan passes through, in order
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = vec![Stage::Parsed];
        if self.has_join() {
            stages.push(Stage::Joined);
        }
        stages.push(Stage::Filtered);
        if self.has_group_by() {
            stages.push(Stage::Grouped);
        }
        stages.push(Stage::Projected);
        stages
    }
}

/// Linear pipeline states. `Joined` and `Grouped` are skipped when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parsed,
    Joined,
    Filtered,
    Grouped,
    Projected,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Parsed => "PARSED",
            Stage::Joined => "JOINED",
            Stage::Filtered => "FILTERED",
            Stage::Grouped => "GROUPED",
            Stage::Projected => "PROJECTED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::errors::ParserErrorCode;

    fn plan(join: bool, group: bool) -> QueryPlan {
        QueryPlan {
            fields: vec!["name".into()],
            table: "student".into(),
            where_clauses: Vec::new(),
            join: join.then(|| JoinDescriptor {
                join_type: JoinType::Inner,
                table: "enrollment".into(),
                condition: JoinCondition {
                    left: "student.id".into(),
                    right: "enrollment.student_id".into(),
                },
            }),
            group_by_fields: group.then(|| vec!["name".into()]),
        }
    }

    #[test]
    fn test_operator_symbols() {
        for sym in ["=", "!=", ">", "<", ">=", "<="] {
            assert_eq!(CompareOp::from_symbol(sym).unwrap().symbol(), sym);
        }
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let err = CompareOp::from_symbol("<>").unwrap_err();
        assert_eq!(err.code(), ParserErrorCode::InvalidOperator);
    }

    #[test]
    fn test_join_keyword_case_insensitive() {
        assert_eq!(JoinType::from_keyword("left").unwrap(), JoinType::Left);
        assert_eq!(JoinType::from_keyword("Right").unwrap(), JoinType::Right);
        let err = JoinType::from_keyword("FULL").unwrap_err();
        assert_eq!(err.code(), ParserErrorCode::UnsupportedJoinType);
    }

    #[test]
    fn test_stages_skip_optional_states() {
        assert_eq!(
            plan(false, false).stages(),
            vec![Stage::Parsed, Stage::Filtered, Stage::Projected]
        );
        assert_eq!(
            plan(true, true).stages(),
            vec![
                Stage::Parsed,
                Stage::Joined,
                Stage::Filtered,
                Stage::Grouped,
                Stage::Projected
            ]
        );
    }
}
