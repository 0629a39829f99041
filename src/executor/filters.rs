//! Predicate filtering for query execution
//!
//! Conditions look up the field by exact key only. A qualified WHERE field
//! matches only if the row itself carries that qualified key; there is no
//! bare-name fallback here, unlike join key resolution.
//!
//! Ordering comparisons are lexical on the stored text, so `"9" > "10"`.

use std::borrow::Cow;

use crate::parser::{CompareOp, Condition};
use crate::row::{Row, Value};

/// Evaluates conditions against rows
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if a row satisfies every condition (AND semantics)
    pub fn matches_all(row: &Row, conditions: &[Condition]) -> bool {
        conditions.iter().all(|cond| Self::matches(row, cond))
    }

    /// Checks a single condition.
    ///
    /// A missing or null cell satisfies only `!=`.
    pub fn matches(row: &Row, condition: &Condition) -> bool {
        let actual: Cow<'_, str> = match row.get(&condition.field) {
            Some(Value::Text(s)) => Cow::Borrowed(s.as_str()),
            Some(Value::Number(n)) => Cow::Owned(Value::Number(*n).to_string()),
            Some(Value::Null) | None => return condition.op == CompareOp::NotEq,
        };
        let actual = actual.as_ref();
        let expected = condition.value.as_str();

        match condition.op {
            CompareOp::Eq => actual == expected,
            CompareOp::NotEq => actual != expected,
            CompareOp::Gt => actual > expected,
            CompareOp::Lt => actual < expected,
            CompareOp::Gte => actual >= expected,
            CompareOp::Lte => actual <= expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(field: &str, op: &str, value: &str) -> Condition {
        Condition::new(field, CompareOp::from_symbol(op).unwrap(), value)
    }

    #[test]
    fn test_equality_match() {
        let row = Row::from_pairs([("name", "Alice"), ("age", "30")]);
        assert!(PredicateFilter::matches(&row, &cond("name", "=", "Alice")));
        assert!(!PredicateFilter::matches(&row, &cond("name", "=", "Bob")));
        assert!(PredicateFilter::matches(&row, &cond("name", "!=", "Bob")));
    }

    #[test]
    fn test_range_is_lexical() {
        let row = Row::from_pairs([("age", "25")]);
        assert!(PredicateFilter::matches(&row, &cond("age", ">", "20")));
        assert!(PredicateFilter::matches(&row, &cond("age", ">=", "25")));
        assert!(PredicateFilter::matches(&row, &cond("age", "<=", "25")));
        assert!(!PredicateFilter::matches(&row, &cond("age", "<", "25")));

        // No numeric coercion: "9" sorts after "10"
        let row = Row::from_pairs([("age", "9")]);
        assert!(PredicateFilter::matches(&row, &cond("age", ">", "10")));
    }

    #[test]
    fn test_missing_field() {
        let row = Row::from_pairs([("name", "Alice")]);
        assert!(!PredicateFilter::matches(&row, &cond("age", "=", "30")));
        assert!(!PredicateFilter::matches(&row, &cond("age", ">", "0")));
        assert!(PredicateFilter::matches(&row, &cond("age", "!=", "30")));
    }

    #[test]
    fn test_null_cell() {
        let mut row = Row::new();
        row.insert("enrollment.course", Value::Null);
        assert!(!PredicateFilter::matches(&row, &cond("enrollment.course", "=", "Math")));
        assert!(PredicateFilter::matches(&row, &cond("enrollment.course", "!=", "Math")));
    }

    #[test]
    fn test_qualified_condition_uses_exact_key_only() {
        let row = Row::from_pairs([("age", "30")]);
        assert!(!PredicateFilter::matches(&row, &cond("student.age", "=", "30")));

        let row = Row::from_pairs([("student.age", "30")]);
        assert!(PredicateFilter::matches(&row, &cond("student.age", "=", "30")));
    }

    #[test]
    fn test_multiple_conditions_and() {
        let row = Row::from_pairs([("age", "25"), ("name", "Alice")]);
        let conds = vec![cond("age", ">=", "18"), cond("name", "=", "Alice")];
        assert!(PredicateFilter::matches_all(&row, &conds));

        let conds = vec![cond("age", ">=", "18"), cond("name", "=", "Bob")];
        assert!(!PredicateFilter::matches_all(&row, &conds));

        assert!(PredicateFilter::matches_all(&row, &[]));
    }
}
