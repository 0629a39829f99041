//! Query parser subsystem for flatsql
//!
//! Turns a query string into an immutable [`QueryPlan`].
//!
//! # Grammar
//!
//! ```text
//! SELECT <field>[, <field>...] FROM <table>
//!   [INNER|LEFT|RIGHT JOIN <table> ON <table.field> = <table.field>]
//!   [WHERE <field><op><value> [AND|OR <field><op><value>...]]
//!   [GROUP BY <field>[, <field>...]]
//! ```
//!
//! # Known limitations
//!
//! - `OR` is accepted but folded into `AND`; there is no precedence.
//! - Joins support a single equality condition only.
//! - Keywords inside WHERE values are not escaped.

mod ast;
mod clauses;
mod errors;
mod explain;
mod splitter;

pub use ast::{
    CompareOp, Condition, JoinCondition, JoinDescriptor, JoinType, QueryPlan, Stage,
};
pub use errors::{ParserError, ParserErrorCode, ParserResult, Severity};
pub use explain::ExplainPlan;

/// Parses a query into a plan.
///
/// Fails with `MalformedQuery`, `UnsupportedJoinType` or `InvalidOperator`
/// before any table is touched.
pub fn parse_query(query: &str) -> ParserResult<QueryPlan> {
    let query = query.trim();
    let spans = splitter::split_clauses(query)?;

    let (fields, table) = clauses::parse_select(spans.head)?;

    let join = spans
        .join
        .map(|(join_type, body)| clauses::parse_join(join_type, body))
        .transpose()?;

    let where_clauses = match spans.where_clause {
        Some(body) => clauses::parse_where(body)?,
        None => Vec::new(),
    };

    let group_by_fields = spans.group_by.map(clauses::parse_group_by).transpose()?;

    Ok(QueryPlan {
        fields,
        table,
        where_clauses,
        join,
        group_by_fields,
    })
}
