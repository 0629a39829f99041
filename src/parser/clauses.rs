//! Clause parsers
//!
//! Turn the spans produced by the splitter into plan components.

use super::ast::{CompareOp, Condition, JoinCondition, JoinDescriptor, JoinType};
use super::errors::{ParserError, ParserResult};
use super::splitter::words;

const OPERATOR_CHARS: &[char] = &['=', '!', '<', '>'];

/// Parses `SELECT <field-list> FROM <table>`
pub(crate) fn parse_select(head: &str) -> ParserResult<(Vec<String>, String)> {
    let ws = words(head);

    if !ws.first().is_some_and(|w| w.is("SELECT")) {
        return Err(ParserError::malformed("Query must start with SELECT"));
    }

    let from = ws
        .iter()
        .position(|w| w.is("FROM"))
        .ok_or_else(|| ParserError::malformed("Missing FROM clause"))?;

    let field_text = head[ws[0].end..ws[from].start].trim();
    if field_text.is_empty() {
        return Err(ParserError::malformed("Missing SELECT field list"));
    }
    let fields = split_list(field_text, "SELECT")?;

    let table = match &ws[from + 1..] {
        [table] => table.text.to_string(),
        [] => return Err(ParserError::malformed("Missing table name after FROM")),
        _ => {
            return Err(ParserError::malformed(format!(
                "Invalid FROM clause: '{}'",
                head[ws[from].end..].trim()
            )))
        }
    };

    Ok((fields, table))
}

/// Parses `<table> ON <table.field> = <table.field>`
pub(crate) fn parse_join(join_type: JoinType, body: &str) -> ParserResult<JoinDescriptor> {
    let ws = words(body);

    let on = ws.iter().position(|w| w.is("ON")).ok_or_else(|| {
        ParserError::malformed("JOIN clause requires ON <table.field> = <table.field>")
    })?;

    let table = match &ws[..on] {
        [table] => table.text.to_string(),
        _ => {
            return Err(ParserError::malformed(format!(
                "Invalid JOIN table: '{}'",
                body[..ws[on].start].trim()
            )))
        }
    };

    let condition_text = body[ws[on].end..].trim();
    let (left, right) = condition_text
        .split_once('=')
        .map(|(l, r)| (l.trim(), r.trim()))
        .filter(|(l, r)| is_qualified_field(l) && is_qualified_field(r))
        .ok_or_else(|| {
            ParserError::malformed(format!(
                "JOIN condition must be <table.field> = <table.field>, got '{}'",
                condition_text
            ))
        })?;

    Ok(JoinDescriptor {
        join_type,
        table,
        condition: JoinCondition {
            left: left.to_string(),
            right: right.to_string(),
        },
    })
}

/// Parses WHERE conditions. `AND` and `OR` are both treated as AND.
pub(crate) fn parse_where(body: &str) -> ParserResult<Vec<Condition>> {
    let mut segments = Vec::new();
    let mut segment_start = 0;

    for word in words(body) {
        if word.is("AND") || word.is("OR") {
            segments.push(&body[segment_start..word.start]);
            segment_start = word.end;
        }
    }
    segments.push(&body[segment_start..]);

    segments.into_iter().map(parse_condition).collect()
}

/// Parses one `<field><operator><value>` segment.
///
/// The operator is the longest run of operator characters following the
/// field, so `>=` is never read as `>` followed by `=`.
pub(crate) fn parse_condition(segment: &str) -> ParserResult<Condition> {
    let segment = segment.trim();
    let invalid = || ParserError::malformed(format!("Invalid WHERE condition: '{}'", segment));

    let op_start = segment.find(OPERATOR_CHARS).ok_or_else(invalid)?;
    let op_len: usize = segment[op_start..]
        .chars()
        .take_while(|c| OPERATOR_CHARS.contains(c))
        .map(char::len_utf8)
        .sum();
    let op_end = op_start + op_len;

    let field = segment[..op_start].trim();
    let op = CompareOp::from_symbol(&segment[op_start..op_end])?;
    let raw_value = segment[op_end..].trim();

    // `''` is a valid empty literal; only a missing value is rejected
    if field.is_empty() || raw_value.is_empty() {
        return Err(invalid());
    }

    Ok(Condition::new(field, op, unquote(raw_value)))
}

/// Parses the GROUP BY field list
pub(crate) fn parse_group_by(body: &str) -> ParserResult<Vec<String>> {
    split_list(body, "GROUP BY")
}

fn split_list(text: &str, clause: &str) -> ParserResult<Vec<String>> {
    text.split(',')
        .map(|field| {
            let field = field.trim();
            if field.is_empty() {
                Err(ParserError::malformed(format!(
                    "Empty field in {} list",
                    clause
                )))
            } else {
                Ok(field.to_string())
            }
        })
        .collect()
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn is_qualified_field(s: &str) -> bool {
    s.split_once('.')
        .is_some_and(|(table, column)| is_identifier(table) && is_identifier(column))
}

/// Strips one pair of matching surrounding quotes
fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
