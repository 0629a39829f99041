//! GROUP BY aggregation
//!
//! Rows are bucketed by the concatenation of their group-by values. Each
//! bucket keeps a running count and per-field SUM/MIN/MAX. Values are coerced
//! to `f64`; anything non-numeric becomes NaN and stays NaN. The whole
//! trimmed cell must parse as a number, so a unit suffix like `"10kg"` is
//! NaN rather than 10.
//!
//! Group-by values are joined with [`GROUP_KEY_SEPARATOR`], so values that
//! contain it can land in the same bucket.

use std::collections::HashMap;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::row::{Row, Value};

/// Separator placed between group-by values when building a group key
pub const GROUP_KEY_SEPARATOR: char = '\u{1f}';

/// Supported aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunc {
    Sum,
    Min,
    Max,
    Count,
}

impl AggregateFunc {
    /// Case-insensitive name lookup. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SUM" => Some(AggregateFunc::Sum),
            "MIN" => Some(AggregateFunc::Min),
            "MAX" => Some(AggregateFunc::Max),
            "COUNT" => Some(AggregateFunc::Count),
            _ => None,
        }
    }
}

/// A parsed `FUNC(field)` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateExpr {
    /// Literal text, used as the output column name
    pub text: String,
    pub func: AggregateFunc,
    /// Argument; `*` for `COUNT(*)`
    pub field: String,
}

fn call_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\w+)\(\s*(\*|[\w.]+)\s*\)$").expect("aggregate pattern is valid")
    })
}

impl AggregateExpr {
    /// Parses a SELECT field. Plain fields and unknown functions yield `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = call_pattern().captures(text.trim())?;
        let func = AggregateFunc::from_name(&caps[1])?;
        Some(Self {
            text: text.to_string(),
            func,
            field: caps[2].to_string(),
        })
    }
}

/// Running state for one group
#[derive(Debug, Clone, Default)]
pub struct GroupAccumulator {
    group_values: Vec<(String, Value)>,
    count: u64,
    sums: HashMap<String, f64>,
    mins: HashMap<String, f64>,
    maxes: HashMap<String, f64>,
}

impl GroupAccumulator {
    fn new(row: &Row, group_by_fields: &[String]) -> Self {
        Self {
            group_values: group_by_fields
                .iter()
                .map(|f| (f.clone(), row.get(f).cloned().unwrap_or(Value::Null)))
                .collect(),
            ..Self::default()
        }
    }

    fn update(&mut self, row: &Row, exprs: &[AggregateExpr]) {
        self.count += 1;

        for expr in exprs {
            if expr.func == AggregateFunc::Count {
                continue;
            }
            let value = row.get(&expr.field).map_or(f64::NAN, Value::to_f64);
            let field = expr.field.clone();
            match expr.func {
                AggregateFunc::Sum => *self.sums.entry(field).or_insert(0.0) += value,
                AggregateFunc::Min => {
                    let slot = self.mins.entry(field).or_insert(value);
                    *slot = nan_min(*slot, value);
                }
                AggregateFunc::Max => {
                    let slot = self.maxes.entry(field).or_insert(value);
                    *slot = nan_max(*slot, value);
                }
                AggregateFunc::Count => {}
            }
        }
    }

    fn emit(&self, exprs: &[AggregateExpr]) -> Row {
        let mut row = Row::new();
        for (field, value) in &self.group_values {
            row.insert(field.as_str(), value.clone());
        }

        for expr in exprs {
            let value = match expr.func {
                AggregateFunc::Sum => self.sums.get(&expr.field),
                AggregateFunc::Min => self.mins.get(&expr.field),
                AggregateFunc::Max => self.maxes.get(&expr.field),
                AggregateFunc::Count => {
                    row.insert(expr.text.as_str(), Value::Number(self.count as f64));
                    continue;
                }
            };
            row.insert(
                expr.text.as_str(),
                value.map_or(Value::Null, |n| Value::Number(*n)),
            );
        }

        row
    }
}

fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Builds the composite key of a row
pub fn group_key(row: &Row, group_by_fields: &[String]) -> String {
    let mut key = String::new();
    for (i, field) in group_by_fields.iter().enumerate() {
        if i > 0 {
            key.push(GROUP_KEY_SEPARATOR);
        }
        if let Some(value) = row.get(field) {
            key.push_str(&value.to_string());
        }
    }
    key
}

/// Groups `rows` and computes every aggregate expression in `fields`.
///
/// `fields` is the SELECT list; entries that are not `SUM`/`MIN`/`MAX`/`COUNT`
/// calls are skipped. Groups are emitted in order of first appearance.
pub fn aggregate(rows: &[Row], group_by_fields: &[String], fields: &[String]) -> Vec<Row> {
    let exprs: Vec<AggregateExpr> = fields.iter().filter_map(|f| AggregateExpr::parse(f)).collect();
    let mut groups: IndexMap<String, GroupAccumulator> = IndexMap::new();

    for row in rows {
        groups
            .entry(group_key(row, group_by_fields))
            .or_insert_with(|| GroupAccumulator::new(row, group_by_fields))
            .update(row, &exprs);
    }

    groups.values().map(|group| group.emit(&exprs)).collect()
}
