//! Join execution
//!
//! Nested-loop equality joins between the FROM table (left) and the joined
//! table (right). Output rows carry `table.column` keys for each side that
//! took part, followed by the requested SELECT fields as written.
//!
//! Requested fields resolve against the left row when their qualifier is the
//! left table or absent, otherwise against the right row. A missing side or
//! column yields `Null`.

use crate::parser::{JoinCondition, JoinDescriptor, JoinType};
use crate::row::{split_qualified, Row, Value};

/// Executes one join between two loaded tables
pub struct JoinExecutor<'a> {
    join_type: JoinType,
    left_key: &'a str,
    right_key: &'a str,
    fields: &'a [String],
    left_table: &'a str,
    right_table: &'a str,
}

/// Column layout of each side, used for null padding
struct Shapes<'r> {
    left: Option<&'r Row>,
    right: Option<&'r Row>,
}

impl<'a> JoinExecutor<'a> {
    /// Creates an executor for an explicit condition.
    ///
    /// If the condition is written right-to-left (`ON right.x = left.y`) the
    /// sides are swapped so key extraction always reads the matching table.
    pub fn new(
        join_type: JoinType,
        condition: &'a JoinCondition,
        fields: &'a [String],
        left_table: &'a str,
        right_table: &'a str,
    ) -> Self {
        let (left_key, right_key) = orient(condition, left_table, right_table);
        Self {
            join_type,
            left_key,
            right_key,
            fields,
            left_table,
            right_table,
        }
    }

    /// Creates an executor from a parsed JOIN clause
    pub fn from_descriptor(
        descriptor: &'a JoinDescriptor,
        fields: &'a [String],
        left_table: &'a str,
    ) -> Self {
        Self::new(
            descriptor.join_type,
            &descriptor.condition,
            fields,
            left_table,
            &descriptor.table,
        )
    }

    /// Joins `left` with `right`.
    ///
    /// Output order follows the driving side (left for INNER/LEFT, right for
    /// RIGHT), then the input order of the other side.
    pub fn execute(&self, left: &[Row], right: &[Row]) -> Vec<Row> {
        let shapes = Shapes {
            left: left.first(),
            right: right.first(),
        };
        let mut output = Vec::new();

        match self.join_type {
            JoinType::Inner => {
                for l in left {
                    for r in right.iter().filter(|r| self.keys_match(l, r)) {
                        output.push(self.combine(Some(l), Some(r), &shapes));
                    }
                }
            }
            JoinType::Left => {
                for l in left {
                    let before = output.len();
                    for r in right.iter().filter(|r| self.keys_match(l, r)) {
                        output.push(self.combine(Some(l), Some(r), &shapes));
                    }
                    if output.len() == before {
                        output.push(self.combine(Some(l), None, &shapes));
                    }
                }
            }
            JoinType::Right => {
                for r in right {
                    let before = output.len();
                    for l in left.iter().filter(|l| self.keys_match(l, r)) {
                        output.push(self.combine(Some(l), Some(r), &shapes));
                    }
                    if output.len() == before {
                        output.push(self.combine(None, Some(r), &shapes));
                    }
                }
            }
        }

        output
    }

    /// Null or missing keys never match
    fn keys_match(&self, left: &Row, right: &Row) -> bool {
        match (left.lookup(self.left_key), right.lookup(self.right_key)) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        }
    }

    fn combine(&self, left: Option<&Row>, right: Option<&Row>, shapes: &Shapes<'_>) -> Row {
        let mut row = Row::new();
        add_side(&mut row, self.left_table, left, shapes.left);
        add_side(&mut row, self.right_table, right, shapes.right);

        for field in self.fields {
            let side = match split_qualified(field) {
                (Some(table), _) if table != self.left_table => right,
                _ => left,
            };
            let value = side
                .and_then(|r| r.lookup(field))
                .cloned()
                .unwrap_or(Value::Null);
            row.insert(field.as_str(), value);
        }

        row
    }
}

/// Adds `table.column` cells for one side. A missing side is padded with
/// nulls shaped like the first row of that table.
fn add_side(out: &mut Row, table: &str, side: Option<&Row>, shape: Option<&Row>) {
    match (side, shape) {
        (Some(row), _) => {
            for (key, value) in row.iter() {
                out.insert(qualify(table, key), value.clone());
            }
        }
        (None, Some(shape)) => {
            for key in shape.keys() {
                out.insert(qualify(table, key), Value::Null);
            }
        }
        (None, None) => {}
    }
}

fn qualify(table: &str, key: &str) -> String {
    if key.contains('.') {
        key.to_string()
    } else {
        format!("{}.{}", table, key)
    }
}

fn orient<'c>(
    condition: &'c JoinCondition,
    left_table: &str,
    right_table: &str,
) -> (&'c str, &'c str) {
    let (left_q, _) = split_qualified(&condition.left);
    let (right_q, _) = split_qualified(&condition.right);
    if left_q == Some(right_table) && right_q == Some(left_table) && left_table != right_table {
        (condition.right.as_str(), condition.left.as_str())
    } else {
        (condition.left.as_str(), condition.right.as_str())
    }
}
