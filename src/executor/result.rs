//! Result types for query execution

use serde::Serialize;

use crate::row::Row;

/// Result of one query call
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionResult {
    /// Projected rows in output order
    pub rows: Vec<Row>,
    /// Rows loaded from the FROM table
    pub loaded_count: usize,
    /// Rows produced by the join stage, if any
    pub joined_count: Option<usize>,
    /// Rows surviving the WHERE stage
    pub filtered_count: usize,
    /// Groups produced by the GROUP BY stage, if any
    pub group_count: Option<usize>,
}

impl ExecutionResult {
    /// Returns true if no rows were produced
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns an iterator over the rows
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Consumes the result, returning the rows
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}
