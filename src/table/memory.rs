//! In-memory table source

use std::collections::HashMap;

use crate::row::Row;

use super::errors::TableError;
use super::{LoadFuture, TableSource};

/// Tables held in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemoryTableSource {
    tables: HashMap<String, Vec<Row>>,
}

impl MemoryTableSource {
    /// Creates an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table, replacing any table with the same name
    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        self.insert(name, rows);
        self
    }

    /// Adds a table, replacing any table with the same name
    pub fn insert(&mut self, name: impl Into<String>, rows: Vec<Row>) {
        self.tables.insert(name.into(), rows);
    }

    /// Returns true if a table with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }
}

impl TableSource for MemoryTableSource {
    fn load_table<'a>(&'a self, name: &'a str) -> LoadFuture<'a> {
        Box::pin(async move {
            self.tables
                .get(name)
                .cloned()
                .ok_or_else(|| TableError::NotFound(name.to_string()))
        })
    }
}
