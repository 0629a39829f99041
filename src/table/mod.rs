//! Table sources
//!
//! The engine reads table data only through [`TableSource`]. Loading is the
//! single suspension point of a query; implementations must be reentrant so
//! independent queries can share one source.

mod csv_source;
mod errors;
mod memory;

use std::future::Future;
use std::pin::Pin;

use crate::row::Row;

pub use csv_source::CsvTableSource;
pub use errors::{TableError, TableResult};
pub use memory::MemoryTableSource;

/// Future returned by [`TableSource::load_table`]
pub type LoadFuture<'a> = Pin<Box<dyn Future<Output = TableResult<Vec<Row>>> + Send + 'a>>;

/// Provides the rows of a named table
pub trait TableSource: Send + Sync {
    /// Loads every row of `name`, in source order
    fn load_table<'a>(&'a self, name: &'a str) -> LoadFuture<'a>;
}
