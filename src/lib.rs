//! flatsql - a small SQL engine over flat tables
//!
//! Supports `SELECT ... FROM` with one `INNER`/`LEFT`/`RIGHT JOIN`, `WHERE`
//! conditions combined with AND, and `GROUP BY` with SUM/MIN/MAX/COUNT.
//! Tables are read through a [`table::TableSource`], such as a directory of
//! CSV files.

pub mod cli;
pub mod config;
pub mod executor;
pub mod observability;
pub mod parser;
pub mod row;
pub mod table;
