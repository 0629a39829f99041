//! Query executor subsystem for flatsql
//!
//! Consumes a [`QueryPlan`](crate::parser::QueryPlan) and produces rows.
//!
//! # Execution flow (strict order)
//!
//! 1. Load the FROM table (and the joined table, concurrently)
//! 2. Join, if the plan has a JOIN clause
//! 3. Keep rows satisfying every WHERE condition
//! 4. Group and aggregate, if the plan has a GROUP BY clause
//! 5. Project to the SELECT list
//!
//! Input row order is preserved through every stage; groups come out in order
//! of first appearance.

mod aggregate;
mod engine;
mod errors;
mod filters;
mod join;
mod projector;
mod result;

pub use aggregate::{aggregate, group_key, AggregateExpr, AggregateFunc, GROUP_KEY_SEPARATOR};
pub use engine::{explain, run_pipeline, QueryEngine};
pub use errors::{EngineError, EngineResult};
pub use filters::PredicateFilter;
pub use join::JoinExecutor;
pub use projector::Projector;
pub use result::ExecutionResult;
