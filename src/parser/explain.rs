//! Explain output
//!
//! Produces deterministic, human-readable descriptions of parsed plans.

use std::fmt;

use super::ast::QueryPlan;
use super::errors::ParserError;

/// Explain plan output
#[derive(Debug, Clone)]
pub struct ExplainPlan {
    /// Whether parsing succeeded
    pub accepted: bool,
    /// Source table
    pub table: Option<String>,
    /// SELECT list
    pub fields: Vec<String>,
    /// Join description
    pub join: Option<String>,
    /// WHERE conditions
    pub conditions: Vec<String>,
    /// GROUP BY fields
    pub group_by: Option<Vec<String>>,
    /// Pipeline stages in execution order
    pub stages: Vec<String>,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from a parsed query
    pub fn from_plan(plan: &QueryPlan) -> Self {
        let join = plan.join.as_ref().map(|j| {
            format!(
                "{} JOIN {} ON {} = {}",
                j.join_type.as_str(),
                j.table,
                j.condition.left,
                j.condition.right
            )
        });

        Self {
            accepted: true,
            table: Some(plan.table.clone()),
            fields: plan.fields.clone(),
            join,
            conditions: plan.where_clauses.iter().map(|c| c.to_string()).collect(),
            group_by: plan.group_by_fields.clone(),
            stages: plan
                .stages()
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Creates an explain plan from a parse error
    pub fn from_error(err: &ParserError) -> Self {
        Self {
            accepted: false,
            table: None,
            fields: Vec::new(),
            join: None,
            conditions: Vec::new(),
            group_by: None,
            stages: Vec::new(),
            rejection_reason: Some(err.message().to_string()),
            rejection_code: Some(err.code().code().to_string()),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            if let Some(table) = &self.table {
                writeln!(f, "Table: {}", table)?;
            }
            writeln!(f, "Fields: {}", self.fields.join(", "))?;
            if let Some(join) = &self.join {
                writeln!(f, "Join: {}", join)?;
            }
            if !self.conditions.is_empty() {
                // OR is folded into AND at parse time
                writeln!(f, "Conditions (AND):")?;
                for cond in &self.conditions {
                    writeln!(f, "  - {}", cond)?;
                }
            }
            if let Some(group_by) = &self.group_by {
                writeln!(f, "Group By: {}", group_by.join(", "))?;
            }
            writeln!(f, "Stages: {}", self.stages.join(" -> "))?;
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        Ok(())
    }
}
