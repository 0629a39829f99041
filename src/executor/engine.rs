//! Query engine
//!
//! Runs one query end to end: parse, load, join, filter, group, project.
//! Parse errors are raised before any table is touched. Table errors abort
//! the call; no partial result is returned.

use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::parser::{parse_query, ExplainPlan, QueryPlan};
use crate::row::Row;
use crate::table::{TableResult, TableSource};

use super::aggregate::aggregate;
use super::errors::EngineResult;
use super::filters::PredicateFilter;
use super::join::JoinExecutor;
use super::projector::Projector;
use super::result::ExecutionResult;

/// Executes queries against a table source.
///
/// The engine only borrows the source, so one source can serve any number of
/// concurrent queries.
pub struct QueryEngine<'a, S: TableSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: TableSource + ?Sized> QueryEngine<'a, S> {
    /// Creates an engine over `source`
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Parses and executes `query`
    pub async fn execute(&self, query: &str) -> EngineResult<ExecutionResult> {
        let scope = ObservationScope::with_fields("QUERY", &[("query", query)]);

        let plan = match parse_query(query) {
            Ok(plan) => plan,
            Err(err) => {
                scope.reject(err.code().code(), err.message());
                return Err(err.into());
            }
        };

        let stages = stage_list(&plan);
        log_event_with_fields(
            Event::QueryParsed,
            &[("table", plan.table.as_str()), ("stages", stages.as_str())],
        );

        let (rows, joined) = match self.load_tables(&plan).await {
            Ok(tables) => tables,
            Err(err) => {
                scope.fail(err.code(), &err.to_string());
                return Err(err.into());
            }
        };

        let result = run_pipeline(&plan, rows, joined);

        let count = result.len().to_string();
        scope.complete_with_fields(&[("rows", count.as_str())]);
        Ok(result)
    }

    /// Loads the FROM table and, if present, the joined table.
    ///
    /// Both loads run concurrently; the first error wins.
    async fn load_tables(&self, plan: &QueryPlan) -> TableResult<(Vec<Row>, Option<Vec<Row>>)> {
        match &plan.join {
            Some(join) => {
                let (rows, joined) =
                    tokio::try_join!(self.load(&plan.table), self.load(&join.table))?;
                Ok((rows, Some(joined)))
            }
            None => Ok((self.load(&plan.table).await?, None)),
        }
    }

    async fn load(&self, name: &str) -> TableResult<Vec<Row>> {
        let rows = self.source.load_table(name).await?;
        let count = rows.len().to_string();
        log_event_with_fields(Event::TableLoaded, &[("table", name), ("rows", count.as_str())]);
        Ok(rows)
    }
}

/// Describes how `query` would run without touching any table
pub fn explain(query: &str) -> ExplainPlan {
    let explain = match parse_query(query) {
        Ok(plan) => ExplainPlan::from_plan(&plan),
        Err(err) => ExplainPlan::from_error(&err),
    };
    let accepted = if explain.accepted { "true" } else { "false" };
    log_event_with_fields(Event::ExplainComplete, &[("accepted", accepted)]);
    explain
}

/// Runs the in-memory stages of a parsed plan.
///
/// `joined` holds the rows of the joined table; it is ignored when the plan
/// has no join and treated as empty when missing.
pub fn run_pipeline(plan: &QueryPlan, rows: Vec<Row>, joined: Option<Vec<Row>>) -> ExecutionResult {
    let loaded_count = rows.len();

    let (rows, joined_count) = match &plan.join {
        Some(join) => {
            let right = joined.unwrap_or_default();
            let output = JoinExecutor::from_descriptor(join, &plan.fields, &plan.table)
                .execute(&rows, &right);
            let count = output.len().to_string();
            log_event_with_fields(
                Event::JoinComplete,
                &[("join_type", join.join_type.as_str()), ("rows", count.as_str())],
            );
            let joined_count = output.len();
            (output, Some(joined_count))
        }
        None => (rows, None),
    };

    let filtered: Vec<Row> = rows
        .into_iter()
        .filter(|row| PredicateFilter::matches_all(row, &plan.where_clauses))
        .collect();
    let filtered_count = filtered.len();
    let count = filtered_count.to_string();
    log_event_with_fields(Event::FilterComplete, &[("rows", count.as_str())]);

    let (rows, group_count) = match &plan.group_by_fields {
        Some(group_by) => {
            let groups = aggregate(&filtered, group_by, &plan.fields);
            let count = groups.len().to_string();
            log_event_with_fields(Event::GroupComplete, &[("groups", count.as_str())]);
            let group_count = groups.len();
            (groups, Some(group_count))
        }
        None => (filtered, None),
    };

    ExecutionResult {
        rows: Projector::project(&rows, &plan.fields),
        loaded_count,
        joined_count,
        filtered_count,
        group_count,
    }
}

fn stage_list(plan: &QueryPlan) -> String {
    plan.stages()
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::EngineError;
    use crate::parser::ParserErrorCode;
    use crate::row::Value;
    use crate::table::{MemoryTableSource, TableError};

    fn school() -> MemoryTableSource {
        MemoryTableSource::new()
            .with_table(
                "student",
                vec![
                    Row::from_pairs([("id", "1"), ("name", "John")]),
                    Row::from_pairs([("id", "2"), ("name", "Jane")]),
                ],
            )
            .with_table(
                "enrollment",
                vec![
                    Row::from_pairs([("student_id", "1"), ("course", "Math")]),
                    Row::from_pairs([("student_id", "1"), ("course", "Physics")]),
                    Row::from_pairs([("student_id", "9"), ("course", "Art")]),
                ],
            )
    }

    fn text(row: &Row, key: &str) -> Option<String> {
        row.get(key).and_then(|v| v.as_text()).map(str::to_string)
    }

    #[tokio::test]
    async fn test_filter_and_project() {
        let source = MemoryTableSource::new().with_table(
            "student",
            vec![
                Row::from_pairs([("name", "A"), ("age", "19")]),
                Row::from_pairs([("name", "B"), ("age", "22")]),
            ],
        );
        let engine = QueryEngine::new(&source);

        let result = engine
            .execute("SELECT name, age FROM student WHERE age > 20")
            .await
            .unwrap();

        assert_eq!(result.rows, vec![Row::from_pairs([("name", "B"), ("age", "22")])]);
        assert_eq!(result.loaded_count, 2);
        assert_eq!(result.filtered_count, 1);
        assert!(result.joined_count.is_none());
        assert!(result.group_count.is_none());
    }

    #[tokio::test]
    async fn test_inner_join_one_to_many() {
        let source = school();
        let engine = QueryEngine::new(&source);

        let result = engine
            .execute(
                "SELECT student.name, enrollment.course FROM student \
                 INNER JOIN enrollment ON student.id = enrollment.student_id",
            )
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(text(&result.rows[0], "student.name").as_deref(), Some("John"));
        assert_eq!(text(&result.rows[1], "student.name").as_deref(), Some("John"));
        assert_eq!(text(&result.rows[0], "enrollment.course").as_deref(), Some("Math"));
        assert_eq!(text(&result.rows[1], "enrollment.course").as_deref(), Some("Physics"));

        let keys: Vec<&str> = result.rows[0].keys().collect();
        assert_eq!(keys, vec!["student.name", "enrollment.course"]);
        assert_eq!(result.joined_count, Some(2));
    }

    #[tokio::test]
    async fn test_left_join_then_filter_on_joined_column() {
        let source = school();
        let engine = QueryEngine::new(&source);

        let result = engine
            .execute(
                "SELECT student.name, enrollment.course FROM student \
                 LEFT JOIN enrollment ON student.id = enrollment.student_id \
                 WHERE student.name = Jane",
            )
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(text(&result.rows[0], "student.name").as_deref(), Some("Jane"));
        assert_eq!(result.rows[0].get("enrollment.course"), Some(&Value::Null));
        assert_eq!(result.joined_count, Some(3));
    }

    #[tokio::test]
    async fn test_group_by_count() {
        let source = MemoryTableSource::new().with_table(
            "employee",
            vec![
                Row::from_pairs([("dept", "eng")]),
                Row::from_pairs([("dept", "eng")]),
                Row::from_pairs([("dept", "hr")]),
            ],
        );
        let engine = QueryEngine::new(&source);

        let result = engine
            .execute("SELECT dept, COUNT(*) FROM employee GROUP BY dept")
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(text(&result.rows[0], "dept").as_deref(), Some("eng"));
        assert_eq!(result.rows[0].get("COUNT(*)"), Some(&Value::Number(2.0)));
        assert_eq!(text(&result.rows[1], "dept").as_deref(), Some("hr"));
        assert_eq!(result.rows[1].get("COUNT(*)"), Some(&Value::Number(1.0)));
        assert_eq!(result.group_count, Some(2));
    }

    #[tokio::test]
    async fn test_invalid_operator_rejected_before_load() {
        // No tables at all: a load attempt would surface as NotFound
        let source = MemoryTableSource::new();
        let engine = QueryEngine::new(&source);

        let err = engine
            .execute("SELECT name FROM student WHERE age <> 20")
            .await
            .unwrap_err();

        match err {
            EngineError::Parse(e) => assert_eq!(e.code(), ParserErrorCode::InvalidOperator),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_join_without_on_is_malformed() {
        let source = MemoryTableSource::new();
        let engine = QueryEngine::new(&source);

        let err = engine
            .execute(
                "SELECT student.name FROM student \
                 INNER JOIN enrollment student.id = enrollment.student_id",
            )
            .await
            .unwrap_err();

        assert!(err.is_rejection());
        assert_eq!(err.code(), "FLATSQL_MALFORMED_QUERY");
    }

    #[tokio::test]
    async fn test_missing_table_propagates() {
        let source = school();
        let engine = QueryEngine::new(&source);

        let err = engine
            .execute("SELECT a.x FROM student INNER JOIN course ON student.id = course.id")
            .await
            .unwrap_err();

        match err {
            EngineError::Table(TableError::NotFound(name)) => assert_eq!(name, "course"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_run_pipeline_without_joined_rows() {
        let plan = parse_query(
            "SELECT student.name FROM student RIGHT JOIN enrollment ON student.id = enrollment.student_id",
        )
        .unwrap();
        let rows = vec![Row::from_pairs([("id", "1"), ("name", "John")])];

        let result = run_pipeline(&plan, rows, None);
        assert!(result.is_empty());
        assert_eq!(result.joined_count, Some(0));
    }

    #[test]
    fn test_explain_does_not_need_tables() {
        let plan = explain("SELECT dept, SUM(salary) FROM employee GROUP BY dept");
        assert!(plan.accepted);
        assert_eq!(plan.stages, vec!["PARSED", "FILTERED", "GROUPED", "PROJECTED"]);

        let plan = explain("SELECT name FROM student WHERE age => 3");
        assert!(!plan.accepted);
        assert_eq!(plan.rejection_code.as_deref(), Some("FLATSQL_INVALID_OPERATOR"));
    }
}
