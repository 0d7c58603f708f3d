use crate::domain::error::{AppError, Result};
use crate::domain::run::{RunInsert, RunSummary, TestRun, TestSuite};
use chrono::Utc;
use sqlx::SqlitePool;

pub struct RunRepository {
    pool: SqlitePool,
}

impl RunRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Single atomic insert keyed on (project_id, run_id). The primary key
    /// constraint is the only uniqueness check; a violation is reported as
    /// `Duplicate` via the typed sqlx error, never by message sniffing.
    pub async fn insert(&self, project_id: &str, run: &TestRun) -> Result<RunInsert> {
        let suites_json = if run.test_suites.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&run.test_suites).map_err(|e| {
                AppError::Internal(format!("Failed to serialize test suites: {e}"))
            })?)
        };

        let result = sqlx::query(
            "INSERT INTO test_runs (project_id, run_id, environment, started_at,
                 total_test_cases, passed, failed, flaky, skipped, duration_ms,
                 suites_json, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(project_id)
        .bind(&run.run_id)
        .bind(&run.environment)
        .bind(&run.started_at)
        .bind(run.summary.total_test_cases as i64)
        .bind(run.summary.passed as i64)
        .bind(run.summary.failed as i64)
        .bind(run.summary.flaky as i64)
        .bind(run.summary.skipped as i64)
        .bind(run.summary.duration_ms as i64)
        .bind(suites_json)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(RunInsert::Created),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(RunInsert::Duplicate)
            }
            Err(e) => Err(AppError::DatabaseError(format!(
                "Failed to insert test run: {e}"
            ))),
        }
    }

    pub async fn fetch(&self, project_id: &str, run_id: &str) -> Result<TestRun> {
        let row = sqlx::query_as::<_, RunEntity>(
            "SELECT run_id, environment, started_at, total_test_cases,
                 passed, failed, flaky, skipped, duration_ms, suites_json
             FROM test_runs WHERE project_id = ? AND run_id = ?",
        )
        .bind(project_id)
        .bind(run_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch test run: {e}")))?;

        match row {
            Some(row) => row.try_into(),
            None => Err(AppError::NotFound(format!("Test run not found: {}", run_id))),
        }
    }

    pub async fn count_for_run(&self, project_id: &str, run_id: &str) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM test_runs WHERE project_id = ? AND run_id = ?",
        )
        .bind(project_id)
        .bind(run_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to count test runs: {e}")))?;
        Ok(count.0)
    }
}

#[derive(sqlx::FromRow)]
struct RunEntity {
    run_id: String,
    environment: String,
    started_at: String,
    total_test_cases: i64,
    passed: i64,
    failed: i64,
    flaky: i64,
    skipped: i64,
    duration_ms: i64,
    suites_json: Option<String>,
}

impl TryFrom<RunEntity> for TestRun {
    type Error = AppError;

    fn try_from(entity: RunEntity) -> Result<TestRun> {
        let test_suites: Vec<TestSuite> = match entity.suites_json {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                AppError::Internal(format!("Stored test suites failed to parse: {e}"))
            })?,
            None => Vec::new(),
        };

        Ok(TestRun {
            run_id: entity.run_id,
            environment: entity.environment,
            started_at: entity.started_at,
            summary: RunSummary {
                total_test_cases: entity.total_test_cases as u64,
                passed: entity.passed as u64,
                failed: entity.failed as u64,
                flaky: entity.flaky as u64,
                skipped: entity.skipped as u64,
                duration_ms: entity.duration_ms as u64,
            },
            test_suites,
        })
    }
}
