//! Ingestion orchestrator: authenticate, validate, insert, classify.
//!
//! Per-request state machine:
//! - resolve the bearer token to a project, or stop with Unauthorized
//! - validate the payload, or stop with every violation collected
//! - attempt the atomic insert; Created and Duplicate are both success
//!
//! No retries happen here. The (project_id, run_id) constraint makes
//! client-side retry safe, which is the whole contract.

use crate::application::use_cases::credentials::CredentialUseCase;
use crate::application::use_cases::metrics::SharedMetrics;
use crate::application::use_cases::run_validation::validate_run;
use crate::domain::error::{AppError, Result};
use crate::domain::run::{RunInsert, RunSummary, TestRun};
use crate::infrastructure::db::runs::RunRepository;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub struct IngestReceipt {
    pub run_id: String,
    pub duplicate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RunSummary>,
}

pub struct IngestRunUseCase {
    credentials: Arc<CredentialUseCase>,
    runs: Arc<RunRepository>,
    metrics: SharedMetrics,
}

impl IngestRunUseCase {
    pub fn new(
        credentials: Arc<CredentialUseCase>,
        runs: Arc<RunRepository>,
        metrics: SharedMetrics,
    ) -> Self {
        Self {
            credentials,
            runs,
            metrics,
        }
    }

    pub async fn ingest(&self, raw_token: Option<&str>, payload: &Value) -> Result<IngestReceipt> {
        let Some(raw_token) = raw_token else {
            self.metrics.increment("ingest.auth_failed");
            return Err(AppError::Unauthorized(
                "Missing bearer token in Authorization header".to_string(),
            ));
        };

        let project_id = match self.credentials.resolve(raw_token).await {
            Ok(project_id) => project_id,
            Err(err) => {
                if matches!(err, AppError::Unauthorized(_)) {
                    self.metrics.increment("ingest.auth_failed");
                }
                return Err(err);
            }
        };

        let errors = validate_run(payload);
        if !errors.is_empty() {
            self.metrics.increment("ingest.rejected");
            warn!(
                project_id = %project_id,
                error_count = errors.len(),
                "Rejected run payload"
            );
            return Err(AppError::ValidationError(errors));
        }

        let run: TestRun = serde_json::from_value(payload.clone()).map_err(|e| {
            AppError::Internal(format!("Validated payload failed to deserialize: {e}"))
        })?;

        // The insert runs on a detached task so a client disconnect cannot
        // abandon it mid-flight; the spawned write always runs to completion
        // and only the result is discarded.
        let runs = self.runs.clone();
        let insert_project_id = project_id.clone();
        let insert_run = run.clone();
        let outcome =
            tokio::spawn(async move { runs.insert(&insert_project_id, &insert_run).await })
                .await
                .map_err(|e| AppError::Internal(format!("Run insert task failed: {e}")))??;

        match outcome {
            RunInsert::Created => {
                self.metrics.increment("ingest.accepted");
                info!(
                    project_id = %project_id,
                    run_id = %run.run_id,
                    "Stored new test run"
                );
                Ok(IngestReceipt {
                    run_id: run.run_id,
                    duplicate: false,
                    environment: Some(run.environment),
                    summary: Some(run.summary),
                })
            }
            RunInsert::Duplicate => {
                self.metrics.increment("ingest.duplicate");
                info!(
                    project_id = %project_id,
                    run_id = %run.run_id,
                    "Ignored replayed test run"
                );
                Ok(IngestReceipt {
                    run_id: run.run_id,
                    duplicate: true,
                    environment: None,
                    summary: None,
                })
            }
        }
    }
}
