use std::sync::Arc;

use actix_web::dev::Server;
use tracing::info;

use crate::application::use_cases::credentials::CredentialUseCase;
use crate::application::use_cases::ingest_run::IngestRunUseCase;
use crate::application::use_cases::metrics::{CounterMetrics, SharedMetrics};
use crate::application::use_cases::tenants::TenantUseCase;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::connection::init_db;
use crate::infrastructure::db::credentials::CredentialRepository;
use crate::infrastructure::db::runs::RunRepository;
use crate::infrastructure::db::tenants::TenantRepository;
use crate::interfaces::http::{start_server, HttpState};

/// Wires the repositories and use cases onto one database pool and returns
/// the bound HTTP server, ready to be awaited.
pub async fn setup(config: &AppConfig) -> Result<Server> {
    let pool = init_db(&config.database_path).await?;
    info!(
        database = %config.database_path.display(),
        "Database initialized"
    );

    let tenant_repo = Arc::new(TenantRepository::new(pool.clone()));
    let credential_repo = Arc::new(CredentialRepository::new(pool.clone()));
    let run_repo = Arc::new(RunRepository::new(pool.clone()));
    let metrics: SharedMetrics = Arc::new(CounterMetrics::new());

    let credentials = Arc::new(CredentialUseCase::new(credential_repo, tenant_repo.clone()));
    let ingest = IngestRunUseCase::new(credentials.clone(), run_repo, metrics);

    let state = HttpState {
        tenants: TenantUseCase::new(tenant_repo),
        credentials,
        ingest,
        pool,
    };

    start_server(state, &config.host, config.port)
        .map_err(|e| AppError::Internal(format!("Failed to bind HTTP server: {e}")))
}
