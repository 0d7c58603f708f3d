use crate::domain::credential::{Credential, IssuedToken};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::db::credentials::CredentialRepository;
use crate::infrastructure::db::tenants::TenantRepository;
use crate::infrastructure::security::tokens::{
    generate_raw_token, hash_token, token_fingerprint, verify_token, TOKEN_PREFIX,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct CredentialUseCase {
    credentials: Arc<CredentialRepository>,
    tenants: Arc<TenantRepository>,
}

impl CredentialUseCase {
    pub fn new(credentials: Arc<CredentialRepository>, tenants: Arc<TenantRepository>) -> Self {
        Self {
            credentials,
            tenants,
        }
    }

    /// Mints a new ingest token for an existing project. The raw token is
    /// returned exactly once; only its argon2id hash and lookup fingerprint
    /// are persisted.
    pub async fn issue(&self, project_id: &str) -> Result<IssuedToken> {
        let project_id = project_id.trim();
        if project_id.is_empty() {
            return Err(AppError::validation("Project id is required."));
        }
        if !self.tenants.project_exists(project_id).await? {
            return Err(AppError::NotFound(format!(
                "Project not found: {}",
                project_id
            )));
        }

        let raw_token = generate_raw_token();
        let fingerprint = token_fingerprint(&raw_token);
        let token_for_hash = raw_token.clone();
        let token_hash = tokio::task::spawn_blocking(move || hash_token(&token_for_hash))
            .await
            .map_err(|e| AppError::Internal(format!("Token hashing task failed: {e}")))??;

        let credential = Credential {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            token_hash,
            token_fingerprint: fingerprint,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.credentials.insert(&credential).await?;

        info!(
            credential_id = %credential.id,
            project_id = %credential.project_id,
            "Issued ingest token"
        );

        Ok(IssuedToken {
            credential_id: credential.id,
            token: raw_token,
        })
    }

    /// Resolves a presented token to its owning project. The fingerprint
    /// bounds the candidate set; each candidate still goes through the full
    /// argon2 verification on a blocking thread.
    pub async fn resolve(&self, raw_token: &str) -> Result<String> {
        let raw_token = raw_token.trim();
        if raw_token.is_empty() || !raw_token.starts_with(TOKEN_PREFIX) {
            return Err(AppError::Unauthorized("Malformed ingest token".to_string()));
        }

        let fingerprint = token_fingerprint(raw_token);
        let candidates = self.credentials.find_by_fingerprint(&fingerprint).await?;
        if candidates.is_empty() {
            return Err(AppError::Unauthorized("Unknown ingest token".to_string()));
        }

        let raw_owned = raw_token.to_string();
        let project_id = tokio::task::spawn_blocking(move || {
            candidates
                .into_iter()
                .find(|candidate| verify_token(&raw_owned, &candidate.token_hash))
                .map(|candidate| candidate.project_id)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Token verification task failed: {e}")))?;

        project_id.ok_or_else(|| AppError::Unauthorized("Unknown ingest token".to_string()))
    }
}
