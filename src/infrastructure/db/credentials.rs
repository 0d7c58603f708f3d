use crate::domain::credential::Credential;
use crate::domain::error::{AppError, Result};
use sqlx::SqlitePool;

pub struct CredentialRepository {
    pool: SqlitePool,
}

impl CredentialRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, credential: &Credential) -> Result<()> {
        sqlx::query(
            "INSERT INTO credentials (id, project_id, token_hash, token_fingerprint, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&credential.id)
        .bind(&credential.project_id)
        .bind(&credential.token_hash)
        .bind(&credential.token_fingerprint)
        .bind(&credential.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to insert credential: {e}")))?;

        Ok(())
    }

    /// Candidate rows sharing a fingerprint. Usually zero or one; a
    /// fingerprint collision only widens the set handed to the argon2
    /// verification.
    pub async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<Vec<Credential>> {
        let rows = sqlx::query_as::<_, CredentialEntity>(
            "SELECT id, project_id, token_hash, token_fingerprint, created_at
             FROM credentials WHERE token_fingerprint = ?",
        )
        .bind(fingerprint)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch credentials: {e}")))?;

        Ok(rows.into_iter().map(|row| row.into()).collect())
    }
}

#[derive(sqlx::FromRow)]
struct CredentialEntity {
    id: String,
    project_id: String,
    token_hash: String,
    token_fingerprint: String,
    created_at: String,
}

impl From<CredentialEntity> for Credential {
    fn from(entity: CredentialEntity) -> Self {
        Credential {
            id: entity.id,
            project_id: entity.project_id,
            token_hash: entity.token_hash,
            token_fingerprint: entity.token_fingerprint,
            created_at: entity.created_at,
        }
    }
}
