use crate::domain::error::{AppError, Result};
use crate::domain::tenant::{Organization, Project};
use sqlx::SqlitePool;

pub struct TenantRepository {
    pool: SqlitePool,
}

impl TenantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_org(&self, org: &Organization) -> Result<()> {
        let result = sqlx::query("INSERT INTO organizations (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&org.id)
            .bind(&org.name)
            .bind(&org.created_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                AppError::validation(format!("Organization name already exists: {}", org.name)),
            ),
            Err(e) => Err(AppError::DatabaseError(format!(
                "Failed to insert organization: {e}"
            ))),
        }
    }

    pub async fn get_org(&self, org_id: &str) -> Result<Organization> {
        let org = sqlx::query_as::<_, OrgEntity>(
            "SELECT id, name, created_at FROM organizations WHERE id = ?",
        )
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch organization: {e}")))?;

        match org {
            Some(org) => Ok(org.into()),
            None => Err(AppError::NotFound(format!(
                "Organization not found: {}",
                org_id
            ))),
        }
    }

    pub async fn insert_project(&self, project: &Project) -> Result<()> {
        let result = sqlx::query(
            "INSERT INTO projects (id, org_id, name, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&project.id)
        .bind(&project.org_id)
        .bind(&project.name)
        .bind(&project.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::validation(format!(
                    "Project name already exists in this organization: {}",
                    project.name
                )))
            }
            Err(e) => Err(AppError::DatabaseError(format!(
                "Failed to insert project: {e}"
            ))),
        }
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Project> {
        let project = sqlx::query_as::<_, ProjectEntity>(
            "SELECT id, org_id, name, created_at FROM projects WHERE id = ?",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch project: {e}")))?;

        match project {
            Some(project) => Ok(project.into()),
            None => Err(AppError::NotFound(format!(
                "Project not found: {}",
                project_id
            ))),
        }
    }

    pub async fn project_exists(&self, project_id: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM projects WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to check project: {e}")))?;
        Ok(row.is_some())
    }
}

#[derive(sqlx::FromRow)]
struct OrgEntity {
    id: String,
    name: String,
    created_at: String,
}

impl From<OrgEntity> for Organization {
    fn from(entity: OrgEntity) -> Self {
        Organization {
            id: entity.id,
            name: entity.name,
            created_at: entity.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProjectEntity {
    id: String,
    org_id: String,
    name: String,
    created_at: String,
}

impl From<ProjectEntity> for Project {
    fn from(entity: ProjectEntity) -> Self {
        Project {
            id: entity.id,
            org_id: entity.org_id,
            name: entity.name,
            created_at: entity.created_at,
        }
    }
}
