use crate::domain::error::{AppError, Result};
use crate::domain::tenant::{Organization, Project};
use crate::infrastructure::db::tenants::TenantRepository;
use std::sync::Arc;
use uuid::Uuid;

/// Thin create/lookup service for the tenant directory. Uniqueness is
/// enforced by the organizations/projects table constraints.
pub struct TenantUseCase {
    repository: Arc<TenantRepository>,
}

impl TenantUseCase {
    pub fn new(repository: Arc<TenantRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_org(&self, name: &str) -> Result<Organization> {
        let name = normalize_required(name, "Organization name is required.")?;
        let org = Organization {
            id: Uuid::new_v4().to_string(),
            name,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.repository.insert_org(&org).await?;
        Ok(org)
    }

    pub async fn get_org(&self, org_id: &str) -> Result<Organization> {
        let org_id = org_id.trim();
        if org_id.is_empty() {
            return Err(AppError::validation("Organization id is required."));
        }
        self.repository.get_org(org_id).await
    }

    pub async fn create_project(&self, org_id: &str, name: &str) -> Result<Project> {
        let org_id = org_id.trim();
        if org_id.is_empty() {
            return Err(AppError::validation("Organization id is required."));
        }
        let name = normalize_required(name, "Project name is required.")?;

        // Surface a missing parent as NotFound before the insert hits the
        // foreign key.
        self.repository.get_org(org_id).await?;

        let project = Project {
            id: Uuid::new_v4().to_string(),
            org_id: org_id.to_string(),
            name,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.repository.insert_project(&project).await?;
        Ok(project)
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Project> {
        let project_id = project_id.trim();
        if project_id.is_empty() {
            return Err(AppError::validation("Project id is required."));
        }
        self.repository.get_project(project_id).await
    }
}

fn normalize_required(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(message));
    }
    Ok(trimmed.to_string())
}
