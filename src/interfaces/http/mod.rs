use crate::application::use_cases::credentials::CredentialUseCase;
use crate::application::use_cases::ingest_run::IngestRunUseCase;
use crate::application::use_cases::tenants::TenantUseCase;
use crate::domain::error::AppError;
use actix_cors::Cors;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{dev::Server, get, post, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::error;

pub struct HttpState {
    pub tenants: TenantUseCase,
    pub credentials: Arc<CredentialUseCase>,
    pub ingest: IngestRunUseCase,
    pub pool: SqlitePool,
}

#[derive(Deserialize)]
pub struct CreateOrgRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub org_id: String,
    pub name: String,
}

#[post("/orgs")]
async fn create_org(data: web::Data<HttpState>, req: web::Json<CreateOrgRequest>) -> impl Responder {
    match data.tenants.create_org(&req.name).await {
        Ok(org) => HttpResponse::Created().json(org),
        Err(e) => error_response(&e),
    }
}

#[get("/orgs/{id}")]
async fn get_org(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    match data.tenants.get_org(&path).await {
        Ok(org) => HttpResponse::Ok().json(org),
        Err(e) => error_response(&e),
    }
}

#[post("/projects")]
async fn create_project(
    data: web::Data<HttpState>,
    req: web::Json<CreateProjectRequest>,
) -> impl Responder {
    match data.tenants.create_project(&req.org_id, &req.name).await {
        Ok(project) => HttpResponse::Created().json(project),
        Err(e) => error_response(&e),
    }
}

#[get("/projects/{id}")]
async fn get_project(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    match data.tenants.get_project(&path).await {
        Ok(project) => HttpResponse::Ok().json(project),
        Err(e) => error_response(&e),
    }
}

#[post("/projects/{id}/tokens")]
async fn issue_token(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    match data.credentials.issue(&path).await {
        Ok(issued) => HttpResponse::Created().json(issued),
        Err(e) => error_response(&e),
    }
}

#[post("/runs")]
async fn ingest_run(
    data: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let token = bearer_token(&req);
    match data.ingest.ingest(token, &body).await {
        Ok(receipt) if receipt.duplicate => HttpResponse::Ok().json(receipt),
        Ok(receipt) => HttpResponse::Created().json(receipt),
        Err(e) => error_response(&e),
    }
}

#[get("/health")]
async fn health(data: web::Data<HttpState>) -> impl Responder {
    match sqlx::query("SELECT 1").execute(&data.pool).await {
        Ok(_) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => {
            error!(error = %e, "Health check failed");
            HttpResponse::ServiceUnavailable().json(json!({"status": "degraded"}))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Maps the error taxonomy to HTTP statuses with a stable machine-readable
/// discriminator. Internal detail is logged, never returned to the client.
fn error_response(err: &AppError) -> HttpResponse {
    match err {
        AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
            "error": "unauthorized",
            "message": msg,
        })),
        AppError::ValidationError(errors) => HttpResponse::BadRequest().json(json!({
            "error": "validation_failed",
            "message": "Request failed validation",
            "details": errors,
        })),
        AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
            "error": "not_found",
            "message": msg,
        })),
        AppError::Internal(_)
        | AppError::SecurityError(_)
        | AppError::DatabaseError(_)
        | AppError::IoError(_) => {
            error!(error = %err, "Request failed with internal fault");
            HttpResponse::InternalServerError().json(json!({
                "error": "internal",
                "message": "Internal server error",
            }))
        }
    }
}

pub fn start_server(state: HttpState, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new().wrap(cors).app_data(state.clone()).service(
            web::scope("/api/v1")
                .service(create_org)
                .service(get_org)
                .service(create_project)
                .service(get_project)
                .service(issue_token)
                .service(ingest_run)
                .service(health),
        )
    })
    .bind((host, port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_extraction() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer rbk_abc123"))
            .to_http_request();
        assert_eq!(bearer_token(&req), Some("rbk_abc123"));
    }

    #[test]
    fn test_bearer_token_missing_or_malformed() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer "))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);
    }
}
