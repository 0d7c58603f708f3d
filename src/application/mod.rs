pub mod use_cases;

pub use use_cases::credentials::CredentialUseCase;
pub use use_cases::ingest_run::IngestRunUseCase;
pub use use_cases::tenants::TenantUseCase;
