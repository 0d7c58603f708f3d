use serde::{Deserialize, Serialize};

/// A stored ingest credential. The raw token is never persisted; only the
/// argon2id hash and a non-secret lookup fingerprint survive issuance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Credential {
    pub id: String,
    pub project_id: String,
    /// Argon2id PHC string with embedded salt. Skipped during serialization
    /// to prevent exposure.
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub token_fingerprint: String,
    pub created_at: String,
}

/// Issuance result handed back to the caller exactly once.
#[derive(Debug, Serialize)]
pub struct IssuedToken {
    pub credential_id: String,
    pub token: String,
}
