pub mod analytics;
pub mod auth;
pub mod error;
pub mod politicians;
pub mod polls;

use civica_db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Shared secret for validating bearer tokens. Token issuance lives in
    /// the external auth service; this server only verifies claims.
    pub jwt_secret: String,
}
