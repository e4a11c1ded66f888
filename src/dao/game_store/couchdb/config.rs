use std::env;

/// Connection settings for the CouchDB backend.
#[derive(Debug, Clone)]
pub struct CouchConfig {
    /// Server base URL without a trailing slash.
    pub base_url: String,
    /// Database holding the game documents.
    pub database: String,
    /// Optional basic-auth username.
    pub username: Option<String>,
    /// Optional basic-auth password.
    pub password: Option<String>,
}

impl CouchConfig {
    /// Build the configuration from `COUCH_URL` / `COUCH_DATABASE` /
    /// `COUCH_USERNAME` / `COUCH_PASSWORD`.
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("COUCH_URL").unwrap_or_else(|_| "http://localhost:5984".into()),
            database: env::var("COUCH_DATABASE").unwrap_or_else(|_| "gifbattle".into()),
            username: env::var("COUCH_USERNAME").ok(),
            password: env::var("COUCH_PASSWORD").ok(),
        }
    }
}
