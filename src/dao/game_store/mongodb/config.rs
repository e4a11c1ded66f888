use std::env;

/// Connection settings for the MongoDB backend.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Connection string.
    pub uri: String,
    /// Database holding the game collection.
    pub database_name: String,
}

impl MongoConfig {
    /// Build the configuration from `MONGO_URI` / `MONGO_DB`.
    pub fn from_env() -> Self {
        Self {
            uri: env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into()),
            database_name: env::var("MONGO_DB").unwrap_or_else(|_| "gifbattle".into()),
        }
    }
}
