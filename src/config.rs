// Configuration for:
// - Database connection string and pool size
// - Server listening address/port
// - Suggestion and history list sizes

use dotenv::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub db_max_connections: u32,
    pub suggestion_limit: i64,
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:merchant_mapper.db".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            db_max_connections: 5,
            suggestion_limit: 20,
            history_limit: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        let server_host = env::var("SERVER_HOST").unwrap_or(defaults.server_host);
        let server_port = env::var("SERVER_PORT")
            .map(|v| v.parse().unwrap_or(defaults.server_port))
            .unwrap_or(defaults.server_port);
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .map(|v| v.parse().unwrap_or(defaults.db_max_connections))
            .unwrap_or(defaults.db_max_connections);
        let suggestion_limit = env::var("SUGGESTION_LIMIT")
            .map(|v| v.parse().unwrap_or(defaults.suggestion_limit))
            .unwrap_or(defaults.suggestion_limit);
        let history_limit = env::var("HISTORY_LIMIT")
            .map(|v| v.parse().unwrap_or(defaults.history_limit))
            .unwrap_or(defaults.history_limit);

        Self {
            database_url,
            server_host,
            server_port,
            db_max_connections,
            suggestion_limit,
            history_limit,
        }
    }

    /// In-memory databases vanish with their connection, so they get a single pinned one.
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:")
    }
}
