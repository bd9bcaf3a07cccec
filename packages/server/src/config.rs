use common::RetryPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    /// Preflight cache lifetime in seconds.
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite DSN, e.g. `sqlite://quotes.db?mode=rwc` or a bare file path.
    pub url: String,
    /// Size of the read-only pool. The write pool is always one connection.
    pub reader_max_connections: u32,
    /// Upper bound on waiting for the single write path.
    pub write_timeout_ms: u64,
    /// How long SQLite itself waits on a locked database before failing.
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub ledger: RetryPolicy,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("QUOTES_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default(
                "server.cors.allow_origins",
                vec!["http://localhost:3000", "http://localhost:5173"],
            )?
            .set_default("server.cors.max_age", 12 * 60 * 60)?
            .set_default("database.url", "quotes.db")?
            .set_default("database.reader_max_connections", 8)?
            .set_default("database.write_timeout_ms", 5000)?
            .set_default("database.busy_timeout_ms", 5000)?
            .set_default("auth.token_ttl_hours", 24)?
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., QUOTES__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("QUOTES").separator("__"))
            // Plain variables understood by earlier deployments
            .set_override_option("database.url", std::env::var("DATABASE_DSN").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("auth.jwt_secret", std::env::var("JWT_SECRET").ok())?
            .build()?;

        s.try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
