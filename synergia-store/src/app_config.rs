use serde::Deserialize;
use std::env;

/// Variables that may carry the booking store connection string, in
/// order of precedence.
pub const DATABASE_URL_VARS: [&str; 2] = ["DATABASE_URL", "MONGO_URI"];

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 { 5 }
fn default_acquire_timeout() -> u64 { 3 }
fn default_run_migrations() -> bool { true }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let database_url = DATABASE_URL_VARS
            .iter()
            .find_map(|var| env::var(var).ok().filter(|v| !v.is_empty()));

        Self::load_with(&run_mode, database_url)
    }

    /// Layers defaults, config files and `SYNERGIA__*` variables, then lets
    /// `database_url` override whatever the files said.
    pub fn load_with(run_mode: &str, database_url: Option<String>) -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.max_connections", 5)?
            .set_default("database.acquire_timeout_seconds", 3)?
            .set_default("database.run_migrations", true)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `SYNERGIA__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("SYNERGIA").separator("__"))
            .set_override_option("database.url", database_url)?
            .build()?;

        s.try_deserialize()
    }
}
