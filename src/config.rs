use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub sql: SqlConfig,
    pub logging: LoggingConfig,
}

/// PostgreSQL connection parameters.
///
/// Every field is optional: a missing value only shows up as a connection
/// failure the first time a question is executed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    /// Kept as text and parsed when connecting.
    pub port: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SqlConfig {
    /// Parse generated SQL and reject anything that is not a query.
    pub strict_validation: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DB_NAME", "database.name"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("HOST", "server.host"),
    ("LLM_BASE_URL", "llm.base_url"),
    ("LLM_MODEL", "llm.model"),
    ("GOOGLE_API_KEY", "llm.api_key"),
    ("RUST_LOG", "logging.level"),
];

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // .env values never override variables already set in the process
        let _ = dotenv::dotenv();

        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("llm.base_url", "https://generativelanguage.googleapis.com/v1beta")?
            .set_default("llm.model", "gemini-1.5-pro-latest")?
            .set_default("sql.strict_validation", false)?
            .set_default("logging.level", "info")?;

        for (var, key) in ENV_OVERRIDES {
            if let Ok(value) = env::var(var) {
                builder = builder.set_override(*key, value)?;
            }
        }

        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.port", port.parse::<u16>().unwrap_or(3000))?;
        }

        if let Ok(strict) = env::var("SQL_STRICT_VALIDATION") {
            let strict = matches!(strict.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
            builder = builder.set_override("sql.strict_validation", strict)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
