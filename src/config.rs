use serde::Deserialize;
use std::path::Path;

use crate::credentials::{self, Credentials};
use crate::error::{IngestError, Result};

/// Environment variable that overrides the configured database password
pub const PASSWORD_ENV: &str = "PG_PASSWORD";

fn default_api_port() -> u16 {
    8000
}

fn default_postgres_url() -> String {
    "postgres://postgres@localhost:5432".to_string()
}

fn default_database() -> String {
    "postgres".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_statement_timeout_ms() -> u64 {
    30_000
}

fn default_acquire_timeout_secs() -> u64 {
    10
}

/// Ingest service configuration file structure
///
/// ```toml
/// api_port = 8000
///
/// [database]
/// postgres_url = "postgres://postgres@localhost:5432"
/// database = "health"
/// credential_profile = "health"
/// statement_timeout_ms = 30000
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// HTTP port for the ingest API (default: 8000)
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// PostgreSQL connection settings (maps to [database] section in TOML)
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// PostgreSQL connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Base URL without password or database (e.g., postgres://user@host:5432)
    #[serde(default = "default_postgres_url")]
    pub postgres_url: String,
    /// Database name (default: postgres)
    #[serde(default = "default_database")]
    pub database: String,
    /// Credential profile name to look up the password from
    /// ~/.config/health_ingest/credentials.toml
    pub credential_profile: Option<String>,
    /// Pool size (default: 5)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Per-statement timeout inside each ingest transaction, 0 disables (default: 30000)
    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,
    /// How long a request waits for a pooled connection (default: 10)
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            postgres_url: default_postgres_url(),
            database: default_database(),
            credential_profile: None,
            max_connections: default_max_connections(),
            statement_timeout_ms: default_statement_timeout_ms(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl IngestConfig {
    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            IngestError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: IngestConfig = toml::from_str(&content).map_err(|e| {
            IngestError::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            return Err(IngestError::config(
                "database.max_connections must be at least 1",
            ));
        }
        if self.database.database.trim().is_empty() {
            return Err(IngestError::config("database.database must not be empty"));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Resolve the password: `PG_PASSWORD` first, then the credential profile.
    /// Without either, connect without a password (trust/peer auth).
    pub fn resolve_password(&self, credentials: &Option<Credentials>) -> Result<String> {
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            return Ok(password);
        }
        match &self.credential_profile {
            Some(profile) => credentials::get_password(credentials, profile),
            None => Ok(String::new()),
        }
    }
}
