use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{IngestError, Result};

/// Credentials file structure
///
/// Format:
/// ```toml
/// [postgres.profile_name]
/// password = "your_postgres_password_here"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Credentials {
    #[serde(default)]
    pub postgres: HashMap<String, CredentialProfile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialProfile {
    pub password: String,
}

/// Default credentials file path: ~/.config/health_ingest/credentials.toml
pub fn get_credentials_path() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| IngestError::config("HOME environment variable not set"))?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("health_ingest")
        .join("credentials.toml"))
}

/// Load credentials from the default location.
/// Returns None if the file doesn't exist
pub fn load_credentials() -> Result<Option<Credentials>> {
    let creds_path = get_credentials_path()?;

    if !creds_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&creds_path)?;
    Ok(Some(parse_credentials(&content)?))
}

pub fn parse_credentials(content: &str) -> Result<Credentials> {
    Ok(toml::from_str(content)?)
}

/// Get the postgres password for a profile
pub fn get_password(credentials: &Option<Credentials>, profile: &str) -> Result<String> {
    match credentials {
        Some(creds) => creds
            .postgres
            .get(profile)
            .map(|p| p.password.clone())
            .ok_or_else(|| {
                IngestError::config(format!(
                    "Credential profile '[postgres.{}]' not found in credentials file",
                    profile
                ))
            }),
        None => {
            let path = get_credentials_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "~/.config/health_ingest/credentials.toml".to_string());
            Err(IngestError::config(format!(
                "Credentials file not found. Expected at: {}",
                path
            )))
        }
    }
}
