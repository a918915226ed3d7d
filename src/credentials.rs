use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
    #[error("no API base URL; set SNAPMOD_API_URL or api_base_url in config.toml")]
    NoBaseUrl,
}

/// Connection settings read from the environment.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Overrides `api_base_url` from config.toml when set.
    pub api_url: Option<String>,
    /// Sent as `Authorization: Bearer <token>` when present.
    pub token: Option<String>,
}

/// Return candidate .env paths in priority order.
fn env_file_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/snapmod/.env"));
    }
    paths.push(PathBuf::from(".env"));
    paths
}

/// Load .env files into the process environment.
///
/// Earlier files win because dotenvy does NOT overwrite existing env vars;
/// variables already set in the environment win over all files.
pub fn load_env_files() -> Result<(), CredentialError> {
    for path in env_file_paths() {
        if path.exists() {
            dotenvy::from_path(&path)?;
        }
    }
    Ok(())
}

pub fn load_credentials() -> Result<Credentials, CredentialError> {
    load_env_files()?;
    Ok(credentials_from(|name| std::env::var(name).ok()))
}

fn credentials_from(lookup: impl Fn(&str) -> Option<String>) -> Credentials {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    Credentials {
        api_url: get("SNAPMOD_API_URL"),
        token: get("SNAPMOD_TOKEN"),
    }
}

impl Credentials {
    /// Pick the base URL: env override first, then the configured one.
    pub fn resolve_base_url(&self, configured: &str) -> Result<String, CredentialError> {
        self.api_url
            .clone()
            .or_else(|| Some(configured.trim().to_string()).filter(|s| !s.is_empty()))
            .ok_or(CredentialError::NoBaseUrl)
    }
}
