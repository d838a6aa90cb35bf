use anyhow::{Context, Result};
use std::env;
use std::fs;

use crate::errors::ErrorOverrides;
use crate::settings::{ErrorSettings, Maintenance};

pub const DEFAULT_MAINTENANCE_MESSAGE: &str = "We are currently down for maintenance.";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub errors: ErrorConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub instance_id: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Route prefix of the JSON API, e.g. `/api/v1`
    pub prefix: String,
    /// Token expected in `X-CSRF-TOKEN` on state-changing requests
    pub session_token: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ErrorConfig {
    pub overrides: ErrorOverrides,
    pub maintenance: Option<Maintenance>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: "/api/v1".to_string(),
            session_token: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            server: ServerConfig {
                host: var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: var("API_PORT")
                    .unwrap_or_else(|| "8080".to_string())
                    .parse()
                    .context("API_PORT must be a valid port number")?,
                // Used only for debugging/observability. If unset, fall back to HOSTNAME if
                // present (e.g. Docker/Kubernetes), otherwise "unknown".
                instance_id: var("INSTANCE_ID")
                    .or_else(|| var("HOSTNAME"))
                    .unwrap_or_else(|| "unknown".to_string()),
            },
            api: ApiConfig {
                prefix: normalize_prefix(
                    &var("API_PREFIX").unwrap_or_else(|| "/api/v1".to_string()),
                ),
                session_token: var("SESSION_TOKEN").filter(|t| !t.is_empty()),
            },
            errors: ErrorConfig {
                overrides: overrides_from(&var)?,
                maintenance: maintenance_from(&var)?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Initial runtime settings
    pub fn error_settings(&self) -> ErrorSettings {
        ErrorSettings {
            overrides: self.errors.overrides.clone(),
            maintenance: self.errors.maintenance.clone(),
        }
    }
}

fn overrides_from<F>(var: &F) -> Result<ErrorOverrides>
where
    F: Fn(&str) -> Option<String>,
{
    // Inline JSON wins over a file
    if let Some(json) = var("ERROR_OVERRIDES") {
        return ErrorOverrides::from_json(&json)
            .context("ERROR_OVERRIDES must be a JSON object of {title, detail} entries");
    }

    match var("ERROR_OVERRIDES_FILE") {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read ERROR_OVERRIDES_FILE {}", path))?;
            ErrorOverrides::from_json(&json)
                .with_context(|| format!("Invalid error override table in {}", path))
        }
        None => Ok(ErrorOverrides::new()),
    }
}

fn maintenance_from<F>(var: &F) -> Result<Option<Maintenance>>
where
    F: Fn(&str) -> Option<String>,
{
    let enabled = var("MAINTENANCE_MODE")
        .and_then(|value| value.parse::<bool>().ok())
        .unwrap_or(false);

    if !enabled {
        return Ok(None);
    }

    let retry_after = match var("MAINTENANCE_RETRY_AFTER") {
        Some(value) => Some(
            value
                .parse()
                .context("MAINTENANCE_RETRY_AFTER must be a number of seconds")?,
        ),
        None => None,
    };

    Ok(Some(Maintenance {
        message: var("MAINTENANCE_MESSAGE")
            .unwrap_or_else(|| DEFAULT_MAINTENANCE_MESSAGE.to_string()),
        retry_after,
    }))
}

/// Leading slash, no trailing slash
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    format!("/{}", trimmed)
}
