//! Configuration loading and resolution
//!
//! Every setting resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! The admin password has no compiled default: startup fails if it is not
//! supplied through one of the first three tiers.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub admin_password: String,
    /// Max-Age of the session cookie set at login, in seconds
    pub session_max_age_secs: i64,
}

/// Unresolved overrides from the command line
///
/// `None` fields fall through to environment / config file / default.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub admin_password: Option<String>,
}

/// Subset of settings readable from the TOML config file
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    database_path: Option<PathBuf>,
    admin_password: Option<String>,
    session_max_age_secs: Option<i64>,
}

impl ServiceConfig {
    /// Resolve the full configuration from all four tiers
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let file = load_config_file().unwrap_or_default();

        let host = overrides
            .host
            .or_else(|| std::env::var("RASTREO_HOST").ok())
            .or(file.host)
            .unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match overrides
            .port
            .map(Ok)
            .or_else(|| std::env::var("PORT").ok().map(|v| v.parse::<u16>()))
        {
            Some(Ok(p)) => p,
            Some(Err(e)) => return Err(Error::Config(format!("Invalid port: {}", e))),
            None => file.port.unwrap_or(3000),
        };

        let database_path = overrides
            .database_path
            .or_else(|| std::env::var("RASTREO_DB").ok().map(PathBuf::from))
            .or(file.database_path)
            .unwrap_or_else(default_database_path);

        let admin_password = overrides
            .admin_password
            .or_else(|| std::env::var("RASTREO_ADMIN_PASSWORD").ok())
            .or(file.admin_password)
            .ok_or_else(|| {
                Error::Config(
                    "admin password not configured (--admin-password, RASTREO_ADMIN_PASSWORD, or config file)"
                        .to_string(),
                )
            })?;

        let session_max_age_secs = match std::env::var("RASTREO_SESSION_MAX_AGE") {
            Ok(v) => v
                .parse::<i64>()
                .map_err(|e| Error::Config(format!("Invalid RASTREO_SESSION_MAX_AGE: {}", e)))?,
            Err(_) => file.session_max_age_secs.unwrap_or(86400),
        };

        Ok(ServiceConfig {
            host,
            port,
            database_path,
            admin_password,
            session_max_age_secs,
        })
    }
}

/// Locate and parse the TOML config file for the platform
fn load_config_file() -> Result<FileConfig> {
    let path = find_config_file()?;
    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Config file search: ~/.config/rastreo/config.toml, then /etc/rastreo/config.toml
fn find_config_file() -> Result<PathBuf> {
    if let Some(user_config) = dirs::config_dir().map(|d| d.join("rastreo").join("config.toml")) {
        if user_config.exists() {
            return Ok(user_config);
        }
    }

    let system_config = PathBuf::from("/etc/rastreo/config.toml");
    if system_config.exists() {
        return Ok(system_config);
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("rastreo"))
        .unwrap_or_else(|| PathBuf::from("./rastreo_data"))
        .join("envios.db")
}
