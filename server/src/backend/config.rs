//! # Runtime Configuration
//!
//! Settings are read from the process environment. A `.env` file in the
//! working directory is loaded first when present, so local development can
//! keep its settings next to the database file.
//!
//! | Variable                    | Default                  |
//! |-----------------------------|--------------------------|
//! | `AGENDA_DATABASE_URL`       | `sqlite:agenda.db`       |
//! | `AGENDA_BIND_ADDR`          | `127.0.0.1:3000`         |
//! | `AGENDA_CORS_ORIGIN`        | `http://localhost:8080`  |
//! | `AGENDA_MAX_DB_CONNECTIONS` | `5`                      |
//! | `AGENDA_GUARDIAN_PASSWORD`  | `123`                    |
//! | `GEMINI_API_KEY`            | unset (summaries fall back) |
//! | `AGENDA_SUMMARY_MODEL`      | `gemini-2.0-flash`       |

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite:agenda.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";
const DEFAULT_MAX_DB_CONNECTIONS: u32 = 5;
const DEFAULT_GUARDIAN_PASSWORD: &str = "123";
const DEFAULT_SUMMARY_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    pub max_db_connections: u32,
    /// Placeholder credential given to users created on someone else's behalf
    pub guardian_password: String,
    pub gemini_api_key: Option<String>,
    pub summary_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 3000))),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            max_db_connections: DEFAULT_MAX_DB_CONNECTIONS,
            guardian_password: DEFAULT_GUARDIAN_PASSWORD.to_string(),
            gemini_api_key: None,
            summary_model: DEFAULT_SUMMARY_MODEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `.env` (if any) and the process environment
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment overrides from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).context("Failed to read .env file"),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = match get("AGENDA_BIND_ADDR") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("AGENDA_BIND_ADDR is not a socket address: {}", raw))?,
            None => defaults.bind_addr,
        };

        let max_db_connections = match get("AGENDA_MAX_DB_CONNECTIONS") {
            Some(raw) => {
                let value: u32 = raw
                    .parse()
                    .with_context(|| format!("AGENDA_MAX_DB_CONNECTIONS is not a number: {}", raw))?;
                if value == 0 {
                    anyhow::bail!("AGENDA_MAX_DB_CONNECTIONS must be at least 1");
                }
                value
            }
            None => defaults.max_db_connections,
        };

        Ok(Self {
            database_url: get("AGENDA_DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr,
            cors_origin: get("AGENDA_CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            max_db_connections,
            guardian_password: get("AGENDA_GUARDIAN_PASSWORD").unwrap_or(defaults.guardian_password),
            gemini_api_key: get("GEMINI_API_KEY"),
            summary_model: get("AGENDA_SUMMARY_MODEL").unwrap_or(defaults.summary_model),
        })
    }
}
