//! Server configuration from environment variables.

use anyhow::{Context, Result};

/// Where recipes are served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// No `DATABASE_URL`: an in-process store, filled by the startup import.
    Memory,
    /// Backed by PostgreSQL.
    Postgres,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// None = in-memory store.
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub db_max_connections: u32,
    /// JSON dump loaded at startup when the store is empty. None disables it.
    pub recipes_json_path: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid DB_MAX_CONNECTIONS")?,
            recipes_json_path: match std::env::var("RECIPES_JSON_PATH") {
                Ok(path) if path.is_empty() => None,
                Ok(path) => Some(path),
                Err(_) => Some("./data/US_recipes_null.json".to_string()),
            },
        })
    }

    pub fn mode(&self) -> StoreMode {
        if self.database_url.is_some() {
            StoreMode::Postgres
        } else {
            StoreMode::Memory
        }
    }
}

/// Render a database URL for logs with the password removed.
pub fn redact_database_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => "<unparseable database url>".to_string(),
    }
}
