//! Server configuration loaded from the environment.

use std::str::FromStr;

/// Where ships are persisted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL through Diesel (requires `DATABASE_URL`).
    Postgres,
    /// Process memory; data is lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Selected ship store.
    pub storage: StorageBackend,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let host = lookup("SHIPYARD_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match lookup("SHIPYARD_PORT") {
            Some(raw) => u16::from_str(raw.trim())
                .map_err(|_| format!("SHIPYARD_PORT must be a u16 number, got {raw}"))?,
            None => 8080,
        };
        let storage = match lookup("SHIPYARD_STORAGE") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::Postgres,
        };
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err("DATABASE_URL must be set to a PostgreSQL connection string".to_string());
        }
        let origins = lookup("SHIPYARD_UI_ORIGINS")
            .unwrap_or_else(|| "http://127.0.0.1:4200,http://localhost:4200".to_string());
        let allowed_origins = origins
            .split(',')
            .map(|value| value.trim())
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();
        Ok(Self {
            host,
            port,
            storage,
            database_url,
            allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ServerConfig, StorageBackend};
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_postgres_on_localhost() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/ships")]).expect("config");

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.allowed_origins.len(), 2);
    }

    #[test]
    fn postgres_requires_database_url() {
        assert!(config(&[]).is_err());
    }

    #[test]
    fn memory_storage_needs_no_database() {
        let config = config(&[
            ("SHIPYARD_STORAGE", "Memory"),
            ("SHIPYARD_PORT", "9090"),
            ("SHIPYARD_UI_ORIGINS", "https://ships.example, ,"),
        ])
        .expect("config");

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.port, 9090);
        assert_eq!(config.database_url, None);
        assert_eq!(config.allowed_origins, vec!["https://ships.example".to_string()]);
    }

    #[test]
    fn rejects_bad_port_and_backend() {
        assert!(config(&[("SHIPYARD_STORAGE", "memory"), ("SHIPYARD_PORT", "http")]).is_err());
        assert!(config(&[("SHIPYARD_STORAGE", "redis")]).is_err());
    }
}
