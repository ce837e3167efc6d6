use crate::error::{AppError, Result};
use dashmap::DashMap;
use std::env;
use std::str::FromStr;
use std::sync::Arc;

/// Key/value configuration snapshot, seeded from the process environment
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Snapshot the current environment. Load `.env` before calling this.
    pub fn from_env() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn require(&self, key: &str) -> Result<String> {
        self.get(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Config(format!("{} must be set", key)))
    }

    pub fn parse_or<T: FromStr>(&self, key: &str, default: T) -> Result<T> {
        match self.get(key) {
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
            None => Ok(default),
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }
}

/// Where products are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo { uri: String, database: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
}

impl AppConfig {
    pub const DEFAULT_PORT: u16 = 5000;
    pub const DEFAULT_DATABASE: &'static str = "bike-shop";
    pub const MEMORY_URL: &'static str = "memory://";

    pub fn load(config: &ConfigService) -> Result<Self> {
        let host = config.get_or("HOST", "0.0.0.0");
        let port = config.parse_or("PORT", Self::DEFAULT_PORT)?;

        let url = config.require("DATABASE_URL")?;
        let storage = if url == Self::MEMORY_URL {
            StorageBackend::Memory
        } else {
            StorageBackend::Mongo {
                uri: url,
                database: config.get_or("DATABASE_NAME", Self::DEFAULT_DATABASE),
            }
        };

        Ok(Self {
            host,
            port,
            storage,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
