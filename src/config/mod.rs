//! Configuration module for the lead tracker backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Key-value backend holding the lead records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl StoreBackend {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(StoreBackend::Sqlite),
            "memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite file backing the key-value store
    pub db_path: PathBuf,
    /// Which store backend to use
    pub store_backend: StoreBackend,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("LEADS_DB_PATH")
            .unwrap_or_else(|_| "./data/leads.sqlite".to_string())
            .into();

        let store_backend = match env::var("LEADS_STORE") {
            Ok(value) => StoreBackend::from_env_value(&value).unwrap_or_else(|| {
                eprintln!("Unknown LEADS_STORE value {:?}, using sqlite", value);
                StoreBackend::Sqlite
            }),
            Err(_) => StoreBackend::Sqlite,
        };

        let bind_addr = env::var("LEADS_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid LEADS_BIND_ADDR format");

        let log_level = env::var("LEADS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            db_path,
            store_backend,
            bind_addr,
            log_level,
        }
    }
}
