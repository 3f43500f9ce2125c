// src/config.rs
use crate::errors::ServerError;
use std::env;

const DEFAULT_GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_path: String,

    /// Geocoding API key (required) and endpoint (overridable for tests).
    pub geocode_api_key: String,
    pub geocode_endpoint: String,

    /// Object store the image blobs go to.
    pub storage_url: String,
    pub storage_bucket: String,
    pub storage_api_key: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        Ok(Self {
            bind_addr: env_or("BIND_ADDR", "127.0.0.1:3000"),
            database_path: env_or("DATABASE_PATH", "openhouse.sqlite3"),
            geocode_api_key: env_required("GEOCODE_API_KEY")?,
            geocode_endpoint: env_or("GEOCODE_ENDPOINT", DEFAULT_GEOCODE_ENDPOINT),
            storage_url: env_required("STORAGE_URL")?,
            storage_bucket: env_or("STORAGE_BUCKET", "images"),
            storage_api_key: env_required("STORAGE_API_KEY")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_required(key: &str) -> Result<String, ServerError> {
    env::var(key).map_err(|_| ServerError::BadRequest(format!("{key} environment variable not set")))
}
