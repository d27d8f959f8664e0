//! Service configuration, read once from the environment at startup.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_PORT: &str = "8083";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Destination number for the checkout WhatsApp link.
    pub whatsapp_number: String,
    /// Base for canonical share/deep-link URLs.
    pub public_base_url: String,
    pub nats_url: Option<String>,
    pub db_max_connections: u32,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("whatsapp_number", &self.whatsapp_number)
            .field("public_base_url", &self.public_base_url)
            .field("nats_url", &self.nats_url)
            .field("db_max_connections", &self.db_max_connections)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let port = env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let bind_raw = env::var("BIND_ADDR").unwrap_or_else(|_| format!("0.0.0.0:{port}"));
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        Ok(Self {
            database_url,
            bind_addr,
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            whatsapp_number: env::var("WHATSAPP_NUMBER")
                .unwrap_or_else(|_| "5491156465544".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            nats_url: env::var("NATS_URL").ok(),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        })
    }
}
