use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Root configuration for courierd
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Rate table source
    pub table: TableConfig,

    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_address")]
    pub address: SocketAddr,

    /// Allow any origin/method/header (the frontend may be served elsewhere)
    #[serde(default = "default_permissive_cors")]
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            permissive_cors: default_permissive_cors(),
        }
    }
}

/// Rate table configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    /// Path to the master rate table JSON produced by the offline ingestion step
    pub path: PathBuf,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON-formatted logs
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

fn default_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_permissive_cors() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
