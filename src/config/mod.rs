mod loader;
mod types;

pub use types::{Config, ServerConfig, TableConfig, TelemetryConfig};
