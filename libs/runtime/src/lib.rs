//! Runtime scaffolding for the Workboard server: layered configuration and
//! logging initialization.

pub mod config;
pub mod logging;

pub use config::{AppConfig, CliArgs, DatabaseConfig, LoggingConfig, ServerConfig, StorageConfig};
