//! Application configuration

mod app_config;

pub use app_config::{AppConfig, ExperimentDefinition, LogFormat, LoggingConfig};
