//! Application configuration

mod app_config;

pub use app_config::{AppConfig, GatewayConfig, LogFormat, LoggingConfig, RunDefaults};
