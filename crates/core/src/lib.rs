pub mod config;
pub use config::{AppConfig, AuthConfig, LogConfig, ServerConfig};
