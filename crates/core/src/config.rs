use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Prefix of environment overrides, e.g. `IDKIT_AUTH__JWT_SECRET`
pub const ENV_PREFIX: &str = "IDKIT";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_token_expiry")]
    pub token_expiry_seconds: i64,
    #[serde(default = "default_hash_memory_kib")]
    pub hash_memory_kib: u32,
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
}

// Keeps the secret out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_expiry_seconds", &self.token_expiry_seconds)
            .field("hash_memory_kib", &self.hash_memory_kib)
            .field("hash_iterations", &self.hash_iterations)
            .field("hash_parallelism", &self.hash_parallelism)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_token_expiry() -> i64 {
    3600 // 1 hour
}

// Argon2id defaults: 19 MiB, 2 passes, 1 lane.
fn default_hash_memory_kib() -> u32 {
    19 * 1024
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Load configuration with environment variable overrides
    /// Environment variables are prefixed with IDKIT_ and use `__` between
    /// sections and keys.
    /// Example: IDKIT_AUTH__JWT_SECRET, IDKIT_SERVER__PORT
    ///
    /// Returns the config and a list of environment variable overrides
    pub fn load_with_env() -> Result<(Self, Vec<String>), ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("idkit").required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let env_vars = [
            ("IDKIT_AUTH__JWT_SECRET", "auth.jwt_secret"),
            ("IDKIT_AUTH__TOKEN_EXPIRY_SECONDS", "auth.token_expiry_seconds"),
            ("IDKIT_AUTH__HASH_MEMORY_KIB", "auth.hash_memory_kib"),
            ("IDKIT_AUTH__HASH_ITERATIONS", "auth.hash_iterations"),
            ("IDKIT_AUTH__HASH_PARALLELISM", "auth.hash_parallelism"),
            ("IDKIT_SERVER__HOST", "server.host"),
            ("IDKIT_SERVER__PORT", "server.port"),
            ("IDKIT_LOG__FILTER", "log.filter"),
        ];

        let overrides = env_vars
            .into_iter()
            .filter(|(env_var, _)| std::env::var(env_var).is_ok())
            .map(|(_, config_key)| config_key.to_string())
            .collect();

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok((app_config, overrides))
    }

    /// Reject values the auth services cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message("auth.jwt_secret must not be empty".to_string()));
        }
        if self.auth.token_expiry_seconds <= 0 {
            return Err(ConfigError::Message(
                "auth.token_expiry_seconds must be positive".to_string(),
            ));
        }
        if self.auth.hash_iterations == 0 || self.auth.hash_parallelism == 0 {
            return Err(ConfigError::Message(
                "auth.hash_iterations and auth.hash_parallelism must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` to bind the HTTP listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
