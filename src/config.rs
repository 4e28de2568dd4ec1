//! Service configuration.
//!
//! Settings come from an optional YAML file and are then overridden by
//! command-line flags. Nothing here is global: the resulting `ServerConfig`
//! is handed to the server at startup.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["codetree.yaml", ".codetree.yaml"];

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8011;

/// Maximum request body size (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1_048_576;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (default: all interfaces)
    pub host: String,
    pub port: u16,
    /// Worker threads handling connections (0 = one per CPU)
    pub workers: usize,
    /// Largest accepted request body in bytes
    pub max_body_size: usize,
    /// Read timeout per connection, in seconds
    pub read_timeout_secs: u64,
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            workers: 0,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            read_timeout_secs: 30,
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: ServerConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from an explicit path, or from a discovered file, or defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::parse_file(p),
            None => match discover_config() {
                Some(p) => Self::parse_file(p),
                None => Ok(Self::default()),
            },
        }
    }

    /// Address to bind, as `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Cross-origin policy applied to every response.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any origin
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    /// Preflight cache lifetime in seconds
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec!["*".to_string()],
            allow_methods: ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            allow_headers: ["Origin", "Content-Length", "Content-Type", "Authorization"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            max_age_secs: 12 * 60 * 60,
        }
    }
}

impl CorsConfig {
    /// Value for `Access-Control-Allow-Origin`, or None if the origin is not allowed.
    ///
    /// Requests without an `Origin` header only get a value under `*`.
    pub fn allowed_origin(&self, origin: Option<&str>) -> Option<String> {
        if self.allow_origins.iter().any(|o| o == "*") {
            return Some("*".to_string());
        }
        let origin = origin?;
        self.allow_origins
            .iter()
            .find(|o| o.eq_ignore_ascii_case(origin))
            .map(|_| origin.to_string())
    }
}

/// Discover a config file in the current directory.
fn discover_config() -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// Validate a config.
pub fn validate(config: &ServerConfig) -> anyhow::Result<()> {
    if config.host.trim().is_empty() {
        anyhow::bail!("host must not be empty");
    }
    if config.max_body_size == 0 {
        anyhow::bail!("max_body_size must be greater than zero");
    }
    if config.read_timeout_secs == 0 {
        anyhow::bail!("read_timeout_secs must be greater than zero");
    }
    if config.cors.allow_origins.is_empty() {
        anyhow::bail!("cors.allow_origins must list at least one origin (use \"*\" for any)");
    }
    for origin in &config.cors.allow_origins {
        if origin != "*" && !(origin.starts_with("http://") || origin.starts_with("https://")) {
            anyhow::bail!("invalid CORS origin {:?}, expected \"*\" or an http(s) URL", origin);
        }
    }
    Ok(())
}
