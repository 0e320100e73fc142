use crate::constants::{DEFAULT_MAX_ANCESTOR_DEPTH, DEFAULT_MAX_PAGE_SIZE};
use crate::error::AppResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,
}

fn default_secret_key() -> String {
    "change-me-in-production-use-openssl-rand-hex-32".to_string()
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_token_expire_minutes() -> i64 {
    30
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
            algorithm: default_algorithm(),
            access_token_expire_minutes: default_access_token_expire_minutes(),
        }
    }
}

/// Limits applied by the album listing and path operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumsConfig {
    /// Requested page sizes above this are clamped.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,
    #[serde(default = "default_max_ancestor_depth")]
    pub max_ancestor_depth: usize,
}

fn default_max_page_size() -> i64 {
    DEFAULT_MAX_PAGE_SIZE
}

fn default_max_ancestor_depth() -> usize {
    DEFAULT_MAX_ANCESTOR_DEPTH
}

impl AlbumsConfig {
    /// Replaces limits that would disable paging or the ancestor walk.
    fn sanitized(mut self) -> Self {
        if self.max_page_size < 1 {
            tracing::warn!(
                "albums.max_page_size must be positive, got {}; using {}",
                self.max_page_size,
                DEFAULT_MAX_PAGE_SIZE
            );
            self.max_page_size = DEFAULT_MAX_PAGE_SIZE;
        }
        if self.max_ancestor_depth == 0 {
            tracing::warn!(
                "albums.max_ancestor_depth must be positive; using {}",
                DEFAULT_MAX_ANCESTOR_DEPTH
            );
            self.max_ancestor_depth = DEFAULT_MAX_ANCESTOR_DEPTH;
        }
        self
    }
}

impl Default for AlbumsConfig {
    fn default() -> Self {
        Self {
            max_page_size: default_max_page_size(),
            max_ancestor_depth: default_max_ancestor_depth(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub albums: AlbumsConfig,
}

pub fn load_config(config_path: &Path) -> Config {
    if !config_path.exists() {
        return Config::default();
    }

    let mut config: Config = match fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid config {:?}: {}", config_path, e);
            Config::default()
        }),
        Err(_) => Config::default(),
    };

    config.albums = config.albums.sanitized();
    config
}

pub fn save_default_config(config_path: &Path) -> AppResult<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let yaml = serde_yaml::to_string(&Config::default())?;
    fs::write(config_path, yaml)?;
    Ok(())
}
