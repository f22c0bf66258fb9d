use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Secret shipped for local development. Startup warns when it is still in use.
pub const DEV_SECRET_KEY: &str = "your-secret-key";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML from config file at {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("Failed to load config from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub secret_key: String,
    pub debug: bool,

    pub database_uri: String,
    pub database_pool_size: u32,
    /// Seconds to wait for a pooled connection.
    pub database_pool_timeout: u64,

    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,

    pub cache_type: String,
    pub redis_url: String,

    pub upload_folder: String,
    /// Largest accepted request body, in bytes.
    pub max_content_length: usize,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    listen_addr: Option<String>,
    secret_key: Option<String>,
    debug: Option<bool>,
    database_uri: Option<String>,
    database_pool_size: Option<u32>,
    database_pool_timeout: Option<u64>,
    log_level: Option<String>,
    log_dir: Option<String>,
    log_file: Option<String>,
    cache_type: Option<String>,
    redis_url: Option<String>,
    upload_folder: Option<String>,
    max_content_length: Option<usize>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_database_uri() -> String {
    "memory://".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_file() -> String {
    "app.log".to_string()
}

fn default_cache_type() -> String {
    "redis".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379/0".to_string()
}

fn default_upload_folder() -> String {
    "uploads".to_string()
}

const DEFAULT_POOL_SIZE: u32 = 5;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            secret_key: DEV_SECRET_KEY.to_string(),
            debug: false,
            database_uri: default_database_uri(),
            database_pool_size: DEFAULT_POOL_SIZE,
            database_pool_timeout: DEFAULT_POOL_TIMEOUT_SECS,
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            log_file: default_log_file(),
            cache_type: default_cache_type(),
            redis_url: default_redis_url(),
            upload_folder: default_upload_folder(),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}

impl ServerConfig {
    /// Loads `.env`, then the optional TOML file, then the process environment.
    /// Environment values override file values.
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let file_config = match config_path {
            Some(path_str) => read_config_file(Path::new(path_str))?,
            None => PartialServerConfig::default(),
        };

        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()?;

        Self::merge(env_config, file_config)
    }

    /// Builds a configuration from a TOML document with no environment layer.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file_config: PartialServerConfig =
            toml::from_str(contents).map_err(|source| ConfigError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;
        Self::merge(PartialServerConfig::default(), file_config)
    }

    /// True when the datastore URI selects the in-process store.
    pub fn uses_memory_store(&self) -> bool {
        self.database_uri.starts_with("memory:")
    }

    fn merge(
        env_config: PartialServerConfig,
        file_config: PartialServerConfig,
    ) -> Result<Self, ConfigError> {
        let listen_addr_raw = env_config
            .listen_addr
            .or(file_config.listen_addr)
            .unwrap_or_else(default_listen_addr);
        let listen_addr: SocketAddr = listen_addr_raw.parse().map_err(|e| {
            ConfigError::Invalid(format!("listen_addr '{listen_addr_raw}' is not a socket address: {e}"))
        })?;

        let database_pool_size = env_config
            .database_pool_size
            .or(file_config.database_pool_size)
            .unwrap_or(DEFAULT_POOL_SIZE);
        if database_pool_size == 0 {
            return Err(ConfigError::Invalid(
                "database_pool_size must be at least 1".to_string(),
            ));
        }

        let max_content_length = env_config
            .max_content_length
            .or(file_config.max_content_length)
            .unwrap_or(DEFAULT_MAX_CONTENT_LENGTH);
        if max_content_length == 0 {
            return Err(ConfigError::Invalid(
                "max_content_length must be at least 1".to_string(),
            ));
        }

        Ok(ServerConfig {
            listen_addr,
            secret_key: env_config
                .secret_key
                .or(file_config.secret_key)
                .unwrap_or_else(|| DEV_SECRET_KEY.to_string()),
            debug: env_config.debug.or(file_config.debug).unwrap_or(false),
            database_uri: env_config
                .database_uri
                .or(file_config.database_uri)
                .unwrap_or_else(default_database_uri),
            database_pool_size,
            database_pool_timeout: env_config
                .database_pool_timeout
                .or(file_config.database_pool_timeout)
                .unwrap_or(DEFAULT_POOL_TIMEOUT_SECS),
            log_level: env_config
                .log_level
                .or(file_config.log_level)
                .unwrap_or_else(default_log_level),
            log_dir: env_config
                .log_dir
                .or(file_config.log_dir)
                .unwrap_or_else(default_log_dir),
            log_file: env_config
                .log_file
                .or(file_config.log_file)
                .unwrap_or_else(default_log_file),
            cache_type: env_config
                .cache_type
                .or(file_config.cache_type)
                .unwrap_or_else(default_cache_type),
            redis_url: env_config
                .redis_url
                .or(file_config.redis_url)
                .unwrap_or_else(default_redis_url),
            upload_folder: env_config
                .upload_folder
                .or(file_config.upload_folder)
                .unwrap_or_else(default_upload_folder),
            max_content_length,
        })
    }
}

fn read_config_file(path: &Path) -> Result<PartialServerConfig, ConfigError> {
    if !path.exists() {
        return Ok(PartialServerConfig::default());
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}
