//! Startup configuration.
//!
//! Values come from command-line flags or their environment variables, then
//! from an optional YAML file, then from built-in defaults. When both
//! `DB_USER` and `DB_PASSWORD` are present they win over any connection
//! string.

use std::fmt::{Display, Formatter};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};
use contact_storage::mongo::DEFAULT_OPERATION_TIMEOUT;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "CONTACT_API_CONFIG";
pub const APP_ENV_ENV: &str = "APP_ENV";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DB_CONN_ENV: &str = "DB_CONN";
pub const DB_USER_ENV: &str = "DB_USER";
pub const DB_PASSWORD_ENV: &str = "DB_PASSWORD";
pub const DB_HOST_ENV: &str = "DB_HOST";
pub const STORAGE_BACKEND_ENV: &str = "STORAGE_BACKEND";
pub const STORAGE_TIMEOUT_ENV: &str = "STORAGE_TIMEOUT_SECS";
pub const DEBUG_ERRORS_ENV: &str = "DEBUG_ERRORS";

pub const DEFAULT_CONFIG_PATH: &str = "./config/prod.yaml";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_HOST: &str = "mongo:27017";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("database credentials are not set and no connection string was provided")]
    MissingDatabase,
}

/// Deployment environment; selects the log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Local,
    Prod,
}

impl AppEnv {
    /// Anything other than `local` is treated as `prod`.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("local") {
            AppEnv::Local
        } else {
            AppEnv::Prod
        }
    }
}

impl Display for AppEnv {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AppEnv::Local => write!(f, "local"),
            AppEnv::Prod => write!(f, "prod"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    #[value(name = "mongo")]
    Mongo,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Mongo => write!(f, "mongo"),
            StorageBackend::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "contact-api")]
pub struct Cli {
    #[arg(long, env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[arg(long = "env", env = APP_ENV_ENV)]
    pub app_env: Option<String>,

    #[arg(long, env = HOST_ENV, default_value = DEFAULT_HOST)]
    pub host: IpAddr,

    #[arg(long, env = PORT_ENV)]
    pub port: Option<u16>,

    #[arg(long, env = DB_CONN_ENV, hide_env_values = true)]
    pub db_conn: Option<String>,

    #[arg(long, env = DB_USER_ENV)]
    pub db_user: Option<String>,

    #[arg(long, env = DB_PASSWORD_ENV, hide_env_values = true)]
    pub db_password: Option<String>,

    #[arg(long, env = DB_HOST_ENV, default_value = DEFAULT_DB_HOST)]
    pub db_host: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackend::Mongo
    )]
    pub storage: StorageBackend,

    #[arg(long, env = STORAGE_TIMEOUT_ENV)]
    pub storage_timeout_secs: Option<u64>,

    #[arg(long, env = DEBUG_ERRORS_ENV, value_parser = FalseyValueParser::new())]
    pub debug_errors: bool,
}

/// Contents of the optional YAML config file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub env: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub db_conn: Option<String>,
    #[serde(default)]
    pub storage_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Reads `path`; an absent file yields `None`.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw)
                .map(Some)
                .map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as a mapping.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }
}

/// Storage selection with everything the chosen backend needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    Mongo { database_url: String },
}

impl StorageConfig {
    pub fn backend(&self) -> StorageBackend {
        match self {
            StorageConfig::InMemory => StorageBackend::InMemory,
            StorageConfig::Mongo { .. } => StorageBackend::Mongo,
        }
    }
}

/// Fully resolved settings the server runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub env: AppEnv,
    pub listen_addr: SocketAddr,
    pub storage: StorageConfig,
    pub storage_timeout: Duration,
    pub debug_errors: bool,
}

impl Config {
    pub fn resolve(cli: Cli, file: Option<FileConfig>) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();

        let env = cli
            .app_env
            .as_deref()
            .or(file.env.as_deref())
            .map(AppEnv::from_name)
            .unwrap_or(AppEnv::Prod);
        let port = cli.port.or(file.port).unwrap_or(DEFAULT_PORT);
        let storage_timeout = cli
            .storage_timeout_secs
            .or(file.storage_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_OPERATION_TIMEOUT);

        let storage = match cli.storage {
            StorageBackend::InMemory => StorageConfig::InMemory,
            StorageBackend::Mongo => StorageConfig::Mongo {
                database_url: database_url(&cli, &file).ok_or(ConfigError::MissingDatabase)?,
            },
        };

        Ok(Self {
            env,
            listen_addr: SocketAddr::new(cli.host, port),
            storage,
            storage_timeout,
            debug_errors: cli.debug_errors,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn database_url(cli: &Cli, file: &FileConfig) -> Option<String> {
    let user = non_empty(cli.db_user.as_deref());
    let password = non_empty(cli.db_password.as_deref());

    if let (Some(user), Some(password)) = (user, password) {
        return Some(format!(
            "mongodb://{user}:{password}@{}/contact?authSource=admin",
            cli.db_host
        ));
    }

    non_empty(cli.db_conn.as_deref())
        .or_else(|| non_empty(file.db_conn.as_deref()))
        .map(str::to_string)
}
