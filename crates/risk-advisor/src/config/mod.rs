use std::env;
use std::fmt;
use std::fs::File;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::workflows::profiling::{ArchetypeDirectory, DirectoryError, WeightTable};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub advisor: AdvisorConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            advisor: AdvisorConfig::from_env(),
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Locations of the versioned scoring configuration and the demo holdings export.
///
/// Unset paths fall back to the built-in weight table and archetype directory.
#[derive(Debug, Clone, Default)]
pub struct AdvisorConfig {
    pub weights_path: Option<PathBuf>,
    pub archetypes_path: Option<PathBuf>,
    pub holdings_path: Option<PathBuf>,
}

impl AdvisorConfig {
    /// Advisor settings alone, for commands that never bind a socket.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    fn from_env() -> Self {
        let path = |name: &str| {
            env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        };

        Self {
            weights_path: path("ADVISOR_WEIGHTS_PATH"),
            archetypes_path: path("ADVISOR_ARCHETYPES_PATH"),
            holdings_path: path("ADVISOR_HOLDINGS_PATH"),
        }
    }

    pub fn weight_table(&self) -> Result<WeightTable, ConfigError> {
        let Some(path) = &self.weights_path else {
            return Ok(WeightTable::standard());
        };

        let file = open(path)?;
        WeightTable::from_reader(file).map_err(|source| ConfigError::InvalidWeights {
            path: path.clone(),
            source,
        })
    }

    pub fn archetype_directory(&self) -> Result<ArchetypeDirectory, ConfigError> {
        let Some(path) = &self.archetypes_path else {
            return Ok(ArchetypeDirectory::standard());
        };

        let file = open(path)?;
        let records = ArchetypeDirectory::records_from_reader(file).map_err(|source| {
            ConfigError::InvalidArchetypes {
                path: path.clone(),
                source,
            }
        })?;

        ArchetypeDirectory::from_records(records).map_err(ConfigError::Directory)
    }
}

fn open(path: &Path) -> Result<File, ConfigError> {
    File::open(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidWeights {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidArchetypes {
        path: PathBuf,
        source: serde_json::Error,
    },
    Directory(DirectoryError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::Unreadable { path, .. } => {
                write!(f, "unable to open configuration file {}", path.display())
            }
            ConfigError::InvalidWeights { path, .. } => {
                write!(f, "weight table {} is not valid JSON", path.display())
            }
            ConfigError::InvalidArchetypes { path, .. } => {
                write!(f, "archetype directory {} is not valid JSON", path.display())
            }
            ConfigError::Directory(err) => write!(f, "archetype directory rejected: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Unreadable { source, .. } => Some(source),
            ConfigError::InvalidWeights { source, .. }
            | ConfigError::InvalidArchetypes { source, .. } => Some(source),
            ConfigError::Directory(err) => Some(err),
        }
    }
}
