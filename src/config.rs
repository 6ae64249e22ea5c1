//! Configuration manager for csboard.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::FromRef;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::AppState;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_NAME: &str = "csboard";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPLOAD_DIR: &str = "./uploads";
const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024; // 10 MiB.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Instance name.
    pub name: String,
    /// Public URL of current instance.
    pub url: String,
    /// Listening port.
    pub port: u16,
    /// Directory receiving attachments.
    pub upload_dir: PathBuf,
    /// Largest accepted request body, in bytes.
    pub max_upload_size: usize,
    /// Insert demo accounts and a sample inquiry on start.
    pub seed: bool,
    #[serde(skip_deserializing)]
    version: String,
    #[serde(skip)]
    path: PathBuf,
    /// Related to PostgreSQL configuration.
    /// In-memory stores are used when absent.
    #[serde(skip_serializing)]
    pub postgres: Option<Postgres>,
    /// Related to Argon2 configuration.
    #[serde(skip_serializing)]
    pub argon2: Option<Argon2>,
    /// Related to OpenTelemetry export.
    #[serde(skip_serializing)]
    pub telemetry: Option<Telemetry>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            url: String::default(),
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            seed: true,
            version: VERSION.to_owned(),
            path: PathBuf::default(),
            postgres: None,
            argon2: None,
            telemetry: None,
        }
    }
}

/// PostgreSQL configuration.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Postgres {
    /// Hostname:(?port) for PostgreSQL instance.
    pub address: String,
    /// Database name.
    pub database: Option<String>,
    /// Username credential to connect.
    pub username: Option<String>,
    /// Password credential to connect.
    pub password: Option<String>,
    /// Maximum pool connections.
    pub pool_size: Option<u32>,
}

/// Argon2 configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Argon2 {
    /// Memory used while hashing.
    pub memory_cost: u32,
    /// Iterations of hash.
    pub iterations: u32,
    /// Parallelism degree.
    pub parallelism: u32,
}

impl Default for Argon2 {
    fn default() -> Self {
        Self {
            memory_cost: 1024 * 64, // 64 MiB.
            iterations: 4,
            parallelism: 2,
        }
    }
}

/// OpenTelemetry configuration.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// gRPC endpoint of the OTLP collector.
    pub otlp: Option<String>,
}

impl FromRef<AppState> for Arc<Configuration> {
    fn from_ref(state: &AppState) -> Arc<Configuration> {
        Arc::clone(&state.config)
    }
}

impl Configuration {
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether session cookies must carry the `Secure` attribute.
    pub fn is_secure(&self) -> bool {
        self.url.starts_with("https://")
    }

    /// Normalizes a URL string by ensuring it starts with a valid scheme
    /// (`http` or `https`).
    fn normalize_url(&self, url: &str) -> Result<String, url::ParseError> {
        let url_with_scheme =
            if url.starts_with("http://") || url.starts_with("https://") {
                url.to_string()
            } else {
                format!("https://{url}")
            };

        let parsed_url = Url::parse(&url_with_scheme)?;
        Ok(parsed_url.to_string())
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location.
    pub fn read(self) -> Result<Arc<Self>, url::ParseError> {
        let file_path = if self.path.is_file() {
            self.path.clone()
        } else {
            Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        match File::open(&file_path) {
            Ok(file) => {
                let mut config: Configuration =
                    match serde_yaml::from_reader(file) {
                        Ok(config) => config,
                        Err(err) => {
                            return Ok(Arc::new(self.error(err)));
                        },
                    };

                config.version = VERSION.to_owned();
                config.path = file_path;

                if !config.url.is_empty() {
                    config.url = self.normalize_url(&config.url)?;
                }

                Ok(Arc::new(config))
            },
            Err(err) => Ok(Arc::new(self.error(err))),
        }
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, "`config.yaml` file not found or invalid, using defaults");
        Self {
            path: self.path.clone(),
            ..Default::default()
        }
    }
}
