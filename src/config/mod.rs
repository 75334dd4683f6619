use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub storage: StorageConfig,
}

/// Which persistence adapter backs the item and category repositories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Sqlite,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    /// Document path used by the `json` backend
    pub json_path: PathBuf,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    /// The single origin allowed to make cross-origin requests
    pub front_url: String,
    /// Upper bound for multipart upload bodies, in bytes
    pub max_upload_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub image_dir: PathBuf,
    /// Placeholder served when a requested image is missing, relative to `image_dir`
    pub default_image: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            url: DEFAULT_DATABASE_URL.to_string(),
            json_path: PathBuf::from(DEFAULT_JSON_PATH),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            front_url: DEFAULT_FRONT_URL.to_string(),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            default_image: DEFAULT_IMAGE_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, writing the defaults out first
    /// if the file does not exist yet.
    ///
    /// Values are layered: file, then `MERCARI__SECTION__KEY` environment
    /// variables, then `FRONT_URL`.
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let path = Path::new(config_file);
        if !path.exists() {
            let contents = toml::to_string_pretty(&Self::default())?;
            std::fs::write(path, contents)?;
            info!("Created default config file: {}", config_file);
        }

        let mut config: Self = ::config::Config::builder()
            .add_source(::config::File::from(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        if let Ok(front_url) = std::env::var(FRONT_URL_ENV) {
            if !front_url.trim().is_empty() {
                config.web.front_url = front_url;
            }
        }

        Ok(config)
    }

    /// Absolute-or-relative path of the placeholder image
    pub fn default_image_path(&self) -> PathBuf {
        self.storage.image_dir.join(&self.storage.default_image)
    }
}
