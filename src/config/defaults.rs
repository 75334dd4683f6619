/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Database defaults
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./db/mercari.sqlite3";
pub const DEFAULT_JSON_PATH: &str = "./db/items.json";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_FRONT_URL: &str = "http://localhost:3000";
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

// Storage defaults
pub const DEFAULT_IMAGE_DIR: &str = "./images";
pub const DEFAULT_IMAGE_NAME: &str = "default.jpg";

/// Environment variable naming the single allowed cross-origin caller
pub const FRONT_URL_ENV: &str = "FRONT_URL";

/// Prefix for layered environment overrides, e.g. `MERCARI__WEB__PORT=9100`
pub const ENV_PREFIX: &str = "MERCARI";
