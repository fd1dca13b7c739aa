//! Application Configuration
//! Mission: Load settings once at startup and fail closed on a missing signing secret

use anyhow::Context;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DATABASE_PATH: &str = "folio.db";
pub const DEFAULT_UPLOAD_DIR: &str = "public/uploads";
pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";

/// bcrypt cost for accounts created through the registration endpoint.
pub const REGISTRATION_BCRYPT_COST: u32 = 12;
/// bcrypt cost for seeded accounts.
pub const SEED_BCRYPT_COST: u32 = 10;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
/// Upper bound for `MAX_UPLOAD_BYTES`; uploads are buffered in memory.
pub const MAX_UPLOAD_BYTES_LIMIT: usize = 100 * 1024 * 1024;

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Startup configuration errors. Any of these stops the process.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set; refusing to start without a signing secret")]
    MissingSecret,
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to load config file: {0}")]
    File(String),
}

/// Optional TOML file. Never carries the signing secret.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    bind_addr: Option<String>,
    database_path: Option<String>,
    upload_dir: Option<PathBuf>,
    bcrypt_cost: Option<u32>,
    max_upload_bytes: Option<usize>,
    protected_prefixes: Option<Vec<String>>,
}

impl From<anyhow::Error> for ConfigError {
    fn from(err: anyhow::Error) -> Self {
        ConfigError::File(format!("{:#}", err))
    }
}

impl FileConfig {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_path: String,
    pub upload_dir: PathBuf,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    pub max_upload_bytes: usize,
    pub protected_prefixes: Vec<String>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_path", &self.database_path)
            .field("upload_dir", &self.upload_dir)
            .field("jwt_secret", &"<redacted>")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("protected_prefixes", &self.protected_prefixes)
            .finish()
    }
}

pub fn default_protected_prefixes() -> Vec<String> {
    vec!["/api/admin".to_string(), "/api/upload".to_string()]
}

impl AppConfig {
    /// Build from the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Environment values override the TOML file.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let file = match get("FOLIO_CONFIG") {
            Some(path) => FileConfig::load(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                FileConfig::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => FileConfig::default(),
        };

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::MissingSecret)?;

        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(raw) => parse_value("BCRYPT_COST", &raw)?,
            None => file.bcrypt_cost.unwrap_or(REGISTRATION_BCRYPT_COST),
        };
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(raw) => parse_value("MAX_UPLOAD_BYTES", &raw)?,
            None => file.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };
        if max_upload_bytes == 0 || max_upload_bytes > MAX_UPLOAD_BYTES_LIMIT {
            return Err(ConfigError::InvalidValue {
                key: "MAX_UPLOAD_BYTES",
                value: max_upload_bytes.to_string(),
            });
        }

        let (raw_prefixes, protected_prefixes) = match get("PROTECTED_PREFIXES") {
            Some(raw) => {
                let prefixes = normalize_prefixes(raw.split(','));
                (raw, prefixes)
            }
            None => {
                let configured = file
                    .protected_prefixes
                    .unwrap_or_else(default_protected_prefixes);
                let prefixes = normalize_prefixes(configured.iter().map(String::as_str));
                (configured.join(","), prefixes)
            }
        };
        // an empty gate would leave every admin route public
        if protected_prefixes.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "PROTECTED_PREFIXES",
                value: raw_prefixes,
            });
        }

        Ok(Self {
            bind_addr: get("FOLIO_BIND_ADDR")
                .or(file.bind_addr)
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_path: get("DATABASE_PATH")
                .or(file.database_path)
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .or(file.upload_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            jwt_secret,
            bcrypt_cost,
            max_upload_bytes,
            protected_prefixes,
        })
    }
}

/// Trimmed, without trailing slashes; blanks and a bare `/` are dropped.
fn normalize_prefixes<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    raw.map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
