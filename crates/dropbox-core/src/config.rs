//! Configuration module
//!
//! Configuration is read once from the process environment (and an optional `.env`
//! file) at startup.

use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 4000;
const MAX_UPLOAD_SIZE_MB: usize = 1024;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

/// Dropbox configuration
#[derive(Clone, Debug)]
pub struct DropboxConfig {
    pub base: BaseConfig,
    /// Shared secret guarding every mutating route
    pub password: String,
    /// Directory holding ingested media and subtitle files
    pub media_root: PathBuf,
    /// URL prefix under which `media_root` is served
    pub media_base_url: String,
    /// JSON document mirroring the library
    pub library_file: PathBuf,
    pub max_upload_size_bytes: usize,
    pub ffprobe_path: String,
    /// Most requests handled at once
    pub http_concurrency_limit: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<DropboxConfig>);

impl Config {
    pub fn new(config: DropboxConfig) -> Self {
        Config(Box::new(config))
    }

    fn as_dropbox(&self) -> &DropboxConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_dropbox().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = DropboxConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_dropbox().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_dropbox().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_dropbox().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_dropbox().base.environment
    }

    pub fn password(&self) -> &str {
        &self.as_dropbox().password
    }

    pub fn media_root(&self) -> &std::path::Path {
        &self.as_dropbox().media_root
    }

    pub fn media_base_url(&self) -> &str {
        &self.as_dropbox().media_base_url
    }

    pub fn library_file(&self) -> &std::path::Path {
        &self.as_dropbox().library_file
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_dropbox().max_upload_size_bytes
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.as_dropbox().ffprobe_path
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_dropbox().http_concurrency_limit
    }
}

/// `MAX_UPLOAD_SIZE_MB` in bytes. Unset means the default; anything unparsable is an error.
fn parse_upload_limit(value: Option<&str>) -> Result<usize, anyhow::Error> {
    let megabytes = match value {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be a valid number"))?,
        None => MAX_UPLOAD_SIZE_MB,
    };
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))
}

fn parse_concurrency_limit(value: Option<&str>) -> Result<usize, anyhow::Error> {
    let limit = match value {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT must be a valid number"))?,
        None => HTTP_CONCURRENCY_LIMIT,
    };
    Ok(limit.max(1))
}

impl DropboxConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
        };

        let config = DropboxConfig {
            base,
            password: env::var("DROPBOX_PASSWORD")
                .map_err(|_| anyhow::anyhow!("DROPBOX_PASSWORD must be set"))?,
            media_root: env::var("MEDIA_ROOT")
                .unwrap_or_else(|_| "./media".to_string())
                .into(),
            media_base_url: env::var("MEDIA_BASE_URL").unwrap_or_else(|_| "/media".to_string()),
            library_file: env::var("LIBRARY_FILE")
                .unwrap_or_else(|_| "./dropbox.json".to_string())
                .into(),
            max_upload_size_bytes: parse_upload_limit(
                env::var("MAX_UPLOAD_SIZE_MB").ok().as_deref(),
            )?,
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            http_concurrency_limit: parse_concurrency_limit(
                env::var("HTTP_CONCURRENCY_LIMIT").ok().as_deref(),
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.password.trim().is_empty() {
            return Err(anyhow::anyhow!("DROPBOX_PASSWORD must not be empty"));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.media_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("MEDIA_BASE_URL must not be empty"));
        }

        if self.library_file.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("LIBRARY_FILE must not be empty"));
        }

        Ok(())
    }
}
