//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use dropbox_core::Config;

/// Validate critical configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();

    // Validate CORS configuration in production
    if is_production && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    if config.password().len() < 8 {
        tracing::warn!("DROPBOX_PASSWORD is shorter than 8 characters");
    }

    let base_url = config.media_base_url();
    if !base_url.starts_with('/') && !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(anyhow::anyhow!(
            "MEDIA_BASE_URL must be an absolute path or an http(s) URL, got {:?}",
            base_url
        ));
    }

    if config.library_file().starts_with(config.media_root()) {
        tracing::warn!(
            library_file = %config.library_file().display(),
            "LIBRARY_FILE lives inside MEDIA_ROOT and will be publicly served"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropbox_core::{BaseConfig, DropboxConfig};
    use std::path::PathBuf;

    fn config(environment: &str, cors: &str, base_url: &str) -> Config {
        Config::new(DropboxConfig {
            base: BaseConfig {
                server_port: 4000,
                cors_origins: vec![cors.to_string()],
                environment: environment.to_string(),
            },
            password: "correct-horse".to_string(),
            media_root: PathBuf::from("./media"),
            media_base_url: base_url.to_string(),
            library_file: PathBuf::from("./dropbox.json"),
            max_upload_size_bytes: 1024,
            ffprobe_path: "ffprobe".to_string(),
            http_concurrency_limit: 64,
        })
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        assert!(validate_config(&config("production", "*", "/media")).is_err());
        assert!(validate_config(&config("development", "*", "/media")).is_ok());
        assert!(validate_config(&config("production", "https://app.example", "/media")).is_ok());
    }

    #[test]
    fn test_relative_media_base_url_rejected() {
        assert!(validate_config(&config("development", "*", "media")).is_err());
        assert!(validate_config(&config("development", "*", "https://cdn.example/media")).is_ok());
    }
}
