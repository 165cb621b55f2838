//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ServerConfig, SiteConfig};
use crate::config::validation::validate_site;

/// Name of the project configuration file at the project root.
pub const SITE_CONFIG_FILE: &str = "site.json";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load the server configuration from a TOML file.
pub fn load_server_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Parse a `site.json` file.
pub fn read_site_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: SiteConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Load `site.json` from a project directory.
///
/// A missing or unreadable file falls back to the default layout. Validation
/// problems are logged; the configuration is still returned so that the
/// usable parts keep working.
pub fn load_site_config(project: &Path) -> SiteConfig {
    let path = project.join(SITE_CONFIG_FILE);
    let config = if !path.exists() {
        tracing::warn!(path = %path.display(), "Site configuration not found, using defaults");
        SiteConfig::default()
    } else {
        match read_site_config(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Site configuration found");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse site configuration, using defaults");
                SiteConfig::default()
            }
        }
    };

    match validate_site(&config) {
        Ok(()) => tracing::debug!("Site configuration validation passed"),
        Err(errors) => {
            tracing::warn!(count = errors.len(), "Site configuration validation failed");
            for error in &errors {
                tracing::warn!("Validation error: {}", error);
            }
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_site_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_site_config(dir.path()), SiteConfig::default());
    }

    #[test]
    fn test_malformed_site_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SITE_CONFIG_FILE), "{ not json").unwrap();
        assert_eq!(load_site_config(dir.path()), SiteConfig::default());
    }

    #[test]
    fn test_invalid_site_config_still_loaded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(SITE_CONFIG_FILE),
            r#"{ "mappings": [ { "href": "/x/{id}", "template": "x" } ] }"#,
        )
        .unwrap();
        let config = load_site_config(dir.path());
        assert_eq!(config.mappings.len(), 1);
    }

    #[test]
    fn test_load_server_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pagewire.toml");
        fs::write(&path, "[observability]\nlog_level = \"debug\"\n").unwrap();
        let config = load_server_config(&path).unwrap();
        assert_eq!(config.observability.log_level, "debug");

        assert!(matches!(
            load_server_config(&dir.path().join("absent.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
