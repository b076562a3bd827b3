//! Configuration types for the vitrine service

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default)]
    pub auth_backend: BackendConfig,
    #[serde(default)]
    pub data_backend: BackendConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Gallery layout and caching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_columns")]
    pub columns: usize,
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
    #[serde(default = "default_iframe_height")]
    pub iframe_height: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            columns: default_columns(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            iframe_height: default_iframe_height(),
        }
    }
}

/// Coordinates of one hosted table backend.
///
/// `url` and `key` may be omitted from the config file; `resolve_secrets`
/// fills them from the environment before startup completes.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub table: Option<String>,
}

impl BackendConfig {
    /// Returns (url, key), failing if either is still unresolved.
    pub fn coordinates(&self, label: &str) -> crate::Result<(&str, &str)> {
        let url = self.url.as_deref().ok_or_else(|| {
            crate::VitrineError::Config(format!("{} backend url is not configured", label))
        })?;
        let key = self.key.as_deref().ok_or_else(|| {
            crate::VitrineError::Config(format!("{} backend key is not configured", label))
        })?;
        Ok((url, key))
    }
}

fn default_port() -> u16 {
    8080
}

fn default_page_size() -> usize {
    8
}

fn default_columns() -> usize {
    2
}

fn default_cache_ttl_seconds() -> u64 {
    60
}

fn default_iframe_height() -> u32 {
    600
}

fn default_users_table() -> String {
    "users".to_string()
}

fn default_data_table() -> String {
    "alura_gemini".to_string()
}

impl Config {
    /// Fill backend coordinates that are absent from the config file from the
    /// environment, and apply the default table names. Fails if any of the
    /// four secrets is available from neither source.
    pub fn resolve_secrets(&mut self) -> crate::Result<()> {
        self.resolve_secrets_from(|name| std::env::var(name).ok())
    }

    /// Same as `resolve_secrets`, with an injectable lookup so tests do not
    /// mutate the process environment.
    pub fn resolve_secrets_from<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        resolve_field(&mut self.auth_backend.url, "USER_PROJECT_URL", &lookup)?;
        resolve_field(&mut self.auth_backend.key, "USER_PROJECT_KEY", &lookup)?;
        resolve_field(&mut self.data_backend.url, "DATA_PROJECT_URL", &lookup)?;
        resolve_field(&mut self.data_backend.key, "DATA_PROJECT_KEY", &lookup)?;

        if self.auth_backend.table.is_none() {
            self.auth_backend.table = Some(default_users_table());
        }
        if self.data_backend.table.is_none() {
            self.data_backend.table = Some(default_data_table());
        }
        Ok(())
    }
}

fn resolve_field<F>(field: &mut Option<String>, var: &str, lookup: &F) -> crate::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if field.is_none() {
        *field = lookup(var);
    }
    if field.is_none() {
        return Err(crate::VitrineError::Config(format!(
            "Missing secret: set {} in the config file or environment",
            var
        )));
    }
    Ok(())
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::VitrineError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let json = r#"{}"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.gallery.page_size, 8);
        assert_eq!(config.gallery.columns, 2);
        assert_eq!(config.gallery.cache_ttl_seconds, 60);
        assert_eq!(config.gallery.iframe_height, 600);
        assert!(config.auth_backend.url.is_none());
        assert!(config.data_backend.table.is_none());
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "server": { "port": 9000 },
            "gallery": {
                "page_size": 12,
                "columns": 3,
                "cache_ttl_seconds": 30,
                "iframe_height": 400
            },
            "auth_backend": {
                "url": "https://auth.example.test",
                "key": "auth-key",
                "table": "members"
            },
            "data_backend": {
                "url": "https://data.example.test",
                "key": "data-key",
                "table": "projects"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.gallery.page_size, 12);
        assert_eq!(config.gallery.columns, 3);
        assert_eq!(config.gallery.cache_ttl_seconds, 30);
        assert_eq!(config.gallery.iframe_height, 400);
        assert_eq!(
            config.auth_backend.url.as_deref(),
            Some("https://auth.example.test")
        );
        assert_eq!(config.auth_backend.table.as_deref(), Some("members"));
        assert_eq!(config.data_backend.key.as_deref(), Some("data-key"));
    }

    #[test]
    fn resolve_secrets_fills_missing_fields_from_lookup() {
        let mut config = Config::default();
        config
            .resolve_secrets_from(|name| Some(format!("value-of-{}", name)))
            .unwrap();

        assert_eq!(
            config.auth_backend.url.as_deref(),
            Some("value-of-USER_PROJECT_URL")
        );
        assert_eq!(
            config.data_backend.key.as_deref(),
            Some("value-of-DATA_PROJECT_KEY")
        );
        assert_eq!(config.auth_backend.table.as_deref(), Some("users"));
        assert_eq!(config.data_backend.table.as_deref(), Some("alura_gemini"));
    }

    #[test]
    fn resolve_secrets_prefers_config_file_values() {
        let mut config = Config::default();
        config.auth_backend.url = Some("https://from-file.test".to_string());
        config
            .resolve_secrets_from(|name| Some(format!("value-of-{}", name)))
            .unwrap();

        assert_eq!(
            config.auth_backend.url.as_deref(),
            Some("https://from-file.test")
        );
    }

    #[test]
    fn resolve_secrets_missing_is_fatal() {
        let mut config = Config::default();
        let err = config.resolve_secrets_from(|_| None).unwrap_err();
        assert!(err.to_string().contains("USER_PROJECT_URL"));
    }

    #[test]
    fn coordinates_errors_when_unresolved() {
        let backend = BackendConfig::default();
        let err = backend.coordinates("data").unwrap_err();
        assert!(err.to_string().contains("data backend url"));
    }

    #[test]
    fn load_config_missing_file() {
        let result = load_config(Path::new("/nonexistent/config.json"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"server": {"port": 9999}}"#).unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn load_config_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, "not json").unwrap();

        let result = load_config(&config_path);
        assert!(result.is_err());
    }
}
