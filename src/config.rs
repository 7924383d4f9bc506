use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::ViewOptions;

pub const API_URL_ENV: &str = "CREDENTIAL_DIALOG_API_URL";
pub const TOKEN_ENV: &str = "CREDENTIAL_DIALOG_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_base_url() -> String {
    "https://localhost:9443".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

/// Seed for the credentials listing refreshed after a save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_sort_field")]
    pub sort_field: String,
    #[serde(default = "default_sort_ascending")]
    pub sort_ascending: bool,
}

fn default_page_size() -> u32 {
    10
}

fn default_sort_field() -> String {
    "name".to_string()
}

fn default_sort_ascending() -> bool {
    true
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sort_field: default_sort_field(),
            sort_ascending: default_sort_ascending(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub view: ViewSettings,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("credential-dialog.log")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            view: ViewSettings::default(),
            log_file: default_log_file(),
        }
    }
}

/// A config read from disk whose outcome has not been logged yet
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    /// The file did not exist and defaults were used
    pub created: bool,
}

impl LoadedConfig {
    /// Log where the config came from and write the defaults on first run.
    /// Call once the logger is installed.
    pub fn finish(self) -> Config {
        if self.created {
            info!("Config file {:?} doesn't exist, using defaults", self.path);
            if let Err(e) = self.config.save_to(&self.path) {
                warn!("Could not write default config: {:#}", e);
            }
        } else {
            debug!("Loaded config from {:?}", self.path);
        }
        self.config
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("credential-dialog")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".credential-dialog")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Read `path`, or the default location. Does not log: the log file
    /// itself is configured here.
    pub fn load(path: Option<&Path>) -> Result<LoadedConfig> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path()?,
        };

        if !path.exists() {
            return Ok(LoadedConfig {
                config: Self::default(),
                path,
                created: true,
            });
        }

        let config_content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::parse(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(LoadedConfig {
            config,
            path,
            created: false,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
                fs::create_dir_all(config_dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
                info!("Created config directory: {:?}", config_dir);
            }
        }

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    /// Apply environment variable and command line overrides, in that order
    pub fn apply_overrides(&mut self, api_url: Option<String>, token: Option<String>) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            debug!("Using API URL from {}", API_URL_ENV);
            self.api.base_url = url;
        }
        if let Ok(env_token) = std::env::var(TOKEN_ENV) {
            self.api.token = Some(env_token);
        }

        if let Some(url) = api_url {
            self.api.base_url = url;
        }
        if let Some(token) = token {
            self.api.token = Some(token);
        }
    }

    /// Reject settings no request could succeed with
    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            anyhow::bail!("Missing API URL: set api.base_url, {} or --api-url", API_URL_ENV);
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("API URL must start with http:// or https://, got '{}'", url);
        }
        Ok(())
    }

    /// Listing state the dialog refreshes after a successful save
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            current_page: 1,
            page_size: self.view.page_size,
            sort_field: self.view.sort_field.clone(),
            sort_ascending: self.view.sort_ascending,
            filters: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.api.base_url = "  ".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("Missing API URL"));

        config.api.base_url = "localhost:9443".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, "https://localhost:9443");
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            log_file = "/tmp/dialog.log"

            [api]
            base_url = "https://scanner.example.com"
            accept_invalid_certs = true

            [view]
            sort_ascending = false
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://scanner.example.com");
        assert!(config.api.accept_invalid_certs);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.view.page_size, 10);
        assert!(!config.view.sort_ascending);
        assert_eq!(config.log_file, PathBuf::from("/tmp/dialog.log"));
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = Config::default();
        config.apply_overrides(Some("https://cli.example.com".to_string()), Some("abc".to_string()));
        assert_eq!(config.api.base_url, "https://cli.example.com");
        assert_eq!(config.api.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_view_options_from_settings() {
        let mut config = Config::default();
        config.view.page_size = 25;
        let options = config.view_options();
        assert_eq!(options.page_size, 25);
        assert_eq!(options.current_page, 1);
        assert_eq!(options.sort_field, "name");
    }

    #[test]
    fn test_first_load_writes_defaults_after_finish() {
        let dir = std::env::temp_dir().join(format!("credential-dialog-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let loaded = Config::load(Some(&path)).unwrap();
        assert!(loaded.created);
        assert!(!path.exists());

        let config = loaded.finish();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = Config::load(Some(&path)).unwrap();
        assert!(!reloaded.created);
        assert_eq!(reloaded.config, config);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(Config::parse("[api\nbase_url = 1").is_err());
    }
}
