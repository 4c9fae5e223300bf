// Configuration loading.
// Resolves defaults, then the config file (`--config` or the platform config dir), then `TRENDLY_API_URL`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrendlyError};
use crate::render::WidgetSize;
use crate::state::DEFAULT_INTERVAL;

pub const DEFAULT_API_URL: &str = "https://trendly.servehttp.com:10443/api/keyword/now/";
pub const API_URL_ENV: &str = "TRENDLY_API_URL";
/// Longest accepted refresh interval: one week.
pub const MAX_REFRESH_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint serving the ranked keyword array.
    pub api_url: String,
    pub refresh_interval_minutes: u64,
    pub request_timeout_secs: u64,
    /// Name of the storage slot shared by widgets of this group.
    pub widget_group: String,
    pub size: WidgetSize,
    pub dark_mode: bool,
    /// Skip TLS certificate validation. Only for development servers.
    pub accept_invalid_certs: bool,
    pub refresh_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            refresh_interval_minutes: DEFAULT_INTERVAL.as_secs() / 60,
            request_timeout_secs: 10,
            widget_group: "HomeWidgetPlugin".to_string(),
            size: WidgetSize::default(),
            dark_mode: false,
            accept_invalid_certs: false,
            refresh_on_start: true,
        }
    }
}

impl Config {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_minutes.saturating_mul(60))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load configuration from `path`, or from the default location when `path` is None.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file cannot be read, if any file fails
    /// to parse, or if validation fails. A missing default file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match crate::cache::paths::config_path() {
                Some(default_path) if default_path.exists() => Self::from_file(&default_path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| TrendlyError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply environment overrides using `lookup` to read variables.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.api_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_url).map_err(|e| {
            TrendlyError::InvalidConfig(format!("api_url '{}': {}", self.api_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TrendlyError::InvalidConfig(format!(
                "api_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.refresh_interval_minutes == 0 {
            return Err(TrendlyError::InvalidConfig(
                "refresh_interval_minutes must be greater than 0".to_string(),
            ));
        }
        if self.refresh_interval_minutes > MAX_REFRESH_INTERVAL_MINUTES {
            return Err(TrendlyError::InvalidConfig(format!(
                "refresh_interval_minutes must be at most {}, got {}",
                MAX_REFRESH_INTERVAL_MINUTES, self.refresh_interval_minutes
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(TrendlyError::InvalidConfig(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.widget_group.trim().is_empty() {
            return Err(TrendlyError::InvalidConfig(
                "widget_group must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.refresh_interval(), Duration::from_secs(1800));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.size, WidgetSize::Medium);
        assert!(!config.accept_invalid_certs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            size = "large"
            dark_mode = true
            "#,
        )
        .unwrap();
        assert_eq!(config.size, WidgetSize::Large);
        assert!(config.dark_mode);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.refresh_interval_minutes, 30);
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "api_url = \"http://localhost:8000/api/keyword/now/\"\nrefresh_interval_minutes = 5\n",
        )
        .unwrap();

        let mut config = Config::from_file(&path).unwrap();
        config.apply_env(|_| None);
        assert_eq!(config.api_url, "http://localhost:8000/api/keyword/now/");
        assert_eq!(config.refresh_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(Some(&temp_dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, TrendlyError::Io(_)));
    }

    #[test]
    fn test_parse_error_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "refresh_interval_minutes = \"soon\"").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env(|key| {
            (key == API_URL_ENV).then(|| "http://127.0.0.1:9000/now/".to_string())
        });
        assert_eq!(config.api_url, "http://127.0.0.1:9000/now/");

        let mut config = Config::default();
        config.apply_env(|_| Some("   ".to_string()));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_validation() {
        let config = Config {
            refresh_interval_minutes: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config: Config = toml::from_str("refresh_interval_minutes = 9223372036854775807").unwrap();
        assert!(matches!(config.validate(), Err(TrendlyError::InvalidConfig(_))));
        assert_eq!(config.refresh_interval(), Duration::from_secs(u64::MAX));

        let config = Config {
            refresh_interval_minutes: MAX_REFRESH_INTERVAL_MINUTES,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.refresh_interval(), Duration::from_secs(7 * 24 * 3600));

        let config = Config {
            api_url: "ftp://example.com/feed".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            api_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            widget_group: " ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
