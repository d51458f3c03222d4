//! Configuration file support for searcher.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `SEARCHER_`, sections separated by
//!    `__`, e.g., `SEARCHER_DATABASE__URL`)
//! 3. Config file (./searcher.toml, then ~/.config/searcher/config.toml)
//! 4. Built-in defaults
//!
//! The database URL defaults to `sqlite://~/.local/state/searcher/searcher.db` on Linux
//! (using the XDG state directory) if not explicitly configured.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "sqlite://~/.local/state/searcher/searcher.db"  # optional, this is the default
//!
//! [github]
//! api_base_url = "https://api.github.com"
//! search_path = "/search/repositories"
//! timeout_secs = 30
//!
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [store]
//! concurrency = 8
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use searcher::SearchConfig;
use searcher::config::{DEFAULT_API_BASE_URL, DEFAULT_SEARCH_PATH, DEFAULT_STORE_CONCURRENCY};
use serde::Deserialize;

/// Default address for `searcher serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub github: GitHubConfig,
    pub server: ServerConfig,
    pub store: StoreConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    /// Supports sqlite:// and postgres:// schemes.
    pub url: Option<String>,
}

/// GitHub search endpoint configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_base_url: String,
    pub search_path: String,
    /// Request timeout in seconds. `0` disables the timeout.
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            timeout_secs: 30,
        }
    }
}

/// REST server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Store access limits.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum concurrent store operations.
    pub concurrency: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_STORE_CONCURRENCY,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/searcher/config.toml)
    /// 3. Local config file (./searcher.toml)
    /// 4. Environment variables with SEARCHER_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("searcher.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./searcher.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., SEARCHER_GITHUB__API_BASE_URL -> github.api_base_url
        builder = builder.add_source(
            Environment::with_prefix("SEARCHER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the database URL, falling back to the default state directory path.
    ///
    /// The `mode=rwc` parameter enables read-write access and creates the file
    /// if it doesn't exist.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| {
                let db_path = state_dir.join("searcher.db");
                format!("sqlite://{}?mode=rwc", db_path.display())
            })
        })
    }

    /// Library configuration for the search client and service.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            api_base_url: self.github.api_base_url.clone(),
            search_path: self.github.search_path.clone(),
            request_timeout: (self.github.timeout_secs > 0)
                .then(|| Duration::from_secs(self.github.timeout_secs)),
            store_concurrency: self.store.concurrency.max(1),
            ..SearchConfig::default()
        }
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "searcher").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the default state directory path.
    ///
    /// On Linux, this is `$XDG_STATE_HOME/searcher` or `~/.local/state/searcher`.
    /// On macOS/Windows, falls back to the data directory.
    pub fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "searcher").map(|dirs| {
            // state_dir() returns None on macOS/Windows
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(content: &str) -> Config {
        ConfigBuilder::builder()
            .add_source(config::File::from_str(content, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.database.url.is_none());
        assert_eq!(config.github.api_base_url, "https://api.github.com");
        assert_eq!(config.github.search_path, "/search/repositories");
        assert_eq!(config.github.timeout_secs, 30);
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert_eq!(config.store.concurrency, DEFAULT_STORE_CONCURRENCY);
    }

    #[test]
    fn test_full_config_parsing() {
        let config = from_toml(
            r#"
            [database]
            url = "sqlite:///tmp/test.db"

            [github]
            api_base_url = "http://localhost:9999"
            search_path = "/api/v3/search/repositories"
            timeout_secs = 5

            [server]
            bind = "0.0.0.0:3000"

            [store]
            concurrency = 2
        "#,
        );

        assert_eq!(config.database.url.as_deref(), Some("sqlite:///tmp/test.db"));
        assert_eq!(config.github.api_base_url, "http://localhost:9999");
        assert_eq!(config.github.search_path, "/api/v3/search/repositories");
        assert_eq!(config.github.timeout_secs, 5);
        assert_eq!(config.server.bind, "0.0.0.0:3000");
        assert_eq!(config.store.concurrency, 2);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = from_toml(
            r#"
            [github]
            timeout_secs = 10
        "#,
        );

        assert_eq!(config.github.timeout_secs, 10);
        assert_eq!(config.github.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.server.bind, DEFAULT_BIND);
    }

    #[test]
    fn test_search_config_mapping() {
        let config = from_toml(
            r#"
            [github]
            api_base_url = "http://localhost:9999"
            timeout_secs = 0

            [store]
            concurrency = 0
        "#,
        );

        let search = config.search_config();
        assert_eq!(search.api_base_url, "http://localhost:9999");
        assert_eq!(search.search_path, DEFAULT_SEARCH_PATH);
        assert!(search.request_timeout.is_none());
        assert_eq!(search.store_concurrency, 1);
        assert!(search.user_agent.starts_with("searcher/"));
    }

    #[test]
    fn test_search_config_timeout() {
        let search = Config::default().search_config();
        assert_eq!(search.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_database_url_defaults_to_state_dir() {
        let url = Config::default().database_url().unwrap();
        assert!(url.starts_with("sqlite://"));
        assert!(url.contains("searcher.db"));
        assert!(url.ends_with("?mode=rwc"));
    }

    #[test]
    fn test_database_url_respects_configured_value() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/searcher"
        "#,
        );
        assert_eq!(
            config.database_url(),
            Some("postgres://localhost/searcher".to_string())
        );
    }

    #[test]
    fn test_config_invalid_toml() {
        let result = ConfigBuilder::builder()
            .add_source(config::File::from_str("[github\ntimeout_secs = 1", FileFormat::Toml))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_unknown_fields_ignored() {
        let config = from_toml(
            r#"
            [server]
            bind = "127.0.0.1:1"
            unknown_field = "should be ignored"
        "#,
        );
        assert_eq!(config.server.bind, "127.0.0.1:1");
    }
}
