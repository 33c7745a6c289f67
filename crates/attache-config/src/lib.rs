//! Configuration management for Attache.
//!
//! Parses `attache.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `confluence.base_url`
//! - `confluence.auth.username`
//! - `confluence.auth.password`
//! - `confluence.auth.token`

mod expand;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "attache.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Confluence connection settings.
    pub confluence: ConfluenceConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Confluence connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfluenceConfig {
    /// Confluence server base URL.
    pub base_url: String,
    /// REST API path appended to `base_url`.
    #[serde(default = "default_api_path")]
    pub api_path: String,
    /// Global request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Credentials. Requests are sent anonymously when absent.
    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

/// Credentials sent with every request.
#[derive(Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthConfig {
    /// HTTP Basic authentication.
    Basic {
        /// Account name.
        username: String,
        /// Account password or API token.
        password: String,
    },
    /// Bearer personal access token.
    Bearer {
        /// Token value.
        token: String,
    },
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

fn default_api_path() -> String {
    "/rest/api".to_owned()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ConfluenceConfig {
    /// Create a config with default API path and timeout and no credentials.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_path: default_api_path(),
            timeout_secs: default_timeout_secs(),
            auth: None,
        }
    }

    /// REST API root, e.g. `https://confluence.example.com/rest/api`.
    pub fn api_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.api_path.trim_end_matches('/')
        )
    }

    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "confluence.base_url")?;
        require_http_url(&self.base_url, "confluence.base_url")?;
        if !self.api_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "confluence.api_path must start with /".to_owned(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "confluence.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        match &self.auth {
            Some(AuthConfig::Basic { username, password }) => {
                require_non_empty(username, "confluence.auth.username")?;
                require_non_empty(password, "confluence.auth.password")?;
            }
            Some(AuthConfig::Bearer { token }) => {
                require_non_empty(token, "confluence.auth.token")?;
            }
            None => {}
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.base_url = expand::expand_env(&self.base_url, "confluence.base_url")?;
        match &mut self.auth {
            Some(AuthConfig::Basic { username, password }) => {
                *username = expand::expand_env(username, "confluence.auth.username")?;
                *password = expand::expand_env(password, "confluence.auth.password")?;
            }
            Some(AuthConfig::Bearer { token }) => {
                *token = expand::expand_env(token, "confluence.auth.token")?;
            }
            None => {}
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.auth.token`").
        field: String,
        /// Error message (e.g., "${`CONFLUENCE_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `attache.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if no config file is found, or parsing, expansion or
    /// validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) if !path.exists() => Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::load_from_file(path),
            None => {
                let discovered = Self::discover_config()
                    .ok_or_else(|| ConfigError::NotFound(PathBuf::from(CONFIG_FILENAME)))?;
                Self::load_from_file(&discovered)
            }
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.confluence.expand_env_vars()?;
        config.confluence.validate()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }
}
