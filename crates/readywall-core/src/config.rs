//! Configuration management for the `ReadyWall` admin client

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Gateway (remote REST API) configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Session storage configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Dashboard configuration
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Image upload limits
    #[serde(default)]
    pub uploads: UploadConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Prefix for relative image filenames (defaults to `base_url`)
    #[serde(default)]
    pub asset_base_url: Option<String>,

    /// Request timeout in seconds; unset leaves the transport default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Session storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File the admin token is persisted in
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Number of recent leads shown on the dashboard
    #[serde(default = "default_recent_leads")]
    pub recent_leads: u32,
}

/// Image upload limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum size of a single image in bytes
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,

    /// MIME types accepted for product and blog images
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_token_file() -> PathBuf {
    directories::ProjectDirs::from("in", "readywall", "readywall-admin").map_or_else(
        || PathBuf::from(".readywall-session.json"),
        |dirs| dirs.data_dir().join("session.json"),
    )
}

const fn default_recent_leads() -> u32 {
    6
}

const fn default_max_image_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_allowed_mime_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/webp".to_string(),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            asset_base_url: None,
            request_timeout_secs: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_leads: default_recent_leads(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: default_max_image_bytes(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl GatewayConfig {
    /// Base URL without trailing slashes
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Prefix used to resolve relative image filenames
    #[must_use]
    pub fn asset_base_url(&self) -> &str {
        self.asset_base_url
            .as_deref()
            .map_or_else(|| self.base_url(), |base| base.trim_end_matches('/'))
    }
}

impl Config {
    /// Load configuration from an optional file and `READYWALL_*` environment variables
    ///
    /// Without an explicit path a `readywall.{toml,json,yaml}` in the working
    /// directory is picked up when present.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or the result fails validation.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        Self::load_with_env(path, None)
    }

    /// `env` replaces the process environment when given
    fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("readywall").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("READYWALL")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check values that serde defaults cannot guard
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the offending key.
    pub fn validate(&self) -> crate::Result<()> {
        if !is_http_url(self.gateway.base_url()) {
            return Err(crate::Error::Configuration {
                message: format!(
                    "gateway.base_url must be an absolute http(s) URL, got '{}'",
                    self.gateway.base_url
                ),
            });
        }

        if let Some(asset_base) = &self.gateway.asset_base_url
            && !is_http_url(asset_base)
        {
            return Err(crate::Error::Configuration {
                message: format!(
                    "gateway.asset_base_url must be an absolute http(s) URL, got '{asset_base}'"
                ),
            });
        }

        if self.gateway.request_timeout_secs == Some(0) {
            return Err(crate::Error::Configuration {
                message: "gateway.request_timeout_secs must be greater than zero".to_string(),
            });
        }

        if self.uploads.allowed_mime_types.is_empty() {
            return Err(crate::Error::Configuration {
                message: "uploads.allowed_mime_types must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    ["http://", "https://"].iter().any(|scheme| {
        lower
            .strip_prefix(scheme)
            .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('/'))
    })
}
