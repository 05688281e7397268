use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::surface::DEFAULT_SURFACE_ID;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Cookies preloaded into the transport's jar, as `name=value` strings.
#[derive(Deserialize, Clone, Default)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub cookies: Vec<String>,
}

// Manual Debug impl to avoid leaking session cookies
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self
            .cookies
            .iter()
            .map(|c| c.split('=').next().unwrap_or_default().trim())
            .collect();
        f.debug_struct("CredentialsConfig")
            .field("cookies", &names)
            .field("values", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct HttpConfig {
    /// Request timeout. Unset means the client default applies.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_surface_id")]
    pub surface_id: String,
    /// Render into this file instead of stdout.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            surface_id: default_surface_id(),
            path: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_surface_id() -> String {
    DEFAULT_SURFACE_ID.to_string()
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Load from file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        } else {
            builder = builder.add_source(
                config::File::with_name("protected-fetch").required(false),
            );
        }

        // Environment variable overrides with PROTECTED_FETCH_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("PROTECTED_FETCH")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("credentials.cookies")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.server.base_url).map_err(|e| {
            AppError::Config(format!("Invalid server.base_url {}: {e}", self.server.base_url))
        })?;

        if let Some(bad) = self.credentials.cookies.iter().find(|c| !c.contains('=')) {
            return Err(AppError::Config(format!(
                "Cookie must be NAME=VALUE, got: {}",
                bad.split(';').next().unwrap_or_default()
            )));
        }

        if self.output.surface_id.trim().is_empty() {
            return Err(AppError::Config("output.surface_id must not be empty".to_string()));
        }

        Ok(())
    }
}
