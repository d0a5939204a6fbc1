//! Configuration management for the Geoscope application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ExplorerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the Geoscope application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExplorerConfig {
    /// Web server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream provider configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Web server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the HTTP server binds to
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory served as static frontend assets
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Upstream provider configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL for the countries/states/cities directory provider
    #[serde(default = "default_directory_base_url")]
    pub directory_base_url: String,
    /// Base URL for the weather-by-coordinate provider
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
    /// URL for the reverse-geocoding provider
    #[serde(default = "default_reverse_geocode_url")]
    pub reverse_geocode_url: String,
    /// URL for the forward-geocoding provider
    #[serde(default = "default_forward_geocode_url")]
    pub forward_geocode_url: String,
    /// Request timeout in seconds; every request gets exactly one attempt
    #[serde(default = "default_upstream_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_server_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "public".to_string()
}

fn default_directory_base_url() -> String {
    "https://countriesnow.space/api/v0.1".to_string()
}

fn default_weather_base_url() -> String {
    "https://wttr.in".to_string()
}

fn default_reverse_geocode_url() -> String {
    "https://api.bigdatacloud.net/data/reverse-geocode-client".to_string()
}

fn default_forward_geocode_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_upstream_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            directory_base_url: default_directory_base_url(),
            weather_base_url: default_weather_base_url(),
            reverse_geocode_url: default_reverse_geocode_url(),
            forward_geocode_url: default_forward_geocode_url(),
            timeout_seconds: default_upstream_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ExplorerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with GEOSCOPE_ prefix
        builder = builder.add_source(
            Environment::with_prefix("GEOSCOPE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: ExplorerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("geoscope").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ExplorerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        if self.upstream.timeout_seconds == 0 || self.upstream.timeout_seconds > 300 {
            return Err(
                ExplorerError::config("Upstream timeout must be between 1 and 300 seconds").into(),
            );
        }

        for url in [
            &self.upstream.directory_base_url,
            &self.upstream.weather_base_url,
            &self.upstream.reverse_geocode_url,
            &self.upstream.forward_geocode_url,
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ExplorerError::config(format!(
                    "Upstream URL must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        Ok(())
    }
}
