//! Configuration loader
//!
//! Handles loading configuration from various sources including
//! TOML files, environment variables, and default values.

use crate::config::{AppConfig, CacheBackend, EventBusProvider, UpstreamConfig};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use ors_domain::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix, `__` separating nested keys
    ///    (e.g., `ORS_UPSTREAMS__PRODUCTS__POLICY__RETRY_COUNT`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .map_err(|e| Error::config(format!("Failed to extract configuration: {e}")))?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
///
/// Performs validation of all configuration sections.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    validate_cache_config(config)?;
    validate_event_bus_config(config)?;
    validate_upstream_config("users", &config.upstreams.users)?;
    validate_upstream_config("products", &config.upstreams.products)?;
    Ok(())
}

fn validate_cache_config(config: &AppConfig) -> Result<()> {
    match config.cache.provider {
        CacheBackend::Redis if config.cache.redis_url.as_deref().is_none_or(str::is_empty) => Err(
            Error::config("Redis URL is required when the Redis cache is selected"),
        ),
        CacheBackend::Memory if config.cache.max_entries == 0 => {
            Err(Error::config("Memory cache max_entries cannot be 0"))
        }
        _ => Ok(()),
    }
}

fn validate_event_bus_config(config: &AppConfig) -> Result<()> {
    if config.event_bus.provider == EventBusProvider::Nats
        && config.event_bus.nats_url.as_deref().is_none_or(str::is_empty)
    {
        return Err(Error::config(
            "NATS URL is required when the NATS event bus is selected",
        ));
    }
    Ok(())
}

fn validate_upstream_config(name: &str, upstream: &UpstreamConfig) -> Result<()> {
    if upstream.base_url.trim().is_empty() {
        return Err(Error::config(format!("{name}: base_url cannot be empty")));
    }

    let policy = &upstream.policy;
    if policy.timeout_ms == 0 {
        return Err(Error::config(format!("{name}: timeout_ms cannot be 0")));
    }
    if policy.failure_threshold == 0 {
        return Err(Error::config(format!(
            "{name}: failure_threshold cannot be 0"
        )));
    }
    if policy.break_duration_secs == 0 {
        return Err(Error::config(format!(
            "{name}: break_duration_secs cannot be 0"
        )));
    }
    if policy.max_concurrent == 0 {
        return Err(Error::config(format!("{name}: max_concurrent cannot be 0")));
    }
    if !policy.retry_backoff_base_secs.is_finite() || policy.retry_backoff_base_secs < 1.0 {
        return Err(Error::config(format!(
            "{name}: retry_backoff_base_secs must be at least 1"
        )));
    }

    let cache = &upstream.cache;
    if cache.absolute_ttl_secs == 0 {
        return Err(Error::config(format!(
            "{name}: cache absolute_ttl_secs cannot be 0"
        )));
    }
    if cache.sliding_ttl_secs > cache.absolute_ttl_secs {
        return Err(Error::config(format!(
            "{name}: cache sliding_ttl_secs cannot exceed absolute_ttl_secs"
        )));
    }

    if upstream.invalidation.enabled && upstream.invalidation.stream.trim().is_empty() {
        return Err(Error::config(format!(
            "{name}: invalidation stream cannot be empty"
        )));
    }
    Ok(())
}
