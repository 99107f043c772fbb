//! Application configuration: TOML file plus environment overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use verone_core::error::{CoreError, CoreResult};
use verone_store::{
    SupabaseConfig, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_RETRIES,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

/// Environment variable overriding `supabase.url`.
pub const ENV_SUPABASE_URL: &str = "VERONE_SUPABASE_URL";
/// Environment variable overriding `supabase.api_key`.
pub const ENV_SUPABASE_KEY: &str = "VERONE_SUPABASE_KEY";
/// Environment variable overriding `log.level`.
pub const ENV_LOG: &str = "VERONE_LOG";

const DEFAULT_LOG_LEVEL: &str = "info";

/// Top-level configuration.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`VERONE_*`)
/// 2. Config file
/// 3. Compiled defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub supabase: SupabaseSettings,
    pub log: LogSettings,
}

/// `[supabase]` section. Every key is optional in the file so that secrets
/// can come from the environment instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SupabaseSettings {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub schema: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

/// `[log]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive, e.g. `info` or `verone_core=debug,warn`.
    pub level: Option<String>,
}

impl AppConfig {
    /// Load `path`, apply environment overrides and validate.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigError(format!("Cannot read {}: {e}", path.display()))
        })?;
        let mut config = Self::from_toml(&content).map_err(|e| match e {
            CoreError::ConfigError(msg) => {
                CoreError::ConfigError(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a TOML document, without overrides or validation.
    pub fn from_toml(toml_str: &str) -> CoreResult<Self> {
        toml::from_str(toml_str).map_err(|e| CoreError::ConfigError(e.to_string()))
    }

    /// Apply `VERONE_*` overrides. Empty values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_SUPABASE_URL) {
            self.supabase.url = Some(url);
        }
        if let Some(key) = lookup(ENV_SUPABASE_KEY) {
            self.supabase.api_key = Some(key);
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.log.level = Some(level);
        }
    }

    /// Check the values needed to reach Supabase.
    pub fn validate(&self) -> CoreResult<()> {
        let url = self
            .supabase
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                CoreError::ConfigError(format!("supabase.url is required (or set {ENV_SUPABASE_URL})"))
            })?;
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(CoreError::ConfigError(format!(
                "supabase.url must be an http(s) URL, got '{url}'"
            )));
        }

        if self
            .supabase
            .api_key
            .as_deref()
            .is_none_or(|k| k.trim().is_empty())
        {
            return Err(CoreError::ConfigError(format!(
                "supabase.api_key is required (or set {ENV_SUPABASE_KEY})"
            )));
        }

        if self.supabase.request_timeout_secs == Some(0) {
            return Err(CoreError::ConfigError(
                "supabase.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Client settings for `verone-store`.
    pub fn supabase_config(&self) -> CoreResult<SupabaseConfig> {
        self.validate()?;
        let s = &self.supabase;
        Ok(SupabaseConfig {
            url: s.url.clone().unwrap_or_default().trim().to_string(),
            api_key: s.api_key.clone().unwrap_or_default(),
            schema: s.schema.clone().filter(|v| !v.is_empty()),
            connect_timeout_secs: s
                .connect_timeout_secs
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout_secs: s
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_retries: s.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        })
    }

    /// Log filter directive.
    #[must_use]
    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
