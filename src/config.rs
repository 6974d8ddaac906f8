//! Client configuration from defaults, `.env`, environment and flags.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::format::Locale;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
/// Per-request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Window size for `recent` listings and refreshes.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Settings for talking to the task service and rendering results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service root, including the `/api` prefix.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// How many tasks `recent` and `watch` fetch.
    pub recent_limit: usize,
    /// Language for labels and messages.
    pub locale: Locale,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            recent_limit: DEFAULT_RECENT_LIMIT,
            locale: Locale::default(),
        }
    }
}

impl ClientConfig {
    /// Loads `.env` if present, then reads `VIEWTASK_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error string naming the variable whose value is invalid.
    pub fn from_env() -> Result<Self, String> {
        // A missing .env file is the normal case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error string naming the variable whose value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("VIEWTASK_API_URL") {
            config.base_url = normalize_base_url(&url)?;
        }
        if let Some(secs) = lookup("VIEWTASK_TIMEOUT_SECS") {
            let secs: u64 = parse_var("VIEWTASK_TIMEOUT_SECS", &secs)?;
            if secs == 0 {
                return Err("VIEWTASK_TIMEOUT_SECS must be greater than 0".to_string());
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = lookup("VIEWTASK_RECENT_LIMIT") {
            config.recent_limit = parse_var("VIEWTASK_RECENT_LIMIT", &limit)?;
        }
        if let Some(locale) = lookup("VIEWTASK_LOCALE") {
            config.locale = parse_var("VIEWTASK_LOCALE", &locale)?;
        }
        Ok(config)
    }

    /// Applies command-line overrides on top of the loaded values.
    ///
    /// # Errors
    ///
    /// Returns an error string if the override URL is invalid.
    pub fn with_overrides(
        mut self,
        base_url: Option<&str>,
        locale: Option<Locale>,
    ) -> Result<Self, String> {
        if let Some(url) = base_url {
            self.base_url = normalize_base_url(url)?;
        }
        if let Some(locale) = locale {
            self.locale = locale;
        }
        Ok(self)
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| format!("invalid value for {name} ('{raw}'): {e}"))
}

fn normalize_base_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(format!("API URL must start with http:// or https:// (got '{raw}')"));
    }
    Ok(trimmed.to_string())
}
