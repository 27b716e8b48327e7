//! Build-time configuration.
//!
//! The bundle is static, so settings are baked in at compile time from the
//! environment of the build (`VITE_API_URL=https://api.example.com trunk build`).

use tracing::level_filters::LevelFilter;

use crate::query::CacheConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub api_base_url: String,
    pub log_level: LevelFilter,
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Reads `VITE_API_URL` and `AULA_LOG` as they were when the crate was
    /// compiled.
    pub fn from_build_env() -> Self {
        Self::from_values(option_env!("VITE_API_URL"), option_env!("AULA_LOG"))
    }

    /// Blank or unparsable values fall back to the defaults.
    pub fn from_values(api_url: Option<&str>, log_level: Option<&str>) -> Self {
        let api_base_url = api_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        let log_level = log_level
            .and_then(|level| level.trim().parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::INFO);

        Self {
            api_base_url,
            log_level,
            cache: CacheConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = AppConfig::from_values(None, Some("  "));
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.log_level, LevelFilter::INFO);
        assert_eq!(config.cache.stale_time, Duration::ZERO);

        let blank = AppConfig::from_values(Some(""), None);
        assert_eq!(blank.api_base_url, DEFAULT_API_URL);
    }

    #[test]
    fn values_override_defaults() {
        let config = AppConfig::from_values(Some("https://api.aula.dev/"), Some("debug"));
        assert_eq!(config.api_base_url, "https://api.aula.dev");
        assert_eq!(config.log_level, LevelFilter::DEBUG);

        let bad_level = AppConfig::from_values(None, Some("chatty"));
        assert_eq!(bad_level.log_level, LevelFilter::INFO);
    }
}
