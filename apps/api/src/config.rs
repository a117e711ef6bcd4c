use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every key has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub job_cache_ttl: Duration,
    pub scrape_keywords: String,
    pub scrape_max_jobs: usize,
    pub scrape_timeout: Duration,
    pub enable_live_scraping: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 16 * 1024 * 1024,
            job_cache_ttl: Duration::from_secs(1800),
            scrape_keywords: "software developer".to_string(),
            scrape_max_jobs: 25,
            scrape_timeout: Duration::from_secs(10),
            enable_live_scraping: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            job_cache_ttl: Duration::from_secs(parse_env(
                "JOB_CACHE_TTL_SECS",
                defaults.job_cache_ttl.as_secs(),
            )?),
            scrape_keywords: std::env::var("SCRAPE_KEYWORDS").unwrap_or(defaults.scrape_keywords),
            scrape_max_jobs: parse_env("SCRAPE_MAX_JOBS", defaults.scrape_max_jobs)?,
            scrape_timeout: Duration::from_secs(parse_env(
                "SCRAPE_TIMEOUT_SECS",
                defaults.scrape_timeout.as_secs(),
            )?),
            enable_live_scraping: parse_env("ENABLE_LIVE_SCRAPING", defaults.enable_live_scraping)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.job_cache_ttl, Duration::from_secs(1800));
        assert_eq!(config.scrape_max_jobs, 25);
        assert!(config.enable_live_scraping);
    }

    #[test]
    fn test_parse_env_missing_key_uses_default() {
        let value: u16 = parse_env("JOBMATCH_TEST_UNSET_KEY", 4242).unwrap();
        assert_eq!(value, 4242);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("JOBMATCH_TEST_BAD_PORT", "not-a-port");
        let result: Result<u16> = parse_env("JOBMATCH_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("JOBMATCH_TEST_BAD_PORT");
    }

    #[test]
    fn test_parse_env_reads_bool() {
        std::env::set_var("JOBMATCH_TEST_FLAG", "false");
        let value: bool = parse_env("JOBMATCH_TEST_FLAG", true).unwrap();
        assert!(!value);
        std::env::remove_var("JOBMATCH_TEST_FLAG");
    }
}
