use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "https://www.procyclingstats.com";
const DEFAULT_USER_AGENT: &str = "pcs_compare/0.1";
const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_MAX_RETRIES: u32 = 3;
const MAX_RETRIES_CAP: u32 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const BASE_BACKOFF_MS: u64 = 1500;

/// Runtime settings for the retrieval layer.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub user_agent: String,
    pub concurrency: usize,
    pub max_retries: u32,
    pub timeout: Duration,
    pub base_backoff: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            base_backoff: Duration::from_millis(BASE_BACKOFF_MS),
        }
    }
}

impl Config {
    /// Defaults overlaid with `PCS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        if let Ok(url) = std::env::var("PCS_BASE_URL") {
            cfg.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(ua) = std::env::var("PCS_USER_AGENT") {
            cfg.user_agent = ua;
        }
        if let Some(n) = parse_var::<usize>("PCS_CONCURRENCY")? {
            // a zero-permit semaphore would never hand out a permit
            cfg.concurrency = n.max(1);
        }
        if let Some(n) = parse_var::<u32>("PCS_MAX_RETRIES")? {
            cfg.max_retries = n.min(MAX_RETRIES_CAP);
        }
        if let Some(secs) = parse_var::<u64>("PCS_TIMEOUT_SECS")? {
            cfg.timeout = Duration::from_secs(secs);
        }

        Ok(cfg)
    }
}

fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("{key} must be a number, got {raw:?}"))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_pcs() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url, "https://www.procyclingstats.com");
        assert_eq!(cfg.concurrency, 4);
        assert_eq!(cfg.max_retries, 3);
    }

    #[test]
    fn missing_var_is_none() {
        let v = parse_var::<u32>("PCS_COMPARE_SURELY_UNSET_VAR").unwrap();
        assert!(v.is_none());
    }

    #[test]
    fn retries_are_capped() {
        std::env::set_var("PCS_MAX_RETRIES", "64");
        let cfg = Config::from_env().unwrap();
        std::env::remove_var("PCS_MAX_RETRIES");
        assert_eq!(cfg.max_retries, MAX_RETRIES_CAP);
    }
}
