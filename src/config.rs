//! Upstream API configuration
//!
//! The configuration is an explicit value handed to the client at startup.
//! Nothing here reads global state except [`ApiConfig::from_env`].

use std::time::Duration;

/// Environment variable selecting the upstream base URL
pub const API_URL_ENV: &str = "DRAMABOX_API_URL";

/// Base URL used when no override is given
pub const DEFAULT_BASE_URL: &str = "https://dramabox.sansekai.my.id/api";

/// Per-attempt request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Number of retries after the first failed attempt
pub const DEFAULT_RETRIES: u32 = 3;

/// Backoff unit; the delay before retry `n` is `n * DEFAULT_BACKOFF_STEP`
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(1000);

/// Connection settings for the upstream catalog API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to (no trailing slash)
    pub base_url: String,
    /// Maximum duration of a single attempt
    pub timeout: Duration,
    /// How many times a failed request is retried
    pub retries: u32,
    /// Linear backoff unit between attempts
    pub backoff_step: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            backoff_step: DEFAULT_BACKOFF_STEP,
        }
    }
}

impl ApiConfig {
    /// Creates a configuration pointing at `base_url` with default limits.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Reads the base URL from [`API_URL_ENV`], falling back to the default.
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_backoff_step(mut self, step: Duration) -> Self {
        self.backoff_step = step;
        self
    }

    /// Delay slept before retry number `attempt` (1-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }

    /// Full URL for an endpoint path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Fixed upstream endpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Vip,
    Dubbed,
    RandomDrama,
    ForYou,
    Latest,
    Trending,
    PopularSearch,
    Search,
    Detail,
    AllEpisodes,
}

impl Endpoint {
    /// Path of the endpoint relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Vip => "/dramabox/vip",
            Endpoint::Dubbed => "/dramabox/dubindo",
            Endpoint::RandomDrama => "/dramabox/randomdrama",
            Endpoint::ForYou => "/dramabox/foryou",
            Endpoint::Latest => "/dramabox/latest",
            Endpoint::Trending => "/dramabox/trending",
            Endpoint::PopularSearch => "/dramabox/populersearch",
            Endpoint::Search => "/dramabox/search",
            Endpoint::Detail => "/dramabox/detail",
            Endpoint::AllEpisodes => "/dramabox/allepisode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_is_linear() {
        let config = ApiConfig::default();
        let delays: Vec<Duration> = (1..=config.retries)
            .map(|attempt| config.backoff_delay(attempt))
            .collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(3000)
            ]
        );
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = ApiConfig::new("http://localhost:9000/api/");
        assert_eq!(config.base_url, "http://localhost:9000/api");
        assert_eq!(
            config.url_for(Endpoint::Trending.path()),
            "http://localhost:9000/api/dramabox/trending"
        );
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retries, 3);
    }
}
