use std::time::Duration;

use url::Url;

use crate::error::{ConsignError, Result};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Default quiet period before a typed filter is applied.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default per-request timeout enforced by the HTTP client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for the admin API client.
#[derive(Debug, Clone)]
pub struct ConsignConfig {
    /// Base URL of the marketplace admin API (e.g. `https://api.example.com`).
    pub api_url: Url,
    /// Bearer token sent with every request.
    pub api_token: Option<String>,
    /// Timeout applied by the HTTP client to each request.
    pub request_timeout: Duration,
    /// Rows per page for newly opened tables.
    pub default_page_size: u32,
    /// Quiet period for typed filters.
    pub debounce: Duration,
}

impl ConsignConfig {
    /// Config with default tunables for the given base URL.
    pub fn new(api_url: &str) -> Result<Self> {
        let api_url = Url::parse(api_url)
            .map_err(|e| ConsignError::Config(format!("invalid api url {api_url:?}: {e}")))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(ConsignError::Config(format!(
                "unsupported api url scheme: {}",
                api_url.scheme()
            )));
        }
        Ok(Self {
            api_url,
            api_token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            default_page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
        })
    }

    /// Read configuration from `CONSIGN_*` environment variables.
    ///
    /// `CONSIGN_API_URL` is required; `CONSIGN_API_TOKEN`,
    /// `CONSIGN_TIMEOUT_MS`, `CONSIGN_PAGE_SIZE` and `CONSIGN_DEBOUNCE_MS`
    /// are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup, e.g. command-line
    /// values layered over the environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup("CONSIGN_API_URL")
            .ok_or_else(|| ConsignError::Config("CONSIGN_API_URL is not set".into()))?;
        let mut config = Self::new(&url)?;

        config.api_token = lookup("CONSIGN_API_TOKEN").filter(|t| !t.is_empty());

        if let Some(ms) = lookup("CONSIGN_TIMEOUT_MS") {
            config.request_timeout = Duration::from_millis(parse_number("CONSIGN_TIMEOUT_MS", &ms)?);
        }
        if let Some(size) = lookup("CONSIGN_PAGE_SIZE") {
            let size = parse_number("CONSIGN_PAGE_SIZE", &size)?;
            config.default_page_size = u32::try_from(size)
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    ConsignError::Config(format!("CONSIGN_PAGE_SIZE out of range: {size}"))
                })?;
        }
        if let Some(ms) = lookup("CONSIGN_DEBOUNCE_MS") {
            config.debounce = Duration::from_millis(parse_number("CONSIGN_DEBOUNCE_MS", &ms)?);
        }

        Ok(config)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| ConsignError::Config(format!("{key}={value:?}: {e}")))
}
