//! Microsoft Graph source configuration.

use std::time::Duration;

use url::Url;

use crate::source::MAX_PAGE_SIZE;

/// Configuration for the Graph `calendarView` source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    /// API root, e.g. `https://graph.microsoft.com/v1.0`.
    pub base_url: String,

    /// Upper bound on the page size sent as `$top`.
    ///
    /// Always within `1..=50`.
    pub page_size: u32,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphConfig {
    /// Default API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://graph.microsoft.com/v1.0";

    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            page_size: MAX_PAGE_SIZE,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("weekview/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the API root. A trailing slash is ignored.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the page size, clamped to `1..=50`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The parsed API root.
    pub fn base(&self) -> Result<Url, String> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("invalid base_url {:?}: {}", self.base_url, e))?;
        match url.scheme() {
            "https" | "http" => Ok(url),
            other => Err(format!("base_url must use http or https, not {}", other)),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.base()?;

        if self.timeout.is_zero() {
            return Err("timeout must be greater than zero".to_string());
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(format!("page_size must be between 1 and {}", MAX_PAGE_SIZE));
        }

        Ok(())
    }
}
