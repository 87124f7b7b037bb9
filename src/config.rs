//! Remote store configuration
//! Describes where the dated honeypot logs live and how they are fetched

use crate::error_handling::{HoneypotError, HoneypotResult};

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;

/// Location of the log repository and fetch tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    pub base_url: String,
    pub owner: String,
    pub repo: String,
    /// Branch, tag or commit to read from; the store default when unset
    pub git_ref: Option<String>,
    pub request_timeout_ms: u64,
    pub fetch_concurrency: usize,
    pub user_agent: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            owner: String::new(),
            repo: String::new(),
            git_ref: None,
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            user_agent: concat!("honeypot_insights/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl StoreConfig {
    pub fn new<O: Into<String>, R: Into<String>>(owner: O, repo: R) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_ref<S: Into<String>>(mut self, git_ref: S) -> Self {
        self.git_ref = Some(git_ref.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency;
        self
    }

    /// Load configuration from environment variables with validation
    pub fn from_env() -> HoneypotResult<Self> {
        let owner = std::env::var("HONEYPOT_STORE_OWNER")
            .map_err(|_| HoneypotError::configuration("HONEYPOT_STORE_OWNER environment variable not set"))?;

        let repo = std::env::var("HONEYPOT_STORE_REPO")
            .map_err(|_| HoneypotError::configuration("HONEYPOT_STORE_REPO environment variable not set"))?;

        let base_url = std::env::var("HONEYPOT_STORE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let git_ref = std::env::var("HONEYPOT_STORE_REF")
            .ok()
            .filter(|r| !r.trim().is_empty());

        let request_timeout_ms = std::env::var("HONEYPOT_FETCH_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_MS.to_string())
            .parse()
            .map_err(|_| HoneypotError::configuration("Invalid HONEYPOT_FETCH_TIMEOUT_MS"))?;

        let fetch_concurrency = std::env::var("HONEYPOT_FETCH_CONCURRENCY")
            .unwrap_or_else(|_| DEFAULT_FETCH_CONCURRENCY.to_string())
            .parse()
            .map_err(|_| HoneypotError::configuration("Invalid HONEYPOT_FETCH_CONCURRENCY"))?;

        let config = Self {
            base_url,
            owner,
            repo,
            git_ref,
            request_timeout_ms,
            fetch_concurrency,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HoneypotResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(HoneypotError::configuration("Store base URL cannot be empty"));
        }
        if self.owner.trim().is_empty() {
            return Err(HoneypotError::configuration("Store owner cannot be empty"));
        }
        if self.repo.trim().is_empty() {
            return Err(HoneypotError::configuration("Store repository cannot be empty"));
        }
        // A run must always be able to give up on a silent store
        if self.request_timeout_ms == 0 {
            return Err(HoneypotError::configuration("Request timeout must be > 0"));
        }
        if self.fetch_concurrency == 0 {
            return Err(HoneypotError::configuration("Fetch concurrency must be > 0"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Contents endpoint of a folder in the log repository
    pub fn contents_url(&self, folder: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            folder.trim_matches('/')
        )
    }
}
