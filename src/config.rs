//! Runtime configuration shared by the upstream client and the pages.

use crate::error::{LiteError, Result};
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
pub const DEFAULT_PUBLISHER_HOST: &str = "www.npr.org";
pub const DEFAULT_FEED_BASE_URL: &str = "https://www.npr.org/rss/rss.php?id=";
pub const DEFAULT_ARTICLE_BASE_URL: &str = "https://text.npr.org/";
pub const DEFAULT_SITE_NAME: &str = "NPR";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_USER_AGENT: &str = concat!("npr_lite/", env!("CARGO_PKG_VERSION"));

/// Validated settings for one process.
#[derive(Debug, Clone)]
pub struct LiteConfig {
    pub listen: SocketAddr,
    /// Host whose article links are rewritten to `/story/{id}`.
    pub publisher_host: String,
    /// Feed URL prefix; the numeric feed id is appended verbatim.
    pub feed_base_url: String,
    /// Text-only article URL prefix; the story id is appended verbatim.
    pub article_base_url: String,
    /// Shown in article page titles.
    pub site_name: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl LiteConfig {
    /// Check the URL prefixes and host before anything is served.
    pub fn validate(self) -> Result<Self> {
        check_base_url("feed base URL", &self.feed_base_url)?;
        check_base_url("article base URL", &self.article_base_url)?;
        if self.publisher_host.is_empty() || self.publisher_host.contains('/') {
            return Err(LiteError::Config(format!(
                "publisher host must be a bare host name, got {:?}",
                self.publisher_host
            )));
        }
        if self.timeout.is_zero() {
            return Err(LiteError::Config("timeout must be positive".to_string()));
        }
        Ok(self)
    }
}

fn check_base_url(what: &str, raw: &str) -> Result<()> {
    let url = Url::parse(raw).map_err(|e| LiteError::Config(format!("{what} {raw:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(LiteError::Config(format!(
            "{what} {raw:?} has unsupported scheme {other:?}"
        ))),
    }
}

impl Default for LiteConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            publisher_host: DEFAULT_PUBLISHER_HOST.to_string(),
            feed_base_url: DEFAULT_FEED_BASE_URL.to_string(),
            article_base_url: DEFAULT_ARTICLE_BASE_URL.to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
