//! Command-line interface definitions for the lite reader.
//!
//! Every option can also be supplied through an environment variable, which
//! is how the service is usually configured when deployed.

use crate::categories::CategoryRegistry;
use crate::config::{
    DEFAULT_ARTICLE_BASE_URL, DEFAULT_FEED_BASE_URL, DEFAULT_LISTEN, DEFAULT_PUBLISHER_HOST, DEFAULT_SITE_NAME,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, LiteConfig,
};
use crate::error::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments for the lite reader.
///
/// # Examples
///
/// ```sh
/// # Serve NPR on the default port
/// npr_lite
///
/// # Another port, custom category list
/// npr_lite --listen 127.0.0.1:3000 --categories ./categories.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Address to listen on
    #[arg(short, long, env = "LITE_LISTEN", default_value = DEFAULT_LISTEN)]
    pub listen: SocketAddr,

    /// Publisher host whose article links are rewritten to local story pages
    #[arg(long, env = "LITE_PUBLISHER_HOST", default_value = DEFAULT_PUBLISHER_HOST)]
    pub publisher_host: String,

    /// Feed URL prefix; the category's feed id is appended
    #[arg(long, env = "LITE_FEED_BASE_URL", default_value = DEFAULT_FEED_BASE_URL)]
    pub feed_base_url: String,

    /// Text-only article URL prefix; the story id is appended
    #[arg(long, env = "LITE_ARTICLE_BASE_URL", default_value = DEFAULT_ARTICLE_BASE_URL)]
    pub article_base_url: String,

    /// Site name used in article page titles
    #[arg(long, env = "LITE_SITE_NAME", default_value = DEFAULT_SITE_NAME)]
    pub site_name: String,

    /// Optional YAML file listing the categories to serve
    #[arg(short, long, env = "LITE_CATEGORIES")]
    pub categories: Option<PathBuf>,

    /// Upstream request timeout in seconds
    #[arg(long, env = "LITE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// User-Agent sent to the publisher
    #[arg(long, env = "LITE_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Cli {
    /// Validated runtime configuration.
    pub fn config(&self) -> Result<LiteConfig> {
        LiteConfig {
            listen: self.listen,
            publisher_host: self.publisher_host.clone(),
            feed_base_url: self.feed_base_url.clone(),
            article_base_url: self.article_base_url.clone(),
            site_name: self.site_name.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
        }
        .validate()
    }

    /// The category registry: from `--categories` if given, the built-in list otherwise.
    pub fn registry(&self) -> Result<CategoryRegistry> {
        match &self.categories {
            Some(path) => CategoryRegistry::from_yaml_file(path),
            None => Ok(CategoryRegistry::default()),
        }
    }
}
