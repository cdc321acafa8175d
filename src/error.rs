//! Error types for the lite reader.
//!
//! Only the outbound collaborators can fail: fetching from the publisher,
//! parsing its feeds, and validating what the router hands us. The extractor
//! and the renderers are total and never produce a [`LiteError`].

use thiserror::Error;

/// Everything that can go wrong while serving a lite page.
#[derive(Error, Debug)]
pub enum LiteError {
    /// Transport-level failure reaching the publisher (DNS, TLS, timeout,
    /// connection reset, a body that stops mid-stream).
    #[error("upstream request failed: {0}")]
    UpstreamFetch(#[from] reqwest::Error),

    /// The publisher answered, but with a status we cannot render.
    ///
    /// A 404 on an article is not reported through this variant; it is
    /// the "no such story" outcome and handled by a redirect.
    #[error("upstream returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    /// The feed payload was not well-formed RSS or Atom.
    #[error("failed to parse feed: {0}")]
    FeedParse(String),

    /// The story identifier from the router was missing or not numeric.
    #[error("invalid story id: {0:?}")]
    InvalidStoryId(String),

    /// Startup configuration was rejected (category registry, base URLs).
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LiteError {
    /// Whether the failure is the caller's fault rather than ours or the publisher's.
    pub fn is_client_error(&self) -> bool {
        matches!(self, LiteError::InvalidStoryId(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LiteError>;
