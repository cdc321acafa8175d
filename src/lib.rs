//! # NPR Lite
//!
//! Re-renders a news publisher's category feeds and text-only article pages
//! as small, self-contained HTML documents for slow links and old browsers.
//!
//! ## Architecture
//!
//! Two stateless pipelines share one renderer:
//! 1. **Listing**: feed ([`upstream`], [`feed`]) → story-link rewriting
//!    ([`listing`]) → category page ([`render`])
//! 2. **Article**: text-only page ([`upstream`]) → token scan ([`scan`]) →
//!    paragraph extraction ([`extract`]) → article page ([`render`])
//!
//! [`pages`] ties the pipelines to the shared application state and
//! [`server`] maps HTTP routes onto them.

pub mod categories;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod feed;
pub mod listing;
pub mod pages;
pub mod render;
pub mod scan;
pub mod server;
pub mod upstream;
pub mod utils;

pub use categories::{Category, CategoryRegistry};
pub use config::LiteConfig;
pub use error::{LiteError, Result};
pub use extract::{ArticleExtractor, ExtractedArticle, extract, extract_html};
pub use feed::{Feed, parse_feed};
pub use listing::{FeedItem, ListingEntry, StoryLinkMatcher};
pub use pages::{ArticleOutcome, Lite};
pub use scan::{Token, TokenScanner, tokenize};
