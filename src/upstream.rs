//! Fetching feeds and text-only article pages from the publisher.
//!
//! Every request is made exactly once. Failures are returned to the caller,
//! who reports them; nothing here retries or caches.

use crate::config::LiteConfig;
use crate::error::{LiteError, Result};
use crate::extract::{ArticleExtractor, ExtractedArticle};
use crate::feed::{Feed, parse_feed};
use crate::scan::TokenScanner;
use crate::utils::truncate_for_log;
use futures::TryStreamExt;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};

/// HTTP client bound to the publisher's feed and article URL templates.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: Client,
    feed_base_url: String,
    article_base_url: String,
}

impl Upstream {
    pub fn new(config: &LiteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            feed_base_url: config.feed_base_url.clone(),
            article_base_url: config.article_base_url.clone(),
        })
    }

    pub fn feed_url(&self, feed_id: &str) -> String {
        format!("{}{}", self.feed_base_url, feed_id)
    }

    pub fn article_url(&self, story_id: &str) -> String {
        format!("{}{}", self.article_base_url, story_id)
    }

    /// Download and parse one category feed.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_feed(&self, feed_id: &str) -> Result<Feed> {
        let url = self.feed_url(feed_id);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LiteError::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Fetched feed");
        let feed = parse_feed(&body).inspect_err(|e| {
            warn!(
                error = %e,
                body_preview = %truncate_for_log(&String::from_utf8_lossy(&body), 300),
                "Feed did not parse"
            );
        })?;
        info!(items = feed.items.len(), title = %feed.title, "Parsed feed");
        Ok(feed)
    }

    /// Download one text-only article page and extract its paragraphs.
    ///
    /// `Ok(None)` means the publisher has no such story (HTTP 404).
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_article(&self, story_id: &str) -> Result<Option<ExtractedArticle>> {
        let url = self.article_url(story_id);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!(%url, "Upstream has no such story");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LiteError::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }

        // Collect the chunks first: the scanner is not Send and must not
        // live across an await point.
        let chunks: Vec<_> = response.bytes_stream().try_collect().await?;
        let article = extract_chunks(chunks.iter().map(|c| &c[..]));
        info!(
            chunks = chunks.len(),
            paragraphs = article.paragraphs.len(),
            "Extracted article"
        );
        Ok(Some(article))
    }
}

/// Feed body chunks through the scanner and extractor as they would arrive.
fn extract_chunks<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> ExtractedArticle {
    let mut scanner = TokenScanner::new();
    let mut extractor = ArticleExtractor::new();
    for chunk in chunks {
        scanner.write(chunk);
        for token in scanner.drain() {
            extractor.step(&token);
        }
    }
    for token in scanner.end() {
        extractor.step(&token);
    }
    extractor.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ARTICLE: &str = "<html><body><p>By A. Reporter</p>\
        <p>The first paragraph of the story.</p><p>Tiny</p>\
        <p>The second paragraph of the story.</p></body></html>";

    const FEED: &str = "<rss version=\"2.0\"><channel><title>Science : NPR</title>\
        <item><title>Comet</title><link>https://www.npr.org/2024/1/2/99/comet</link></item>\
        </channel></rss>";

    fn upstream(server: &MockServer) -> Upstream {
        let config = LiteConfig {
            feed_base_url: format!("{}/rss/rss.php?id=", server.uri()),
            article_base_url: format!("{}/", server.uri()),
            ..LiteConfig::default()
        };
        Upstream::new(&config).unwrap()
    }

    #[test]
    fn test_url_templates() {
        let upstream = Upstream::new(&LiteConfig::default()).unwrap();
        assert_eq!(
            upstream.feed_url("1014"),
            "https://www.npr.org/rss/rss.php?id=1014"
        );
        assert_eq!(upstream.article_url("565664321"), "https://text.npr.org/565664321");
    }

    #[test]
    fn test_extract_chunks_across_boundaries() {
        let bytes = ARTICLE.as_bytes();
        let pieces: Vec<&[u8]> = bytes.chunks(7).collect();
        let article = extract_chunks(pieces);
        assert_eq!(
            article.paragraphs,
            vec![
                "The first paragraph of the story.",
                "The second paragraph of the story."
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_article() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/565664321"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
            .expect(1)
            .mount(&server)
            .await;

        let article = upstream(&server)
            .fetch_article("565664321")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(article.paragraphs.len(), 2);
        assert_eq!(article.paragraphs[0], "The first paragraph of the story.");
    }

    #[tokio::test]
    async fn test_fetch_article_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = upstream(&server).fetch_article("1").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fetch_article_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2"))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&server)
            .await;

        let err = upstream(&server).fetch_article("2").await.unwrap_err();
        assert!(matches!(err, LiteError::UpstreamStatus { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_fetch_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/rss.php"))
            .and(query_param("id", "1007"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&server)
            .await;

        let feed = upstream(&server).fetch_feed("1007").await.unwrap();
        assert_eq!(feed.title, "Science : NPR");
        assert_eq!(feed.items[0].title, "Comet");
    }

    #[tokio::test]
    async fn test_fetch_feed_garbage() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = upstream(&server).fetch_feed("1001").await.unwrap_err();
        assert!(matches!(err, LiteError::FeedParse(_)));
    }

    #[tokio::test]
    async fn test_fetch_feed_unreachable() {
        let config = LiteConfig {
            feed_base_url: "http://127.0.0.1:9/rss?id=".to_string(),
            ..LiteConfig::default()
        };
        let err = Upstream::new(&config)
            .unwrap()
            .fetch_feed("1001")
            .await
            .unwrap_err();
        assert!(matches!(err, LiteError::UpstreamFetch(_)));
    }
}
