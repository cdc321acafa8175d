//! The two page pipelines: feed to category listing, and story to article.
//!
//! [`Lite`] is the per-process application state. It is built once at
//! startup and shared by every request; nothing in it is mutated afterwards.

use crate::categories::CategoryRegistry;
use crate::config::LiteConfig;
use crate::error::{LiteError, Result};
use crate::listing::StoryLinkMatcher;
use crate::render::{ArticlePage, CategoryLink, CategoryPage, navigation, render};
use crate::upstream::Upstream;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{info, instrument};

static STORY_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("story id pattern"));

/// Result of the article pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    Page(String),
    /// The publisher has no such story; the caller should redirect.
    NotFound,
}

/// Shared application state.
#[derive(Debug)]
pub struct Lite {
    config: LiteConfig,
    registry: Arc<CategoryRegistry>,
    matcher: StoryLinkMatcher,
    upstream: Upstream,
    navigation: Vec<CategoryLink>,
}

impl Lite {
    pub fn new(config: LiteConfig, registry: Arc<CategoryRegistry>) -> Result<Self> {
        let matcher = StoryLinkMatcher::new(&config.publisher_host)
            .map_err(|e| LiteError::Config(format!("story link pattern: {e}")))?;
        let upstream = Upstream::new(&config)?;
        let navigation = navigation(&registry);
        Ok(Self {
            config,
            registry,
            matcher,
            upstream,
            navigation,
        })
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Listing pipeline: fetch a feed and render it as a category page.
    #[instrument(level = "info", skip(self))]
    pub async fn render_category_page(&self, feed_id: &str, category_label: &str) -> Result<String> {
        let feed = self.upstream.fetch_feed(feed_id).await?;
        let entries = self.matcher.to_listing(&feed.items);
        info!(entries = entries.len(), "Built listing");
        let page = CategoryPage {
            title: feed.title,
            category_label: category_label.to_string(),
            navigation: self.navigation.clone(),
            entries,
        };
        Ok(render(&page))
    }

    /// Article pipeline: fetch a story, extract its body and render it.
    ///
    /// The id is checked before anything is fetched.
    #[instrument(level = "info", skip(self))]
    pub async fn render_article_page(&self, story_id: &str) -> Result<ArticleOutcome> {
        validate_story_id(story_id)?;
        let Some(article) = self.upstream.fetch_article(story_id).await? else {
            return Ok(ArticleOutcome::NotFound);
        };
        let page = ArticlePage {
            title: self.config.site_name.clone(),
            navigation: self.navigation.clone(),
            article,
        };
        Ok(ArticleOutcome::Page(render(&page)))
    }
}

/// Story ids are non-empty runs of ASCII digits.
pub fn validate_story_id(story_id: &str) -> Result<()> {
    if STORY_ID.is_match(story_id) {
        Ok(())
    } else {
        Err(LiteError::InvalidStoryId(story_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn lite(server: &MockServer) -> Lite {
        let config = LiteConfig {
            publisher_host: "pub.example".to_string(),
            feed_base_url: format!("{}/feed/", server.uri()),
            article_base_url: format!("{}/story/", server.uri()),
            ..LiteConfig::default()
        };
        Lite::new(config, Arc::new(CategoryRegistry::default())).unwrap()
    }

    #[test]
    fn test_validate_story_id() {
        assert!(validate_story_id("565664321").is_ok());
        assert!(validate_story_id("").is_err());
        assert!(validate_story_id("12a").is_err());
        assert!(validate_story_id("-1").is_err());
        assert!(validate_story_id("１２").is_err());
    }

    #[tokio::test]
    async fn test_category_page() {
        let server = MockServer::start().await;
        let feed = "<rss version=\"2.0\"><channel><title>Politics : NPR</title>\
            <item><title>A</title><link>https://pub.example/2024/3/5/123456-headline</link></item>\
            <item><title>B</title><link>https://other.example/x</link></item>\
            </channel></rss>";
        Mock::given(method("GET"))
            .and(path("/feed/1014"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed))
            .mount(&server)
            .await;

        let html = lite(&server)
            .render_category_page("1014", "Politics")
            .await
            .unwrap();
        assert!(html.contains("<title>Politics : NPR Lite</title>"));
        assert!(html.contains("<h3>Politics</h3>"));
        assert!(html.contains(
            r#"<li><a href="/story/123456">A</a></li><li><a href="https://other.example/x">B</a></li>"#
        ));
        assert!(html.contains(r#"<div class="categories"><a class="category" href="/">Headlines</a>|"#));
    }

    #[tokio::test]
    async fn test_article_page() {
        let server = MockServer::start().await;
        let body = "<p>Dateline</p><p>   </p><p>Short</p><p>This is a proper sentence of content.</p>";
        Mock::given(method("GET"))
            .and(path("/story/42"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let outcome = lite(&server).render_article_page("42").await.unwrap();
        let ArticleOutcome::Page(html) = outcome else {
            panic!("expected a rendered page");
        };
        assert!(html.contains("<title>NPR Lite</title>"));
        assert!(html.contains("<div><p>This is a proper sentence of content.</p></div>"));
    }

    #[tokio::test]
    async fn test_article_without_paragraphs_renders_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/story/43"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let outcome = lite(&server).render_article_page("43").await.unwrap();
        assert!(matches!(outcome, ArticleOutcome::Page(html) if html.contains("<div></div>")));
    }

    #[tokio::test]
    async fn test_missing_article() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let outcome = lite(&server).render_article_page("44").await.unwrap();
        assert_eq!(outcome, ArticleOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_invalid_id_is_rejected_before_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = lite(&server).render_article_page("abc").await.unwrap_err();
        assert!(matches!(err, LiteError::InvalidStoryId(_)));
    }
}
