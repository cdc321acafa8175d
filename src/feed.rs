//! RSS and Atom parsing.
//!
//! Only what the listing needs is kept: the feed title and, for every
//! entry, its title and link, in document order. Format detection and
//! namespaced extensions (Media RSS, Dublin Core, `atom:link`) are left to
//! [`feed_rs`].

use crate::error::{LiteError, Result};
use crate::listing::FeedItem;
use feed_rs::model::{Entry, Text};
use feed_rs::parser;
use tracing::debug;

/// A parsed feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    pub title: String,
    pub items: Vec<FeedItem>,
}

fn text_content(text: Option<Text>) -> String {
    text.map(|t| t.content.trim().to_string()).unwrap_or_default()
}

/// The entry's alternate link (no `rel` counts as alternate), else its first link.
fn entry_link(entry: &Entry) -> String {
    let non_empty = || entry.links.iter().filter(|l| !l.href.trim().is_empty());
    non_empty()
        .find(|l| {
            l.rel
                .as_deref()
                .is_none_or(|rel| rel.is_empty() || rel.eq_ignore_ascii_case("alternate"))
        })
        .or_else(|| non_empty().next())
        .map(|l| l.href.trim().to_string())
        .unwrap_or_default()
}

/// Parse an RSS or Atom document.
pub fn parse_feed(bytes: &[u8]) -> Result<Feed> {
    let parsed = parser::parse(bytes).map_err(|e| LiteError::FeedParse(e.to_string()))?;

    let items = parsed
        .entries
        .into_iter()
        .map(|entry| FeedItem {
            link: entry_link(&entry),
            title: text_content(entry.title),
        })
        .collect();
    let feed = Feed {
        title: text_content(parsed.title),
        items,
    };

    debug!(title = %feed.title, items = feed.items.len(), "Parsed feed");
    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>Politics : NPR</title>
    <link>https://www.npr.org/templates/story/story.php?storyId=1014</link>
    <description>Politics coverage</description>
    <image>
      <title>Image title is not the feed title</title>
      <url>https://media.npr.org/images/podcasts/primary/npr_generic_image_300.jpg</url>
      <link>https://www.npr.org/</link>
    </image>
    <item>
      <title>Senate passes the budget &amp; adjourns</title>
      <link>https://www.npr.org/2024/03/05/123456/senate-budget</link>
    </item>
    <item>
      <title><![CDATA[Governors meet in Denver]]></title>
      <link>
        https://www.npr.org/sections/politics/2024/3/6/234567/governors
      </link>
    </item>
  </channel>
</rss>"#;

    const NAMESPACED_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
     xmlns:atom="http://www.w3.org/2005/Atom"
     xmlns:media="http://search.yahoo.com/mrss/"
     xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>News : NPR</title>
    <item>
      <title>Real headline</title>
      <link>https://www.npr.org/2024/1/2/99/real-headline</link>
      <media:title>Photo caption</media:title>
      <dc:creator>A. Reporter</dc:creator>
    </item>
    <item>
      <title>Second headline</title>
      <link>https://www.npr.org/2024/1/3/100/second</link>
      <atom:link href="https://self.example/" rel="self"></atom:link>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <title>Science</title>
  <updated>2024-01-02T12:00:00Z</updated>
  <entry>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <title>Comet spotted &#8212; again</title>
    <updated>2024-01-02T12:00:00Z</updated>
    <link rel="self" href="https://pub.example/feed/entry/1"/>
    <link rel="alternate" href="https://pub.example/2024/1/2/99/comet"/>
  </entry>
  <entry>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6b</id>
    <title>No link here</title>
    <updated>2024-01-02T12:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss() {
        let feed = parse_feed(RSS.as_bytes()).unwrap();
        assert_eq!(feed.title, "Politics : NPR");
        assert_eq!(
            feed.items,
            vec![
                FeedItem {
                    title: "Senate passes the budget & adjourns".to_string(),
                    link: "https://www.npr.org/2024/03/05/123456/senate-budget".to_string(),
                },
                FeedItem {
                    title: "Governors meet in Denver".to_string(),
                    link: "https://www.npr.org/sections/politics/2024/3/6/234567/governors".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_namespaced_children_do_not_replace_title_or_link() {
        let feed = parse_feed(NAMESPACED_RSS.as_bytes()).unwrap();
        assert_eq!(
            feed.items,
            vec![
                FeedItem {
                    title: "Real headline".to_string(),
                    link: "https://www.npr.org/2024/1/2/99/real-headline".to_string(),
                },
                FeedItem {
                    title: "Second headline".to_string(),
                    link: "https://www.npr.org/2024/1/3/100/second".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_atom() {
        let feed = parse_feed(ATOM.as_bytes()).unwrap();
        assert_eq!(feed.title, "Science");
        assert_eq!(feed.items.len(), 2);
        assert_eq!(feed.items[0].title, "Comet spotted \u{2014} again");
        assert_eq!(feed.items[0].link, "https://pub.example/2024/1/2/99/comet");
        assert_eq!(feed.items[1].link, "");
    }

    #[test]
    fn test_empty_channel() {
        let feed = parse_feed(
            b"<rss version=\"2.0\"><channel><title>Quiet day</title><link>https://pub.example/</link>\
              <description>Nothing new</description></channel></rss>",
        )
        .unwrap();
        assert_eq!(feed.title, "Quiet day");
        assert!(feed.items.is_empty());
    }

    #[test]
    fn test_not_a_feed() {
        let err = parse_feed(b"<html><body>Service unavailable</body></html>").unwrap_err();
        assert!(matches!(err, LiteError::FeedParse(_)));
    }

    #[test]
    fn test_empty_document() {
        let err = parse_feed(b"").unwrap_err();
        assert!(matches!(err, LiteError::FeedParse(_)));
    }
}
