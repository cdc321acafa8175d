//! Feed items to listing entries, with story-link canonicalisation.
//!
//! Publisher article links look like
//! `https://www.npr.org/sections/politics/2024/3/5/123456/some-headline`.
//! When a link has that shape the listing points at our own `/story/{id}`
//! page instead, so the reader never leaves the lite site.

use regex::Regex;

/// One syndicated entry as handed over by the feed parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
}

/// One line of a category page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub display_title: String,
    /// `/story/{id}` for canonical publisher links, otherwise the original link.
    pub target_path: String,
}

/// Recognises the publisher's canonical article URLs and pulls out the story id.
///
/// The pattern is not anchored and the part after the host is greedy, so
/// when a link contains several `year/month/day/number` runs the id next to
/// the last date wins.
#[derive(Debug, Clone)]
pub struct StoryLinkMatcher {
    pattern: Regex,
}

impl StoryLinkMatcher {
    pub fn new(publisher_host: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"https://{}.*/[0-9]{{4}}/[0-9]{{1,2}}/[0-9]{{1,2}}/([0-9]+)",
            regex::escape(publisher_host)
        ))?;
        Ok(Self { pattern })
    }

    /// The numeric story id, if `link` is a canonical article URL.
    pub fn story_id<'a>(&self, link: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(link)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Where a listing entry for `link` should point.
    pub fn target_path(&self, link: &str) -> String {
        match self.story_id(link) {
            Some(id) => story_path(id),
            None => link.to_string(),
        }
    }

    /// Map feed items to listing entries, one for one, in feed order.
    pub fn to_listing(&self, items: &[FeedItem]) -> Vec<ListingEntry> {
        items
            .iter()
            .map(|item| ListingEntry {
                display_title: item.title.clone(),
                target_path: self.target_path(&item.link),
            })
            .collect()
    }
}

/// Internal path of a story page.
pub fn story_path(id: &str) -> String {
    format!("/story/{id}")
}
