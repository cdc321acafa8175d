//! HTML assembly for category and article pages.
//!
//! Both page kinds share one document skeleton (title, fixed style block,
//! category bar) and differ only in their body, which each supplies through
//! the [`Page`] trait. Output is deterministic and byte-stable, so tests
//! compare whole documents.
//!
//! Titles, links and paragraph text are inserted verbatim. The publisher's
//! markup is trusted and nothing is escaped.

use crate::categories::CategoryRegistry;
use crate::extract::ExtractedArticle;
use crate::listing::ListingEntry;
use itertools::Itertools;

/// Separator between category links in the navigation bar.
pub const NAV_SEPARATOR: &str = "|";

/// Suffix appended to every page title.
pub const TITLE_SUFFIX: &str = "Lite";

const STYLE: &str = r#"
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<meta http-equiv="X-UA-Compatible" content="ie=edge">
<style>
  body {
	max-width: 650px;
	margin: 2em auto 4em;
	padding: 0 1rem;
	line-height: 1.5;
	font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif, "Apple Color Emoji", "Segoe UI Emoji", "Segoe UI Symbol";
	-webkit-font-smoothing: antialiased;
}

img {
	max-width: 100%;
	height: auto;
}

.categories {
	word-break: break-word;
}

.category {
  padding: 0 5px 0 5px;
}
</style>"#;

/// One entry of the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLink {
    pub label: String,
    pub path: String,
}

/// Navigation links in registry navigation order (root first).
pub fn navigation(registry: &CategoryRegistry) -> Vec<CategoryLink> {
    registry
        .navigation()
        .map(|c| CategoryLink {
            label: c.label.clone(),
            path: c.path.clone(),
        })
        .collect()
}

/// A listing page for one feed category.
#[derive(Debug, Clone)]
pub struct CategoryPage {
    /// Feed title as reported by the publisher.
    pub title: String,
    pub category_label: String,
    pub navigation: Vec<CategoryLink>,
    pub entries: Vec<ListingEntry>,
}

/// A single story reduced to its paragraphs.
#[derive(Debug, Clone)]
pub struct ArticlePage {
    /// Site name, e.g. `"NPR"`.
    pub title: String,
    pub navigation: Vec<CategoryLink>,
    pub article: ExtractedArticle,
}

/// Something that can be laid out in the shared document skeleton.
pub trait Page {
    fn title(&self) -> &str;
    fn navigation(&self) -> &[CategoryLink];
    fn write_body(&self, out: &mut String);
}

impl Page for CategoryPage {
    fn title(&self) -> &str {
        &self.title
    }

    fn navigation(&self) -> &[CategoryLink] {
        &self.navigation
    }

    fn write_body(&self, out: &mut String) {
        out.push_str(&format!("<h3>{}</h3>\n<ul>\n", self.category_label));
        for entry in &self.entries {
            out.push_str(&format!(
                r#"<li><a href="{}">{}</a></li>"#,
                entry.target_path, entry.display_title
            ));
        }
        out.push_str("\n</ul>");
    }
}

impl Page for ArticlePage {
    fn title(&self) -> &str {
        &self.title
    }

    fn navigation(&self) -> &[CategoryLink] {
        &self.navigation
    }

    fn write_body(&self, out: &mut String) {
        out.push_str("<div>");
        for paragraph in &self.article.paragraphs {
            out.push_str(&format!("<p>{paragraph}</p>"));
        }
        out.push_str("</div>");
    }
}

fn navigation_bar(links: &[CategoryLink]) -> String {
    links
        .iter()
        .map(|link| format!(r#"<a class="category" href="{}">{}</a>"#, link.path, link.label))
        .join(NAV_SEPARATOR)
}

/// Render a complete HTML document.
pub fn render<P: Page>(page: &P) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str(&format!("<title>{} {}</title>\n", page.title(), TITLE_SUFFIX));
    out.push_str(STYLE);
    out.push_str("\n</head>\n<body>\n");
    out.push_str(&format!(
        "<div class=\"categories\">{}</div>\n",
        navigation_bar(page.navigation())
    ));
    page.write_body(&mut out);
    out.push_str("\n</body>\n</html>");
    out
}
