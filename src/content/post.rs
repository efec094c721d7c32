//! Post and post-index models

use serde::{Deserialize, Serialize};

/// A news post, loaded from a per-post JSON resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Post {
    /// Stable identifier, derived from date + title at authoring time
    pub id: String,

    /// Post title
    pub title: String,

    /// Optional subtitle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Publication date as a `YYYY-MM-DD` string; not guaranteed parseable
    pub date: String,

    /// Hero image reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero: Option<String>,

    /// Alt text for the hero image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_alt: Option<String>,

    /// Short summary shown while the post is collapsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Raw Markdown body; preferred over `body_html` when both are present
    #[serde(alias = "bodyMd", skip_serializing_if = "Option::is_none")]
    pub body_markdown: Option<String>,

    /// Trusted pre-rendered HTML body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,

    /// Post tags; display order follows source order
    pub tags: Vec<String>,

    /// Pinned posts sort before all others
    pub pinned: bool,

    /// Draft posts are excluded from all rendering
    pub draft: bool,
}

impl Post {
    /// A record without an id and a title cannot be rendered or linked
    pub fn is_usable(&self) -> bool {
        !self.id.is_empty() && !self.title.is_empty()
    }

    /// Raw body text, whichever representation the post carries
    pub fn raw_body(&self) -> &str {
        self.body_markdown
            .as_deref()
            .or(self.body_html.as_deref())
            .unwrap_or("")
    }

    /// Text searched by the free-text filter: title, summary, raw body and
    /// space-joined tags
    pub fn search_text(&self) -> String {
        let mut text = String::new();
        text.push_str(&self.title);
        text.push('\n');
        if let Some(summary) = &self.summary {
            text.push_str(summary);
            text.push('\n');
        }
        text.push_str(self.raw_body());
        text.push('\n');
        text.push_str(&self.tags.join(" "));
        text
    }
}

/// The post index: an ordered list of per-post resource paths.
///
/// It names what to fetch; it is not the source of truth for post content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostIndex {
    #[serde(default)]
    pub posts: Vec<String>,
}
