//! Feed renderer - paginated post cards with per-card expand state

use std::collections::BTreeSet;

use crate::content::{markdown, Post};
use crate::helpers::{display_date, html_escape};

/// Result of toggling a card's body region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    /// New expanded state
    pub open: bool,
    /// Control label after the toggle
    pub label: &'static str,
    /// Fragment to publish for deep linking; set when opening
    pub fragment: Option<String>,
}

/// Paginated card renderer over an already filtered and ordered post list.
///
/// Rendering is append-only: the initial page emits `min(page_size, total)`
/// cards and each load-more emits the next batch without touching cards
/// already emitted, so open cards stay open. A filter change is a new `Feed`
/// built from the re-derived list.
pub struct Feed<'a> {
    posts: Vec<&'a Post>,
    page_size: usize,
    rendered: usize,
    date_format: String,
    open: BTreeSet<String>,
}

impl<'a> Feed<'a> {
    pub fn new(posts: Vec<&'a Post>, page_size: usize, date_format: &str) -> Self {
        Self {
            posts,
            page_size: page_size.max(1),
            rendered: 0,
            date_format: date_format.to_string(),
            open: BTreeSet::new(),
        }
    }

    /// Number of posts in the filtered list
    pub fn total(&self) -> usize {
        self.posts.len()
    }

    /// Number of cards emitted so far
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Render the initial page from offset zero
    pub fn render_initial(&mut self) -> String {
        self.rendered = 0;
        self.next_batch().unwrap_or_default()
    }

    /// Append the next batch; `None` once everything is rendered
    pub fn load_more(&mut self) -> Option<String> {
        self.next_batch()
    }

    /// Resume rendering at a known offset (server-driven load-more)
    pub fn resume_at(&mut self, offset: usize) {
        self.rendered = offset.min(self.posts.len());
    }

    /// The load-more control is hidden whenever every filtered post is
    /// already rendered
    pub fn load_more_hidden(&self) -> bool {
        self.rendered >= self.posts.len()
    }

    /// Flip a card's body between hidden and expanded.
    ///
    /// Returns `None` for an id not present in the list. Opening yields the
    /// post id as the page fragment for deep linking.
    pub fn toggle(&mut self, id: &str) -> Option<Toggle> {
        if !self.posts.iter().any(|p| p.id == id) {
            return None;
        }

        if self.open.remove(id) {
            Some(Toggle {
                open: false,
                label: "Read more",
                fragment: None,
            })
        } else {
            self.open.insert(id.to_string());
            Some(Toggle {
                open: true,
                label: "Show less",
                fragment: Some(id.to_string()),
            })
        }
    }

    /// Whether a card's body is currently expanded
    pub fn is_open(&self, id: &str) -> bool {
        self.open.contains(id)
    }

    fn next_batch(&mut self) -> Option<String> {
        if self.rendered >= self.posts.len() {
            return None;
        }

        let end = (self.rendered + self.page_size).min(self.posts.len());
        let html = self.posts[self.rendered..end]
            .iter()
            .map(|p| self.card_html(p))
            .collect::<Vec<_>>()
            .join("\n");
        self.rendered = end;
        Some(html)
    }

    fn card_html(&self, post: &Post) -> String {
        let when = display_date(&post.date, &self.date_format);
        let open = self.open.contains(&post.id);

        let tags = post
            .tags
            .iter()
            .map(|t| format!(r#"<span class="pill">{}</span>"#, html_escape(t)))
            .collect::<Vec<_>>()
            .join(" ");

        // Markdown wins when a post carries both body representations
        let body = match (&post.body_markdown, &post.body_html) {
            (Some(md), _) => markdown::md_to_html(md),
            (None, Some(html)) => html.clone(),
            (None, None) => String::new(),
        };

        let mut card = String::new();
        card.push_str(&format!(
            r#"<article id="{}" class="post card">"#,
            html_escape(&post.id)
        ));

        let pin = if post.pinned {
            r#" <span class="pin">📌</span>"#
        } else {
            ""
        };
        card.push_str(&format!(
            r#"<h3 class="post-title">{}{}</h3>"#,
            html_escape(&post.title),
            pin
        ));

        let tag_meta = if tags.is_empty() {
            String::new()
        } else {
            format!("<span>•</span> {}", tags)
        };
        card.push_str(&format!(
            r#"<div class="meta"><span>{}</span>{}</div>"#,
            html_escape(&when),
            tag_meta
        ));

        if let Some(hero) = &post.hero {
            let alt = post.hero_alt.as_deref().unwrap_or("");
            card.push_str(&format!(
                r#"<div class="hero"><img src="{}" alt="{}" loading="lazy"></div>"#,
                html_escape(hero),
                html_escape(alt)
            ));
        }

        if let Some(summary) = &post.summary {
            card.push_str(&format!(
                r#"<p class="summary">{}</p>"#,
                html_escape(summary)
            ));
        }

        if open {
            card.push_str(&format!(r#"<div class="body">{}</div>"#, body));
        } else {
            card.push_str(&format!(r#"<div class="body" hidden>{}</div>"#, body));
        }

        let (label, expanded) = if open {
            ("Show less", "true")
        } else {
            ("Read more", "false")
        };
        card.push_str(&format!(
            r#"<button class="readmore" data-id="{}" aria-expanded="{}">{}</button>"#,
            html_escape(&post.id),
            expanded,
            label
        ));

        card.push_str("</article>");
        card
    }
}

/// Tag filter row: one control per distinct tag, active ones marked
pub fn tag_row_html<F>(tags: &[String], active: &BTreeSet<String>, href_for: F) -> String
where
    F: Fn(&str) -> String,
{
    tags.iter()
        .map(|tag| {
            let class = if active.contains(tag) {
                "tag active"
            } else {
                "tag"
            };
            format!(
                r#"<a class="{}" data-tag="{}" href="{}">{}</a>"#,
                class,
                html_escape(tag),
                href_for(tag),
                html_escape(tag)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
