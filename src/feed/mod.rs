//! Filter/sort engine for the news feed

pub mod render;

use std::collections::BTreeSet;

use crate::content::Post;

/// Current tag-selection and free-text filter state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Active tag filter; a post matches when it carries ANY active tag.
    /// Empty means no tag filtering.
    pub active_tags: BTreeSet<String>,
    /// Case-insensitive substring query; empty means no text filtering
    pub query: String,
}

impl FilterState {
    /// True when a post survives the draft, tag and text filters
    pub fn matches(&self, post: &Post) -> bool {
        if post.draft {
            return false;
        }

        let tags_ok = self.active_tags.is_empty()
            || post.tags.iter().any(|t| self.active_tags.contains(t));

        let query = self.query.trim().to_lowercase();
        let query_ok = query.is_empty() || post.search_text().to_lowercase().contains(&query);

        tags_ok && query_ok
    }
}

/// Derive the visible, ordered subset of posts for a filter state.
///
/// Pinned posts sort strictly before unpinned ones; within the same
/// pinned-ness, descending by date. Lexicographic comparison of the
/// `YYYY-MM-DD` strings is intentional; no date parsing is needed for
/// ordering. The sort is stable, so posts with equal keys keep their index
/// order from the loaded collection.
pub fn visible_posts<'a>(posts: &'a [Post], filter: &FilterState) -> Vec<&'a Post> {
    let mut visible: Vec<&Post> = posts.iter().filter(|p| filter.matches(p)).collect();
    visible.sort_by(|a, b| b.pinned.cmp(&a.pinned).then_with(|| b.date.cmp(&a.date)));
    visible
}

/// All distinct tags across the collection, sorted; drafts excluded
pub fn all_tags(posts: &[Post]) -> Vec<String> {
    let mut tags = BTreeSet::new();
    for post in posts.iter().filter(|p| !p.draft) {
        tags.extend(post.tags.iter().cloned());
    }
    tags.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, date: &str, pinned: bool, tags: &[&str]) -> Post {
        Post {
            id: id.to_string(),
            title: format!("Post {}", id),
            date: date.to_string(),
            pinned,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn tag_filter(tags: &[&str]) -> FilterState {
        FilterState {
            active_tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_drafts_never_visible() {
        let mut draft = post("d", "2025-01-01", true, &["news"]);
        draft.draft = true;
        let posts = vec![draft, post("a", "2024-01-01", false, &["news"])];

        let visible = visible_posts(&posts, &FilterState::default());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "a");

        // Even when a filter explicitly names the draft's tag
        let visible = visible_posts(&posts, &tag_filter(&["news"]));
        assert!(visible.iter().all(|p| !p.draft));
    }

    #[test]
    fn test_pinned_sorts_before_newer_unpinned() {
        let posts = vec![
            post("b", "2025-01-01", false, &[]),
            post("a", "2024-01-01", true, &[]),
        ];
        let visible = visible_posts(&posts, &FilterState::default());
        assert_eq!(visible[0].id, "a");
        assert_eq!(visible[1].id, "b");
    }

    #[test]
    fn test_date_descending_within_pinned_group() {
        let posts = vec![
            post("old", "2023-05-01", false, &[]),
            post("new", "2025-02-10", false, &[]),
            post("mid", "2024-08-20", false, &[]),
        ];
        let visible = visible_posts(&posts, &FilterState::default());
        let ids: Vec<_> = visible.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_equal_keys_keep_index_order() {
        let posts = vec![
            post("first", "2025-01-01", false, &[]),
            post("second", "2025-01-01", false, &[]),
        ];
        let visible = visible_posts(&posts, &FilterState::default());
        let ids: Vec<_> = visible.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_tag_filter_union() {
        let posts = vec![
            post("a", "2025-01-01", false, &["news", "events"]),
            post("b", "2025-01-02", false, &["events"]),
        ];
        let visible = visible_posts(&posts, &tag_filter(&["news"]));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "a");

        // Any active tag is enough
        let visible = visible_posts(&posts, &tag_filter(&["news", "events"]));
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn test_query_matches_body_case_insensitive() {
        let mut a = post("a", "2025-01-01", false, &[]);
        a.body_markdown = Some("The Belt Test is on **Friday**".to_string());
        let b = post("b", "2025-01-02", false, &[]);

        let filter = FilterState {
            query: "belt test".to_string(),
            ..Default::default()
        };
        let posts = vec![a, b];
        let visible = visible_posts(&posts, &filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "a");
    }

    #[test]
    fn test_query_matches_tags() {
        let posts = vec![post("a", "2025-01-01", false, &["tournament"])];
        let filter = FilterState {
            query: "TOURN".to_string(),
            ..Default::default()
        };
        assert_eq!(visible_posts(&posts, &filter).len(), 1);
    }

    #[test]
    fn test_all_tags_sorted_distinct() {
        let mut draft = post("d", "2025-01-01", false, &["hidden"]);
        draft.draft = true;
        let posts = vec![
            post("a", "2025-01-01", false, &["news", "events"]),
            post("b", "2025-01-02", false, &["events"]),
            draft,
        ];
        assert_eq!(all_tags(&posts), vec!["events", "news"]);
    }
}
